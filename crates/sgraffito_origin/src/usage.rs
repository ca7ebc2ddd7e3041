use oxc_ast::ast::{CallExpression, ComputedMemberExpression, StaticMemberExpression};
use oxc_span::Span;

/// How an expression participates in its surrounding syntax. Roles are
/// recorded during the build walk so rules can iterate sites instead of
/// re-walking the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageRole {
    /// Left side of a plain `=` assignment.
    WriteTarget,
    /// Left side of a compound assignment (`+=`, `||=`, ...).
    CompoundWriteTarget,
    /// Operand of `++` or `--`.
    UpdateOperand,
    /// Operand of `delete`.
    DeleteOperand,
    /// Operand of any other unary operator.
    UnaryOperand,
    /// Either side of a binary operator.
    BinaryOperand,
    /// Condition position: `if`/`while`/`for` tests and the test of a
    /// ternary.
    ConditionTest,
    /// A call expression, recorded for callee and receiver checks.
    Call,
    /// A property read that is not a write or delete target.
    MemberAccess,
}

#[derive(Debug, Clone, Copy)]
pub enum UsageNode<'a> {
    Ident { name: &'a str, span: Span },
    StaticMember(&'a StaticMemberExpression<'a>),
    ComputedMember(&'a ComputedMemberExpression<'a>),
    Call(&'a CallExpression<'a>),
}

impl UsageNode<'_> {
    pub fn span(&self) -> Span {
        match self {
            UsageNode::Ident { span, .. } => *span,
            UsageNode::StaticMember(m) => m.span,
            UsageNode::ComputedMember(m) => m.span,
            UsageNode::Call(c) => c.span,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UsageSite<'a> {
    pub node: UsageNode<'a>,
    pub role: UsageRole,
}
