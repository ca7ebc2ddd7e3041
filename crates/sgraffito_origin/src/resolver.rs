use oxc_ast::ast::{ChainElement, Expression};

use crate::macros::{recognize_macro, unwrap_expression, MacroKind};
use crate::origin::{Origin, RefKind};

/// Name resolution hook for [`classify_expression`]. The script side
/// resolves through lexical scopes; the template side resolves through
/// template-local frames, then script bindings, then declared props.
pub(crate) trait ResolveIdent {
    fn resolve_ident(&self, name: &str, offset: u32) -> Origin;
}

/// Classify an expression into an [`Origin`]. Flow-insensitive and
/// conservative: whatever cannot be pinned down comes back `Unknown`,
/// and unions are produced where control flow merges values.
pub(crate) fn classify_expression<'a>(r: &dyn ResolveIdent, expr: &Expression<'a>) -> Origin {
    match unwrap_expression(expr) {
        Expression::Identifier(id) => r.resolve_ident(id.name.as_str(), id.span.start),
        Expression::ThisExpression(_) => Origin::self_root(),

        Expression::BooleanLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::NumericLiteral(_)
        | Expression::BigIntLiteral(_)
        | Expression::RegExpLiteral(_)
        | Expression::StringLiteral(_)
        | Expression::TemplateLiteral(_)
        | Expression::ObjectExpression(_)
        | Expression::ArrayExpression(_) => Origin::Literal,

        Expression::CallExpression(call) => match recognize_macro(call) {
            Some(MacroKind::Wrapper(kind)) => Origin::Ref { kind },
            Some(MacroKind::DefineProps) | Some(MacroKind::WithDefaults) => Origin::prop_root(),
            Some(MacroKind::DefineModel) => Origin::Ref {
                kind: RefKind::Model,
            },
            None => Origin::Opaque,
        },
        Expression::NewExpression(_) => Origin::Opaque,
        Expression::AwaitExpression(_) => Origin::Opaque,
        Expression::FunctionExpression(_) | Expression::ArrowFunctionExpression(_) => {
            Origin::Opaque
        }

        Expression::StaticMemberExpression(member) => {
            classify_expression(r, &member.object).member(Some(member.property.name.as_str()))
        }
        Expression::ComputedMemberExpression(member) => {
            let key = literal_key(&member.expression);
            classify_expression(r, &member.object).member(key.as_deref())
        }
        Expression::ChainExpression(chain) => classify_chain(r, &chain.expression),

        Expression::ConditionalExpression(cond) => Origin::union_of(vec![
            classify_expression(r, &cond.consequent),
            classify_expression(r, &cond.alternate),
        ]),
        Expression::LogicalExpression(logical) => Origin::union_of(vec![
            classify_expression(r, &logical.left),
            classify_expression(r, &logical.right),
        ]),

        Expression::BinaryExpression(_)
        | Expression::UnaryExpression(_)
        | Expression::UpdateExpression(_) => Origin::Literal,

        Expression::AssignmentExpression(assign) => classify_expression(r, &assign.right),
        Expression::SequenceExpression(seq) => match seq.expressions.last() {
            Some(last) => classify_expression(r, last),
            None => Origin::Unknown,
        },

        _ => Origin::Unknown,
    }
}

fn classify_chain<'a>(r: &dyn ResolveIdent, element: &ChainElement<'a>) -> Origin {
    match element {
        ChainElement::CallExpression(call) => match recognize_macro(call) {
            Some(MacroKind::Wrapper(kind)) => Origin::Ref { kind },
            _ => Origin::Opaque,
        },
        ChainElement::StaticMemberExpression(member) => {
            classify_expression(r, &member.object).member(Some(member.property.name.as_str()))
        }
        ChainElement::ComputedMemberExpression(member) => {
            let key = literal_key(&member.expression);
            classify_expression(r, &member.object).member(key.as_deref())
        }
        ChainElement::TSNonNullExpression(inner) => classify_expression(r, &inner.expression),
        ChainElement::PrivateFieldExpression(_) => Origin::Unknown,
    }
}

/// Statically-known key of a computed member access.
pub(crate) fn literal_key(expr: &Expression<'_>) -> Option<String> {
    match unwrap_expression(expr) {
        Expression::StringLiteral(s) => Some(s.value.to_string()),
        Expression::NumericLiteral(n) => Some(n.value.to_string()),
        _ => None,
    }
}
