use compact_str::CompactString;
use oxc_allocator::Allocator;
use oxc_ast::ast::{ChainElement, Expression, Statement};
use oxc_parser::Parser;
use oxc_span::SourceType;
use phf::phf_set;
use rustc_hash::FxHashMap;

use crate::analysis::ScriptAnalysis;
use crate::origin::Origin;
use crate::resolver::{classify_expression, ResolveIdent};

/// Names introduced by one scope-carrying template construct, a
/// `v-for` or a `v-slot`.
#[derive(Debug, Default)]
pub struct TemplateFrame {
    names: FxHashMap<CompactString, Origin>,
}

impl TemplateFrame {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut frame = TemplateFrame::default();
        for name in names {
            // Template locals carry no script origin; they shadow
            // whatever the script or the prop set would say.
            frame
                .names
                .insert(CompactString::new(name.as_ref()), Origin::Unknown);
        }
        frame
    }
}

/// Stack of template frames tracking the element nesting during a
/// template walk. Pushed when entering an element that introduces
/// locals, popped on the way out.
#[derive(Debug, Default)]
pub struct TemplateScopeStack {
    frames: Vec<TemplateFrame>,
}

impl TemplateScopeStack {
    pub fn push(&mut self, frame: TemplateFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Innermost frame that binds `name`.
    pub fn lookup(&self, name: &str) -> Option<&Origin> {
        self.frames.iter().rev().find_map(|f| f.names.get(name))
    }
}

struct TemplateResolver<'s, 'a> {
    stack: &'s TemplateScopeStack,
    analysis: Option<&'s ScriptAnalysis<'a>>,
}

impl ResolveIdent for TemplateResolver<'_, '_> {
    fn resolve_ident(&self, name: &str, _offset: u32) -> Origin {
        if let Some(origin) = self.stack.lookup(name) {
            return origin.clone();
        }
        if let Some(analysis) = self.analysis {
            if let Some(origin) = analysis.resolve_module_name(name) {
                return origin;
            }
            // Undeclared in the script: template expressions also see
            // props directly by name.
            if analysis.props().iter().any(|p| p == name) {
                return Origin::prop_named(name);
            }
        }
        Origin::Unknown
    }
}

/// Resolve the origin of a template expression string, honoring the
/// current template frames and whatever the script region declared.
/// Unparseable expression text resolves to `Unknown`.
pub fn resolve_template_expression(
    stack: &TemplateScopeStack,
    analysis: Option<&ScriptAnalysis<'_>>,
    content: &str,
) -> Origin {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path("expr.ts").unwrap_or_default();
    let ret = Parser::new(&allocator, content, source_type).parse();
    if ret.panicked {
        return Origin::Unknown;
    }
    let Some(Statement::ExpressionStatement(stmt)) = ret.program.body.first() else {
        return Origin::Unknown;
    };
    resolve_template_ast(stack, analysis, &stmt.expression)
}

/// Same as [`resolve_template_expression`] for an already-parsed
/// expression node.
pub fn resolve_template_ast<'a>(
    stack: &TemplateScopeStack,
    analysis: Option<&ScriptAnalysis<'a>>,
    expr: &Expression<'a>,
) -> Origin {
    let resolver = TemplateResolver { stack, analysis };
    let origin = classify_expression(&resolver, expr);
    match analysis {
        Some(analysis) => analysis.canonicalize(origin),
        None => origin,
    }
}

/// Methods that mutate their receiver in place.
pub static MUTATING_METHODS: phf::Set<&'static str> = phf_set! {
    "push", "pop", "shift", "unshift", "splice", "sort", "reverse",
    "fill", "copyWithin", "set", "delete", "add", "clear",
};

/// Receiver of a call through one of [`MUTATING_METHODS`], if any.
fn mutating_receiver<'a, 'b>(callee: &'b Expression<'a>) -> Option<&'b Expression<'a>> {
    match crate::macros::unwrap_expression(callee) {
        Expression::StaticMemberExpression(member)
            if MUTATING_METHODS.contains(member.property.name.as_str()) =>
        {
            Some(&member.object)
        }
        Expression::ChainExpression(chain) => match &chain.expression {
            ChainElement::StaticMemberExpression(member)
                if MUTATING_METHODS.contains(member.property.name.as_str()) =>
            {
                Some(&member.object)
            }
            _ => None,
        },
        _ => None,
    }
}

/// A write found inside a template expression, such as the target of
/// an assignment in a `v-on` handler. Spans are relative to the
/// expression text that was scanned. `deep` marks a write that reaches
/// through the resolved value rather than replacing it, a mutating
/// method call on the receiver.
#[derive(Debug, Clone)]
pub struct TemplateWrite {
    pub origin: Origin,
    pub span: oxc_span::Span,
    pub deep: bool,
}

/// Scan a template statement expression for write targets: plain and
/// compound assignments, `++`/`--` operands, `delete` operands, and
/// mutating method calls. Any directive expression can carry one,
/// `v-if="count++"` as much as a handler body.
pub fn template_write_targets(
    stack: &TemplateScopeStack,
    analysis: Option<&ScriptAnalysis<'_>>,
    content: &str,
) -> Vec<TemplateWrite> {
    use oxc_ast::ast::{AssignmentTarget, SimpleAssignmentTarget, UnaryOperator};

    let allocator = Allocator::default();
    let source_type = SourceType::from_path("expr.ts").unwrap_or_default();
    let ret = Parser::new(&allocator, content, source_type).parse();
    if ret.panicked {
        return Vec::new();
    }

    let resolver = TemplateResolver { stack, analysis };
    let finish = |origin: Origin| match analysis {
        Some(analysis) => analysis.canonicalize(origin),
        None => origin,
    };

    let mut writes = Vec::new();
    for stmt in &ret.program.body {
        let Statement::ExpressionStatement(stmt) = stmt else {
            continue;
        };
        for_each_subexpression(&stmt.expression, &mut |expr| match expr {
            Expression::AssignmentExpression(assign) => match &assign.left {
                AssignmentTarget::AssignmentTargetIdentifier(id) => writes.push(TemplateWrite {
                    origin: finish(resolver.resolve_ident(id.name.as_str(), id.span.start)),
                    span: id.span,
                    deep: false,
                }),
                AssignmentTarget::StaticMemberExpression(member) => writes.push(TemplateWrite {
                    origin: finish(
                        classify_expression(&resolver, &member.object)
                            .member(Some(member.property.name.as_str())),
                    ),
                    span: member.span,
                    deep: false,
                }),
                AssignmentTarget::ComputedMemberExpression(member) => writes.push(TemplateWrite {
                    origin: finish(
                        classify_expression(&resolver, &member.object)
                            .member(crate::resolver::literal_key(&member.expression).as_deref()),
                    ),
                    span: member.span,
                    deep: false,
                }),
                _ => {}
            },
            Expression::UpdateExpression(update) => match &update.argument {
                SimpleAssignmentTarget::AssignmentTargetIdentifier(id) => {
                    writes.push(TemplateWrite {
                        origin: finish(resolver.resolve_ident(id.name.as_str(), id.span.start)),
                        span: id.span,
                        deep: false,
                    });
                }
                SimpleAssignmentTarget::StaticMemberExpression(member) => {
                    writes.push(TemplateWrite {
                        origin: finish(
                            classify_expression(&resolver, &member.object)
                                .member(Some(member.property.name.as_str())),
                        ),
                        span: member.span,
                        deep: false,
                    });
                }
                SimpleAssignmentTarget::ComputedMemberExpression(member) => {
                    writes.push(TemplateWrite {
                        origin: finish(
                            classify_expression(&resolver, &member.object).member(
                                crate::resolver::literal_key(&member.expression).as_deref(),
                            ),
                        ),
                        span: member.span,
                        deep: false,
                    });
                }
                _ => {}
            },
            Expression::UnaryExpression(unary) if unary.operator == UnaryOperator::Delete => {
                if let Expression::StaticMemberExpression(member) =
                    crate::macros::unwrap_expression(&unary.argument)
                {
                    writes.push(TemplateWrite {
                        origin: finish(
                            classify_expression(&resolver, &member.object)
                                .member(Some(member.property.name.as_str())),
                        ),
                        span: member.span,
                        deep: false,
                    });
                }
            }
            Expression::CallExpression(call) => {
                if let Some(receiver) = mutating_receiver(&call.callee) {
                    writes.push(TemplateWrite {
                        origin: finish(classify_expression(&resolver, receiver)),
                        span: call.span,
                        deep: true,
                    });
                }
            }
            Expression::ChainExpression(chain) => {
                if let ChainElement::CallExpression(call) = &chain.expression {
                    if let Some(receiver) = mutating_receiver(&call.callee) {
                        writes.push(TemplateWrite {
                            origin: finish(classify_expression(&resolver, receiver)),
                            span: call.span,
                            deep: true,
                        });
                    }
                }
            }
            _ => {}
        });
    }
    writes
}

/// References to instance members inside a template expression: bare
/// `$name` identifiers that no template frame shadows, and `this.$name`
/// accesses. Spans are relative to the scanned text and cover just the
/// member name.
pub fn template_instance_members(
    stack: &TemplateScopeStack,
    content: &str,
) -> Vec<(CompactString, oxc_span::Span)> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path("expr.ts").unwrap_or_default();
    let ret = Parser::new(&allocator, content, source_type).parse();
    if ret.panicked {
        return Vec::new();
    }

    let mut found = Vec::new();
    for stmt in &ret.program.body {
        let Statement::ExpressionStatement(stmt) = stmt else {
            continue;
        };
        for_each_subexpression(&stmt.expression, &mut |expr| match expr {
            Expression::Identifier(id) => {
                if id.name.starts_with('$') && stack.lookup(id.name.as_str()).is_none() {
                    found.push((CompactString::new(id.name.as_str()), id.span));
                }
            }
            Expression::StaticMemberExpression(member) => {
                if matches!(&member.object, Expression::ThisExpression(_))
                    && member.property.name.starts_with('$')
                {
                    found.push((
                        CompactString::new(member.property.name.as_str()),
                        member.property.span,
                    ));
                }
            }
            _ => {}
        });
    }
    found
}

/// Depth-first visit of every sub-expression, the node itself included.
fn for_each_subexpression<'a>(expr: &Expression<'a>, f: &mut impl FnMut(&Expression<'a>)) {
    use oxc_ast::ast::{Argument, ObjectPropertyKind};

    f(expr);
    match expr {
        Expression::StaticMemberExpression(member) => {
            for_each_subexpression(&member.object, f);
        }
        Expression::ComputedMemberExpression(member) => {
            for_each_subexpression(&member.object, f);
            for_each_subexpression(&member.expression, f);
        }
        Expression::CallExpression(call) => {
            for_each_subexpression(&call.callee, f);
            for arg in &call.arguments {
                match arg {
                    Argument::SpreadElement(spread) => for_each_subexpression(&spread.argument, f),
                    _ => {
                        if let Some(expr) = arg.as_expression() {
                            for_each_subexpression(expr, f);
                        }
                    }
                }
            }
        }
        Expression::ChainExpression(chain) => match &chain.expression {
            ChainElement::CallExpression(call) => {
                for_each_subexpression(&call.callee, f);
                for arg in &call.arguments {
                    if let Some(expr) = arg.as_expression() {
                        for_each_subexpression(expr, f);
                    }
                }
            }
            ChainElement::StaticMemberExpression(member) => {
                for_each_subexpression(&member.object, f);
            }
            ChainElement::ComputedMemberExpression(member) => {
                for_each_subexpression(&member.object, f);
                for_each_subexpression(&member.expression, f);
            }
            ChainElement::TSNonNullExpression(inner) => {
                for_each_subexpression(&inner.expression, f);
            }
            ChainElement::PrivateFieldExpression(field) => {
                for_each_subexpression(&field.object, f);
            }
        },
        Expression::UnaryExpression(unary) => for_each_subexpression(&unary.argument, f),
        Expression::BinaryExpression(binary) => {
            for_each_subexpression(&binary.left, f);
            for_each_subexpression(&binary.right, f);
        }
        Expression::LogicalExpression(logical) => {
            for_each_subexpression(&logical.left, f);
            for_each_subexpression(&logical.right, f);
        }
        Expression::ConditionalExpression(cond) => {
            for_each_subexpression(&cond.test, f);
            for_each_subexpression(&cond.consequent, f);
            for_each_subexpression(&cond.alternate, f);
        }
        Expression::AssignmentExpression(assign) => {
            for_each_subexpression(&assign.right, f);
        }
        Expression::SequenceExpression(seq) => {
            for expr in &seq.expressions {
                for_each_subexpression(expr, f);
            }
        }
        Expression::ArrayExpression(arr) => {
            for element in &arr.elements {
                match element {
                    oxc_ast::ast::ArrayExpressionElement::SpreadElement(spread) => {
                        for_each_subexpression(&spread.argument, f);
                    }
                    oxc_ast::ast::ArrayExpressionElement::Elision(_) => {}
                    _ => {
                        if let Some(expr) = element.as_expression() {
                            for_each_subexpression(expr, f);
                        }
                    }
                }
            }
        }
        Expression::ObjectExpression(obj) => {
            for prop in &obj.properties {
                match prop {
                    ObjectPropertyKind::ObjectProperty(p) => for_each_subexpression(&p.value, f),
                    ObjectPropertyKind::SpreadProperty(spread) => {
                        for_each_subexpression(&spread.argument, f);
                    }
                }
            }
        }
        Expression::TemplateLiteral(template) => {
            for expr in &template.expressions {
                for_each_subexpression(expr, f);
            }
        }
        Expression::ParenthesizedExpression(paren) => {
            for_each_subexpression(&paren.expression, f);
        }
        Expression::TSAsExpression(inner) => for_each_subexpression(&inner.expression, f),
        Expression::TSNonNullExpression(inner) => for_each_subexpression(&inner.expression, f),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzed(source: &str, check: impl FnOnce(&ScriptAnalysis<'_>)) {
        let allocator = Allocator::default();
        let source_type = SourceType::from_path("test.ts").unwrap_or_default();
        let ret = Parser::new(&allocator, source, source_type).parse();
        assert!(!ret.panicked);
        let analysis = ScriptAnalysis::build(&ret.program);
        check(&analysis);
    }

    #[test]
    fn template_sees_script_bindings() {
        analyzed("const count = ref(0)", |analysis| {
            let stack = TemplateScopeStack::default();
            let origin = resolve_template_expression(&stack, Some(analysis), "count");
            assert!(origin.may_be_ref());
        });
    }

    #[test]
    fn template_sees_props_by_name() {
        analyzed("const props = defineProps(['value'])", |analysis| {
            let stack = TemplateScopeStack::default();
            let origin = resolve_template_expression(&stack, Some(analysis), "value");
            assert!(origin.is_definitely_prop());

            let origin = resolve_template_expression(&stack, Some(analysis), "props.value");
            assert!(origin.is_definitely_prop());
        });
    }

    #[test]
    fn frames_shadow_props_and_script() {
        analyzed("const props = defineProps(['item'])", |analysis| {
            let mut stack = TemplateScopeStack::default();
            stack.push(TemplateFrame::from_names(["item"]));
            let origin = resolve_template_expression(&stack, Some(analysis), "item.label");
            assert!(!origin.is_definitely_prop());
            stack.pop();
            let origin = resolve_template_expression(&stack, Some(analysis), "item.label");
            assert!(origin.is_definitely_prop());
        });
    }

    #[test]
    fn write_scan_catches_mutating_method_calls() {
        analyzed("const props = defineProps(['items'])", |analysis| {
            let stack = TemplateScopeStack::default();
            let writes = template_write_targets(&stack, Some(analysis), "items.shift()");
            assert_eq!(writes.len(), 1);
            assert!(writes[0].deep);
            assert!(writes[0].origin.is_definitely_prop());

            let writes = template_write_targets(&stack, Some(analysis), "items.map(x => x)");
            assert!(writes.is_empty());
        });
    }

    #[test]
    fn missing_script_region_resolves_unknown() {
        let stack = TemplateScopeStack::default();
        let origin = resolve_template_expression(&stack, None, "anything.at.all");
        assert_eq!(origin, Origin::Unknown);
    }
}
