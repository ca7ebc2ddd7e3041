//! no-multiple-slot-args
//!
//! Disallow passing more than one argument to a slot function. A slot
//! accepts a single scope object; extra arguments are silently
//! dropped.
//!
//! ## Examples
//!
//! ### Invalid
//! ```vue
//! <script>
//! export default {
//!   render() {
//!     return this.$scopedSlots.default(foo, bar)
//!   },
//! }
//! </script>
//! ```
//!
//! ### Valid
//! ```vue
//! <script>
//! export default {
//!   render() {
//!     return this.$scopedSlots.default({ foo, bar })
//!   },
//! }
//! </script>
//! ```

use oxc_ast::ast::{Argument, CallExpression, ChainElement, Expression};
use oxc_span::GetSpan;
use sgraffito_origin::macros::unwrap_expression;
use sgraffito_origin::{PathSeg, ScriptAnalysis, UsageNode, UsageRole};

use crate::context::LintContext;
use crate::diagnostic::{LintDiagnostic, Severity};
use crate::rule::{Rule, RuleCategory, RuleMeta};

static META: RuleMeta = RuleMeta {
    name: "no-multiple-slot-args",
    description: "Disallow passing multiple arguments to a slot function",
    category: RuleCategory::Recommended,
    fixable: false,
    default_severity: Severity::Warning,
};

fn is_slot_bag(path: &[PathSeg]) -> bool {
    matches!(path.first(), Some(PathSeg::Key(key)) if key == "$slots" || key == "$scopedSlots")
}

/// True when the call invokes a slot function: a member of the
/// instance's slot bag, or a binding aliasing one.
fn calls_slot_function<'a>(analysis: &ScriptAnalysis<'a>, call: &'a CallExpression<'a>) -> bool {
    let object_origin = match unwrap_expression(&call.callee) {
        Expression::StaticMemberExpression(member) => analysis.resolve_expression(&member.object),
        Expression::ComputedMemberExpression(member) => analysis.resolve_expression(&member.object),
        Expression::ChainExpression(chain) => match &chain.expression {
            ChainElement::StaticMemberExpression(member) => {
                analysis.resolve_expression(&member.object)
            }
            ChainElement::ComputedMemberExpression(member) => {
                analysis.resolve_expression(&member.object)
            }
            _ => return false,
        },
        // `const bar = this.$slots.bar; bar(...)` resolves the alias
        // straight to the slot function.
        ident @ Expression::Identifier(_) => {
            let origin = analysis.resolve_expression(ident);
            return matches!(
                origin.as_self_path(),
                Some(path) if path.len() == 2 && is_slot_bag(path)
            );
        }
        _ => return false,
    };
    matches!(
        object_origin.as_self_path(),
        Some(path) if path.len() == 1 && is_slot_bag(path)
    )
}

pub struct NoMultipleSlotArgs;

impl Rule for NoMultipleSlotArgs {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn run_on_script(&self, ctx: &mut LintContext<'_>) {
        let Some(analysis) = ctx.analysis() else {
            return;
        };
        for site in analysis.usages() {
            if site.role != UsageRole::Call {
                continue;
            }
            let UsageNode::Call(call) = site.node else {
                continue;
            };
            if !calls_slot_function(analysis, call) {
                continue;
            }
            if call.arguments.len() >= 2 {
                let start = call.arguments[1].span().start;
                let end = call
                    .arguments
                    .last()
                    .map(|arg| arg.span().end)
                    .unwrap_or(call.span.end);
                ctx.report(LintDiagnostic::warn(
                    META.name,
                    "Unexpected multiple arguments.",
                    start,
                    end,
                ));
            } else if let Some(Argument::SpreadElement(spread)) = call.arguments.first() {
                ctx.report(LintDiagnostic::warn(
                    META.name,
                    "Unexpected spread argument.",
                    spread.span.start,
                    spread.span.end,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::CompactString;

    #[test]
    fn meta() {
        assert_eq!(NoMultipleSlotArgs.meta().name, "no-multiple-slot-args");
        assert!(!NoMultipleSlotArgs.meta().fixable);
    }

    #[test]
    fn slot_bag_roots() {
        let path = [PathSeg::Key(CompactString::new("$slots"))];
        assert!(is_slot_bag(&path));
        let path = [PathSeg::Key(CompactString::new("$attrs"))];
        assert!(!is_slot_bag(&path));
    }
}
