//! ref-needs-value
//!
//! Require `.value` when a reactive wrapper object is used where its
//! payload is expected. Wrappers are truthy objects, so using one as
//! an operand or a condition almost always means the `.value` access
//! was forgotten.
//!
//! ## Examples
//!
//! ### Invalid
//! ```vue
//! <script setup>
//! const count = ref(0)
//! count++
//! if (count) { /* always true */ }
//! const doubled = count * 2
//! </script>
//! ```
//!
//! ### Valid
//! ```vue
//! <script setup>
//! const count = ref(0)
//! count.value++
//! if (count.value) { }
//! const doubled = count.value * 2
//! </script>
//! ```
//!
//! The rule only runs on the script region. Wrappers auto-unwrap in
//! template expressions, so `{{ count }}` is already correct.

use sgraffito_origin::{UsageNode, UsageRole};

use crate::context::LintContext;
use crate::diagnostic::{Fix, LintDiagnostic, Severity, TextEdit};
use crate::rule::{Rule, RuleCategory, RuleMeta};

static META: RuleMeta = RuleMeta {
    name: "ref-needs-value",
    description: "Require `.value` when a reactive wrapper is used as an operand",
    category: RuleCategory::Essential,
    fixable: true,
    default_severity: Severity::Error,
};

pub struct RefNeedsValue;

impl Rule for RefNeedsValue {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn run_on_script(&self, ctx: &mut LintContext<'_>) {
        let Some(analysis) = ctx.analysis() else {
            return;
        };
        for site in analysis.usages() {
            if !matches!(
                site.role,
                UsageRole::UpdateOperand
                    | UsageRole::CompoundWriteTarget
                    | UsageRole::UnaryOperand
                    | UsageRole::BinaryOperand
                    | UsageRole::ConditionTest
            ) {
                continue;
            }
            let UsageNode::Ident { name, span } = site.node else {
                continue;
            };
            let origin = analysis.resolve_name(name, span.start);
            let Some(kind) = origin.ref_kind() else {
                continue;
            };
            ctx.report(
                LintDiagnostic::error(
                    META.name,
                    format!(
                        "Must use `.value` to read or write the value wrapped by `{}()`.",
                        kind.producer()
                    ),
                    span.start,
                    span.end,
                )
                .with_fix(Fix::new(
                    format!("Change to `{name}.value`"),
                    TextEdit::insert(span.end, ".value"),
                )),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta() {
        assert_eq!(RefNeedsValue.meta().name, "ref-needs-value");
        assert_eq!(RefNeedsValue.meta().category, RuleCategory::Essential);
        assert!(RefNeedsValue.meta().fixable);
    }
}
