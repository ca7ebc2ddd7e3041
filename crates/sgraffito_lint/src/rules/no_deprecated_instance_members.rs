//! no-deprecated-instance-members
//!
//! Flag instance members that were removed from the component API.
//! `$scopedSlots` merged into `$slots`, `$listeners` merged into
//! `$attrs`, and the `$on` family of event emitter methods is gone.
//!
//! ## Examples
//!
//! ### Invalid
//! ```vue
//! <script>
//! export default {
//!   render() {
//!     return this.$scopedSlots.default()
//!   },
//!   mounted() {
//!     this.$on('refresh', this.reload)
//!   },
//! }
//! </script>
//!
//! <template>
//!   <child v-bind="$listeners" />
//! </template>
//! ```
//!
//! `$scopedSlots` carries a fix that rewrites it to `$slots`; the
//! others have no mechanical replacement.

use sgraffito_origin::UsageNode;
use sgraffito_template::{DirectiveNode, ElementNode, InterpolationNode};

use crate::context::LintContext;
use crate::diagnostic::{Fix, LintDiagnostic, Severity, TextEdit};
use crate::rule::{Rule, RuleCategory, RuleMeta};

static META: RuleMeta = RuleMeta {
    name: "no-deprecated-instance-members",
    description: "Disallow instance members removed from the component API",
    category: RuleCategory::Recommended,
    fixable: true,
    default_severity: Severity::Warning,
};

struct Deprecated {
    message: &'static str,
    replacement: Option<&'static str>,
}

static DEPRECATED_MEMBERS: phf::Map<&'static str, Deprecated> = phf::phf_map! {
    "$scopedSlots" => Deprecated {
        message: "The `$scopedSlots` is deprecated.",
        replacement: Some("$slots"),
    },
    "$listeners" => Deprecated {
        message: "The `$listeners` is deprecated.",
        replacement: None,
    },
    "$on" => Deprecated {
        message: "The Events api `$on`, `$off` `$once` is deprecated. Using external library instead, for example mitt.",
        replacement: None,
    },
    "$off" => Deprecated {
        message: "The Events api `$on`, `$off` `$once` is deprecated. Using external library instead, for example mitt.",
        replacement: None,
    },
    "$once" => Deprecated {
        message: "The Events api `$on`, `$off` `$once` is deprecated. Using external library instead, for example mitt.",
        replacement: None,
    },
};

pub struct NoDeprecatedInstanceMembers;

impl NoDeprecatedInstanceMembers {
    fn report(&self, ctx: &mut LintContext<'_>, dep: &Deprecated, start: u32, end: u32) {
        let mut diagnostic = LintDiagnostic::warn(META.name, dep.message, start, end);
        if let Some(replacement) = dep.replacement {
            diagnostic = diagnostic.with_fix(Fix::new(
                format!("Replace with `{replacement}`"),
                TextEdit::replace(start, end, replacement),
            ));
        }
        ctx.report(diagnostic);
    }

    fn scan_expression(&self, ctx: &mut LintContext<'_>, content: &str, base: u32) {
        for (name, span) in ctx.template_members(content) {
            if let Some(dep) = DEPRECATED_MEMBERS.get(name.as_str()) {
                self.report(ctx, dep, base + span.start, base + span.end);
            }
        }
    }
}

impl Rule for NoDeprecatedInstanceMembers {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn run_on_script(&self, ctx: &mut LintContext<'_>) {
        let Some(analysis) = ctx.analysis() else {
            return;
        };
        for site in analysis.usages() {
            let UsageNode::StaticMember(member) = site.node else {
                continue;
            };
            let Some(dep) = DEPRECATED_MEMBERS.get(member.property.name.as_str()) else {
                continue;
            };
            // Only members looked up on the instance itself count;
            // `other.$listeners` is someone else's problem.
            let object = analysis.resolve_expression(&member.object);
            if !matches!(object.as_self_path(), Some(path) if path.is_empty()) {
                continue;
            }
            self.report(ctx, dep, member.property.span.start, member.property.span.end);
        }
    }

    fn check_directive(
        &self,
        ctx: &mut LintContext<'_>,
        _element: &ElementNode,
        directive: &DirectiveNode,
    ) {
        if let Some(exp) = &directive.expression {
            self.scan_expression(ctx, &exp.content, exp.span.start);
        }
    }

    fn check_interpolation(&self, ctx: &mut LintContext<'_>, interpolation: &InterpolationNode) {
        let exp = &interpolation.expression;
        self.scan_expression(ctx, &exp.content, exp.span.start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta() {
        assert_eq!(
            NoDeprecatedInstanceMembers.meta().name,
            "no-deprecated-instance-members"
        );
        assert_eq!(
            NoDeprecatedInstanceMembers.meta().default_severity,
            Severity::Warning
        );
    }

    #[test]
    fn scoped_slots_has_replacement() {
        let dep = DEPRECATED_MEMBERS.get("$scopedSlots").unwrap();
        assert_eq!(dep.replacement, Some("$slots"));
        assert!(DEPRECATED_MEMBERS.get("$on").unwrap().replacement.is_none());
    }
}
