//! no-prop-mutation
//!
//! Disallow writing to component props. Props flow one way; a child
//! that writes to them either loses the write on the next parent
//! render or corrupts parent state through a shared object.
//!
//! ## Examples
//!
//! ### Invalid
//! ```vue
//! <script setup>
//! const props = defineProps(['count', 'items'])
//! props.count = 5
//! props.items.push('new')
//! const { count } = props
//! count++
//! </script>
//!
//! <template>
//!   <input v-model="count" />
//! </template>
//! ```
//!
//! ### Valid
//! ```vue
//! <script setup>
//! const props = defineProps(['initial'])
//! const count = ref(props.initial)
//! const copy = props.items.slice(0)
//! copy.push('new')
//! </script>
//! ```
//!
//! With `shallow_only` set, only whole-prop reassignment is reported;
//! nested writes and mutating method calls pass.

use compact_str::CompactString;
use oxc_ast::ast::{ChainElement, Expression};
use sgraffito_origin::macros::unwrap_expression;
use sgraffito_origin::{
    Origin, PathSeg, ScriptAnalysis, UsageNode, UsageRole, MUTATING_METHODS,
};
use sgraffito_template::{DirectiveNode, ElementNode, InterpolationNode};

use crate::context::LintContext;
use crate::diagnostic::{LintDiagnostic, Severity};
use crate::rule::{Rule, RuleCategory, RuleMeta};

static META: RuleMeta = RuleMeta {
    name: "no-prop-mutation",
    description: "Disallow mutating component props",
    category: RuleCategory::Essential,
    fixable: false,
    default_severity: Severity::Error,
};

#[derive(Default)]
pub struct NoPropMutation {
    /// Report only whole-prop reassignment.
    pub shallow_only: bool,
}

impl NoPropMutation {
    fn report_prop(
        &self,
        ctx: &mut LintContext<'_>,
        origin: &Origin,
        start: u32,
        end: u32,
        deep: bool,
    ) {
        if !origin.is_definitely_prop() {
            return;
        }
        let Some((path, _)) = origin.as_prop() else {
            return;
        };
        if self.shallow_only && (deep || path.len() > 1) {
            return;
        }
        let name = match path.first() {
            Some(PathSeg::Key(key)) => key.clone(),
            Some(PathSeg::Wildcard) => CompactString::new("[computed key]"),
            None => CompactString::new("props"),
        };
        ctx.report(
            LintDiagnostic::error(
                META.name,
                format!("Unexpected mutation of \"{name}\" prop."),
                start,
                end,
            )
            .with_help("Emit an event and let the owning component change the value."),
        );
    }

    /// A call whose callee is a mutating method on a prop, like
    /// `props.items.push(x)`.
    fn check_call<'a>(
        &self,
        ctx: &mut LintContext<'_>,
        analysis: &ScriptAnalysis<'a>,
        call: &'a oxc_ast::ast::CallExpression<'a>,
    ) {
        let receiver = match unwrap_expression(&call.callee) {
            Expression::StaticMemberExpression(member)
                if MUTATING_METHODS.contains(member.property.name.as_str()) =>
            {
                &member.object
            }
            Expression::ChainExpression(chain) => match &chain.expression {
                ChainElement::StaticMemberExpression(member)
                    if MUTATING_METHODS.contains(member.property.name.as_str()) =>
                {
                    &member.object
                }
                _ => return,
            },
            _ => return,
        };
        let origin = analysis.canonicalize(analysis.resolve_expression(receiver));
        self.report_prop(ctx, &origin, call.span.start, call.span.end, true);
    }

    /// Writes hide in any template expression, not just handler
    /// bodies: `v-if="count++"` updates in place and
    /// `v-text="items.shift()"` mutates through a method.
    fn check_written_expression(&self, ctx: &mut LintContext<'_>, content: &str, offset: u32) {
        for write in ctx.template_writes(content) {
            let start = offset + write.span.start;
            let end = offset + write.span.end;
            self.report_prop(ctx, &write.origin, start, end, write.deep);
        }
    }
}

impl Rule for NoPropMutation {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn run_on_script(&self, ctx: &mut LintContext<'_>) {
        let Some(analysis) = ctx.analysis() else {
            return;
        };
        for site in analysis.usages() {
            match (site.node, site.role) {
                // A plain reassignment rewrites the binding's origin,
                // so only declaration-time writes decide whether the
                // target was a prop.
                (UsageNode::Ident { name, span }, UsageRole::WriteTarget) => {
                    let origin =
                        analysis.canonicalize(analysis.resolve_name_declared(name, span.start));
                    self.report_prop(ctx, &origin, span.start, span.end, false);
                }
                (
                    UsageNode::Ident { name, span },
                    UsageRole::CompoundWriteTarget | UsageRole::UpdateOperand,
                ) => {
                    let origin = analysis.canonicalize(analysis.resolve_name(name, span.start));
                    self.report_prop(ctx, &origin, span.start, span.end, false);
                }
                (
                    UsageNode::StaticMember(member),
                    UsageRole::WriteTarget
                    | UsageRole::CompoundWriteTarget
                    | UsageRole::UpdateOperand
                    | UsageRole::DeleteOperand,
                ) => {
                    let origin = analysis.canonicalize(analysis.resolve_static_member(member));
                    self.report_prop(ctx, &origin, member.span.start, member.span.end, false);
                }
                (
                    UsageNode::ComputedMember(member),
                    UsageRole::WriteTarget
                    | UsageRole::CompoundWriteTarget
                    | UsageRole::UpdateOperand
                    | UsageRole::DeleteOperand,
                ) => {
                    let origin = analysis.canonicalize(analysis.resolve_computed_member(member));
                    self.report_prop(ctx, &origin, member.span.start, member.span.end, false);
                }
                (UsageNode::Call(call), UsageRole::Call) => {
                    self.check_call(ctx, analysis, call);
                }
                _ => {}
            }
        }
    }

    fn check_directive(
        &self,
        ctx: &mut LintContext<'_>,
        _element: &ElementNode,
        directive: &DirectiveNode,
    ) {
        let Some(exp) = &directive.expression else {
            return;
        };
        if directive.name == "model" {
            let origin = ctx.resolve_template(&exp.content);
            self.report_prop(ctx, &origin, exp.span.start, exp.span.end, false);
        }
        self.check_written_expression(ctx, &exp.content, exp.span.start);
    }

    fn check_interpolation(&self, ctx: &mut LintContext<'_>, interpolation: &InterpolationNode) {
        let exp = &interpolation.expression;
        self.check_written_expression(ctx, &exp.content, exp.span.start);
    }
}
