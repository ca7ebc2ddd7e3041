//! Rule trait and registry.

use sgraffito_template::{DirectiveNode, ElementNode, InterpolationNode};

use crate::context::LintContext;
use crate::diagnostic::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    /// Prevent errors; on by default.
    Essential,
    /// Consistency and migration hygiene.
    Recommended,
}

pub struct RuleMeta {
    /// Rule name as used in reports and rule filters
    pub name: &'static str,
    pub description: &'static str,
    pub category: RuleCategory,
    /// Whether the rule can emit auto-fixes
    pub fixable: bool,
    pub default_severity: Severity,
}

/// A lint rule. The script hook runs once per file after script
/// analysis; the template hooks are driven by the template walk, with
/// scope frames already pushed for the current element.
pub trait Rule: Send + Sync {
    fn meta(&self) -> &'static RuleMeta;

    /// Called once per file when a script region was analyzed.
    #[allow(unused_variables)]
    fn run_on_script(&self, ctx: &mut LintContext<'_>) {}

    /// Called for each directive on each template element.
    #[allow(unused_variables)]
    fn check_directive(
        &self,
        ctx: &mut LintContext<'_>,
        element: &ElementNode,
        directive: &DirectiveNode,
    ) {
    }

    /// Called for each `{{ ... }}` interpolation.
    #[allow(unused_variables)]
    fn check_interpolation(&self, ctx: &mut LintContext<'_>, interpolation: &InterpolationNode) {}
}

/// Registry holding the rules for a lint run.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// The essential rules plus migration hygiene, with default
    /// configuration.
    pub fn with_recommended() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(crate::rules::RefNeedsValue));
        registry.register(Box::new(crate::rules::NoPropMutation::default()));
        registry.register(Box::new(crate::rules::NoDeprecatedInstanceMembers));
        registry.register(Box::new(crate::rules::NoMultipleSlotArgs));
        registry
    }

    /// Every built-in rule. Currently the same set as
    /// [`with_recommended`](Self::with_recommended).
    pub fn with_all() -> Self {
        Self::with_recommended()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_recommended()
    }
}
