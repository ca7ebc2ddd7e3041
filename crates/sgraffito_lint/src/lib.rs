//! # sgraffito_lint
//!
//! Origin-aware linter for dual-region component files.
//!
//! ## Name Origin
//!
//! **Sgraffito** (/zɡrafˈfiːto/) is the ceramic technique of scratching
//! through a surface layer to reveal the ground beneath it. The linter
//! works the same way: it scratches through the syntax of a component
//! file to the origin of each value, and judges the code by what it
//! finds underneath.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sgraffito_lint::{format_results, Linter, OutputFormat};
//!
//! let linter = Linter::new();
//! let source = std::fs::read_to_string("counter.vue")?;
//! let result = linter.lint_sfc(&source, "counter.vue");
//!
//! if result.has_diagnostics() {
//!     let sources = vec![("counter.vue".to_string(), source)];
//!     println!("{}", format_results(&[result], &sources, OutputFormat::Text));
//! }
//! ```
//!
//! ## Rules
//!
//! - `ref-needs-value` - Require `.value` when a reactive wrapper is
//!   used as an operand
//! - `no-prop-mutation` - Disallow mutating component props
//! - `no-deprecated-instance-members` - Disallow instance members
//!   removed from the component API
//! - `no-multiple-slot-args` - Disallow passing multiple arguments to
//!   a slot function
//!
//! Every rule resolves origins through `sgraffito_origin`, so aliased
//! and destructured values are still caught, and values the analysis
//! cannot pin down never produce findings.

mod context;
mod diagnostic;
mod linter;
mod output;
mod rule;
mod rules;
mod visitor;

pub use context::LintContext;
pub use diagnostic::{Fix, LintDiagnostic, LintSummary, Severity, TextEdit};
pub use linter::{LintResult, Linter};
pub use output::{format_results, format_summary, format_text, JsonFileResult, JsonMessage, OutputFormat};
pub use rule::{Rule, RuleCategory, RuleMeta, RuleRegistry};
pub use rules::{NoDeprecatedInstanceMembers, NoMultipleSlotArgs, NoPropMutation, RefNeedsValue};
pub use visitor::LintVisitor;
