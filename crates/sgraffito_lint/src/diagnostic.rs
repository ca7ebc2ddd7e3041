//! Diagnostic types produced by the lint rules.

use compact_str::CompactString;
use oxc_diagnostics::OxcDiagnostic;
use oxc_span::Span;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single text replacement in the source file.
#[derive(Debug, Clone, Serialize)]
pub struct TextEdit {
    /// Start byte offset
    pub start: u32,
    /// End byte offset
    pub end: u32,
    /// Replacement text
    pub new_text: String,
}

impl TextEdit {
    #[inline]
    pub fn new(start: u32, end: u32, new_text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            new_text: new_text.into(),
        }
    }

    #[inline]
    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::new(offset, offset, text)
    }

    #[inline]
    pub fn replace(start: u32, end: u32, text: impl Into<String>) -> Self {
        Self::new(start, end, text)
    }

    #[inline]
    pub fn delete(start: u32, end: u32) -> Self {
        Self::new(start, end, "")
    }
}

/// An auto-fix: a description plus the edits that realize it.
#[derive(Debug, Clone, Serialize)]
pub struct Fix {
    pub message: String,
    pub edits: Vec<TextEdit>,
}

impl Fix {
    #[inline]
    pub fn new(message: impl Into<String>, edit: TextEdit) -> Self {
        Self {
            message: message.into(),
            edits: vec![edit],
        }
    }

    /// Apply the fix to a source string. Edits are applied from the
    /// back of the file so earlier offsets stay valid.
    pub fn apply(&self, source: &str) -> String {
        let mut result = source.to_string();
        let mut edits = self.edits.clone();
        edits.sort_by(|a, b| b.start.cmp(&a.start));
        for edit in edits {
            let start = edit.start as usize;
            let end = edit.end as usize;
            if start <= result.len() && end <= result.len() {
                result.replace_range(start..end, &edit.new_text);
            }
        }
        result
    }
}

/// A lint finding with byte offsets into the original component file.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// Rule that produced this diagnostic
    pub rule_name: &'static str,
    pub severity: Severity,
    pub message: CompactString,
    /// Start byte offset in the component file
    pub start: u32,
    /// End byte offset in the component file
    pub end: u32,
    pub help: Option<CompactString>,
    pub fix: Option<Fix>,
}

impl LintDiagnostic {
    #[inline]
    pub fn error(
        rule_name: &'static str,
        message: impl Into<CompactString>,
        start: u32,
        end: u32,
    ) -> Self {
        Self {
            rule_name,
            severity: Severity::Error,
            message: message.into(),
            start,
            end,
            help: None,
            fix: None,
        }
    }

    #[inline]
    pub fn warn(
        rule_name: &'static str,
        message: impl Into<CompactString>,
        start: u32,
        end: u32,
    ) -> Self {
        Self {
            rule_name,
            severity: Severity::Warning,
            message: message.into(),
            start,
            end,
            help: None,
            fix: None,
        }
    }

    #[inline]
    pub fn with_help(mut self, help: impl Into<CompactString>) -> Self {
        self.help = Some(help.into());
        self
    }

    #[inline]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    #[inline]
    pub fn has_fix(&self) -> bool {
        self.fix.is_some()
    }

    /// Convert to an `OxcDiagnostic` for rich terminal rendering.
    pub fn into_oxc_diagnostic(self) -> OxcDiagnostic {
        let mut diag = match self.severity {
            Severity::Error => OxcDiagnostic::error(self.message.to_string()),
            Severity::Warning => OxcDiagnostic::warn(self.message.to_string()),
        };
        diag = diag.with_label(Span::new(self.start, self.end));
        if let Some(help) = self.help {
            diag = diag.with_help(help.to_string());
        }
        diag
    }
}

/// Aggregate counts across files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintSummary {
    pub error_count: usize,
    pub warning_count: usize,
    pub file_count: usize,
}

impl LintSummary {
    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_applies_edits_back_to_front() {
        let fix = Fix {
            message: "test".into(),
            edits: vec![TextEdit::insert(3, ".value"), TextEdit::insert(9, ".value")],
        };
        assert_eq!(fix.apply("foo + bar"), "foo.value + bar.value");
    }

    #[test]
    fn replace_edit() {
        let fix = Fix::new("swap", TextEdit::replace(0, 3, "baz"));
        assert_eq!(fix.apply("foo.bar"), "baz.bar");
    }
}
