//! Shared state handed to every rule during a lint run.

use rustc_hash::FxHashSet;
use sgraffito_origin::{
    resolve_template_expression, template_instance_members, template_write_targets, Origin,
    ScriptAnalysis, TemplateFrame, TemplateScopeStack, TemplateWrite,
};

use crate::diagnostic::{LintDiagnostic, Severity};

/// Lint context for one component file. Rules report through it and
/// query it for script analysis results and template scope state.
///
/// Spans inside a region are relative to that region's text; the
/// context carries the region's byte offset and rebases every reported
/// diagnostic so results always point into the original file.
pub struct LintContext<'a> {
    source: &'a str,
    filename: &'a str,
    analysis: Option<&'a ScriptAnalysis<'a>>,
    frames: TemplateScopeStack,
    /// Offset added to reported spans, set per region by the linter.
    region_offset: u32,
    diagnostics: Vec<LintDiagnostic>,
    error_count: usize,
    warning_count: usize,
    enabled_rules: Option<FxHashSet<String>>,
}

impl<'a> LintContext<'a> {
    pub fn new(source: &'a str, filename: &'a str) -> Self {
        Self {
            source,
            filename,
            analysis: None,
            frames: TemplateScopeStack::default(),
            region_offset: 0,
            diagnostics: Vec::new(),
            error_count: 0,
            warning_count: 0,
            enabled_rules: None,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn filename(&self) -> &'a str {
        self.filename
    }

    pub fn set_analysis(&mut self, analysis: Option<&'a ScriptAnalysis<'a>>) {
        self.analysis = analysis;
    }

    /// Script analysis, absent when the script region is missing or
    /// failed to parse. Template rules must keep working without it.
    pub fn analysis(&self) -> Option<&'a ScriptAnalysis<'a>> {
        self.analysis
    }

    pub fn set_enabled_rules(&mut self, rules: Option<FxHashSet<String>>) {
        self.enabled_rules = rules;
    }

    pub fn set_region_offset(&mut self, offset: u32) {
        self.region_offset = offset;
    }

    pub fn region_offset(&self) -> u32 {
        self.region_offset
    }

    // ---- template scope frames ----

    pub fn push_frame(&mut self, frame: TemplateFrame) {
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Resolve a template expression string against the current frames
    /// and the script analysis.
    pub fn resolve_template(&self, content: &str) -> Origin {
        resolve_template_expression(&self.frames, self.analysis, content)
    }

    /// Write targets inside a template expression.
    pub fn template_writes(&self, content: &str) -> Vec<TemplateWrite> {
        template_write_targets(&self.frames, self.analysis, content)
    }

    /// Instance member references inside a template expression.
    pub fn template_members(&self, content: &str) -> Vec<(compact_str::CompactString, oxc_span::Span)> {
        template_instance_members(&self.frames, content)
    }

    // ---- reporting ----

    /// Record a diagnostic, rebasing its spans by the current region
    /// offset. Skipped when the producing rule is filtered out.
    pub fn report(&mut self, mut diagnostic: LintDiagnostic) {
        if let Some(enabled) = &self.enabled_rules {
            if !enabled.contains(diagnostic.rule_name) {
                return;
            }
        }
        diagnostic.start += self.region_offset;
        diagnostic.end += self.region_offset;
        if let Some(fix) = &mut diagnostic.fix {
            for edit in &mut fix.edits {
                edit.start += self.region_offset;
                edit.end += self.region_offset;
            }
        }
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn into_diagnostics(self) -> Vec<LintDiagnostic> {
        self.diagnostics
    }
}
