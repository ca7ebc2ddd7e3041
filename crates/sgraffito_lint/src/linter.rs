//! Main linter entry point.
//!
//! Splits a component file into its script and template regions, runs
//! script analysis and the rule hooks over each, and collects the
//! diagnostics with file-level byte offsets.

use memchr::memmem;
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use rustc_hash::FxHashSet;
use sgraffito_origin::ScriptAnalysis;
use sgraffito_template::parse_template;

use crate::context::LintContext;
use crate::diagnostic::{LintDiagnostic, LintSummary};
use crate::rule::RuleRegistry;
use crate::visitor::LintVisitor;

/// Lint result for a single file.
#[derive(Debug, Clone)]
pub struct LintResult {
    pub filename: String,
    pub diagnostics: Vec<LintDiagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

impl LintResult {
    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    #[inline]
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// One top-level region of a component file. `content` is a slice of
/// the original source; `offset` is where it starts.
struct Region<'s> {
    content: &'s str,
    offset: u32,
    /// Raw attribute text of the opening tag.
    attrs: &'s str,
}

pub struct Linter {
    registry: RuleRegistry,
    /// When set, only these rules report.
    enabled_rules: Option<FxHashSet<String>>,
}

impl Linter {
    #[inline]
    pub fn new() -> Self {
        Self {
            registry: RuleRegistry::with_recommended(),
            enabled_rules: None,
        }
    }

    #[inline]
    pub fn with_registry(registry: RuleRegistry) -> Self {
        Self {
            registry,
            enabled_rules: None,
        }
    }

    #[inline]
    pub fn with_enabled_rules(mut self, rules: Option<Vec<String>>) -> Self {
        self.enabled_rules = rules.map(|names| names.into_iter().collect());
        self
    }

    #[inline]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        match &self.enabled_rules {
            Some(set) => set.contains(rule_name),
            None => true,
        }
    }

    #[inline]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    #[inline]
    pub fn rules(&self) -> &[Box<dyn crate::rule::Rule>] {
        self.registry.rules()
    }

    /// Lint one component file. The regions are independent: a script
    /// that fails to parse never blocks template linting, it only
    /// withholds script analysis from the template rules.
    pub fn lint_sfc(&self, source: &str, filename: &str) -> LintResult {
        let allocator = Allocator::default();

        let script = find_region(source, "script");
        let parsed = script.as_ref().map(|region| {
            Parser::new(&allocator, region.content, script_source_type(region.attrs)).parse()
        });
        let analysis = match parsed.as_ref() {
            Some(ret) if !ret.panicked => Some(ScriptAnalysis::build(&ret.program)),
            _ => None,
        };

        let mut ctx = LintContext::new(source, filename);
        ctx.set_enabled_rules(self.enabled_rules.clone());
        ctx.set_analysis(analysis.as_ref());

        if let (Some(region), Some(_)) = (script.as_ref(), analysis.as_ref()) {
            ctx.set_region_offset(region.offset);
            for rule in self.registry.rules() {
                rule.run_on_script(&mut ctx);
            }
        }

        if let Some(region) = find_region(source, "template") {
            let (root, _errors) = parse_template(region.content);
            ctx.set_region_offset(region.offset);
            let mut visitor = LintVisitor::new(&mut ctx, self.registry.rules());
            visitor.visit_root(&root);
        }

        let mut error_count = ctx.error_count();
        let warning_count = ctx.warning_count();
        let mut diagnostics = ctx.into_diagnostics();

        // A panicked script parse is always surfaced, rule filter or
        // not.
        if let (Some(region), Some(ret)) = (script.as_ref(), parsed.as_ref()) {
            if ret.panicked {
                let message = match ret.errors.first() {
                    Some(error) => format!("{error}"),
                    None => "script region failed to parse".to_string(),
                };
                diagnostics.push(LintDiagnostic::error(
                    "parse-error",
                    message,
                    region.offset,
                    region.offset,
                ));
                error_count += 1;
            }
        }

        diagnostics.sort_by_key(|diagnostic| (diagnostic.start, diagnostic.end));

        LintResult {
            filename: filename.to_string(),
            diagnostics,
            error_count,
            warning_count,
        }
    }

    /// Lint multiple files and aggregate the counts.
    pub fn lint_files(&self, files: &[(String, String)]) -> (Vec<LintResult>, LintSummary) {
        let mut results = Vec::with_capacity(files.len());
        let mut summary = LintSummary::default();
        for (filename, source) in files {
            let result = self.lint_sfc(source, filename);
            summary.error_count += result.error_count;
            summary.warning_count += result.warning_count;
            results.push(result);
        }
        summary.file_count = files.len();
        (results, summary)
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}

fn script_source_type(attrs: &str) -> SourceType {
    let path = if attrs.contains("lang=\"ts\"") || attrs.contains("lang='ts'") {
        "component.ts"
    } else {
        "component.js"
    };
    SourceType::from_path(path).unwrap_or_default()
}

/// Find the content of a top-level `<tag>...</tag>` region. Nested
/// occurrences of the same tag are depth-counted so a `<template>`
/// element inside the root template region does not end it early.
fn find_region<'s>(source: &'s str, tag: &str) -> Option<Region<'s>> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let bytes = source.as_bytes();

    let mut search = 0usize;
    let start_idx = loop {
        let found = search + memmem::find(&bytes[search..], open.as_bytes())?;
        // Reject prefixes like `<template-part`.
        match bytes.get(found + open.len()) {
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'/') => {
                break found;
            }
            _ => search = found + open.len(),
        }
    };

    let tag_close = memchr::memchr(b'>', &bytes[start_idx..])? + start_idx;
    if bytes[..tag_close].ends_with(b"/") {
        return None;
    }
    let attrs = &source[start_idx + open.len()..tag_close];
    let content_start = tag_close + 1;

    let slice = &source[content_start..];
    let mut depth = 1usize;
    let mut pos = 0usize;
    while depth > 0 {
        let next_open = memmem::find(&slice.as_bytes()[pos..], open.as_bytes());
        let next_close = memmem::find(&slice.as_bytes()[pos..], close.as_bytes());
        match (next_open, next_close) {
            (Some(open_at), Some(close_at)) if open_at < close_at => {
                let open_abs = pos + open_at;
                let end = match memchr::memchr(b'>', &slice.as_bytes()[open_abs..]) {
                    Some(offset) => open_abs + offset,
                    None => slice.len(),
                };
                if !slice.as_bytes()[..end].ends_with(b"/") {
                    depth += 1;
                }
                pos = (end + 1).min(slice.len());
            }
            (_, Some(close_at)) => {
                depth -= 1;
                if depth == 0 {
                    let content_end = content_start + pos + close_at;
                    return Some(Region {
                        content: &source[content_start..content_end],
                        offset: content_start as u32,
                        attrs,
                    });
                }
                pos += close_at + close.len();
            }
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_script_and_template_regions() {
        let source = "<script setup>\nlet x = 1\n</script>\n<template>\n  <div />\n</template>\n";
        let script = find_region(source, "script").unwrap();
        assert_eq!(script.content, "\nlet x = 1\n");
        assert_eq!(script.attrs.trim(), "setup");
        let template = find_region(source, "template").unwrap();
        assert_eq!(template.content, "\n  <div />\n");
        assert_eq!(&source[template.offset as usize..][..5], "\n  <d");
    }

    #[test]
    fn nested_template_elements_do_not_end_the_region() {
        let source = "<template><div><template #x><p /></template></div></template>";
        let region = find_region(source, "template").unwrap();
        assert_eq!(region.content, "<div><template #x><p /></template></div>");
    }

    #[test]
    fn typescript_lang_attribute_selects_ts_parsing() {
        assert!(script_source_type(" setup lang=\"ts\"").is_typescript());
        assert!(!script_source_type(" setup").is_typescript());
    }

    #[test]
    fn missing_regions_yield_empty_result() {
        let result = Linter::new().lint_sfc("just text", "plain.vue");
        assert!(!result.has_diagnostics());
    }
}
