//! Output formatters for lint diagnostics.

mod text;

pub use text::*;

use memchr::memchr_iter;
use serde::Serialize;

use crate::linter::LintResult;

/// Output format for lint results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Rich terminal output with code snippets
    #[default]
    Text,
    /// JSON output for tooling integration
    Json,
}

/// Format lint results according to the specified format.
pub fn format_results(
    results: &[LintResult],
    sources: &[(String, String)],
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => format_text(results, sources),
        OutputFormat::Json => format_json(results, sources),
    }
}

/// JSON output structure for a single file
#[derive(Debug, Serialize)]
pub struct JsonFileResult {
    pub file: String,
    pub messages: Vec<JsonMessage>,
    #[serde(rename = "errorCount")]
    pub error_count: usize,
    #[serde(rename = "warningCount")]
    pub warning_count: usize,
}

/// JSON output structure for a single message
#[derive(Debug, Serialize)]
pub struct JsonMessage {
    #[serde(rename = "ruleId")]
    pub rule_id: &'static str,
    pub severity: u8,
    pub message: String,
    pub line: u32,
    pub column: u32,
    #[serde(rename = "endLine")]
    pub end_line: u32,
    #[serde(rename = "endColumn")]
    pub end_column: u32,
    pub fixable: bool,
}

/// One-based line and column for a byte offset.
fn line_column(source: &str, offset: u32) -> (u32, u32) {
    let offset = (offset as usize).min(source.len());
    let mut line = 1u32;
    let mut line_start = 0usize;
    for newline in memchr_iter(b'\n', &source.as_bytes()[..offset]) {
        line += 1;
        line_start = newline + 1;
    }
    (line, (offset - line_start) as u32 + 1)
}

fn format_json(results: &[LintResult], sources: &[(String, String)]) -> String {
    let json_results: Vec<JsonFileResult> = results
        .iter()
        .map(|result| {
            let source = sources
                .iter()
                .find(|(filename, _)| filename == &result.filename)
                .map(|(_, source)| source.as_str())
                .unwrap_or("");
            JsonFileResult {
                file: result.filename.clone(),
                messages: result
                    .diagnostics
                    .iter()
                    .map(|diagnostic| {
                        let (line, column) = line_column(source, diagnostic.start);
                        let (end_line, end_column) = line_column(source, diagnostic.end);
                        JsonMessage {
                            rule_id: diagnostic.rule_name,
                            severity: match diagnostic.severity {
                                crate::diagnostic::Severity::Error => 2,
                                crate::diagnostic::Severity::Warning => 1,
                            },
                            message: diagnostic.message.to_string(),
                            line,
                            column,
                            end_line,
                            end_column,
                            fixable: diagnostic.has_fix(),
                        }
                    })
                    .collect(),
                error_count: result.error_count,
                warning_count: result.warning_count,
            }
        })
        .collect();

    serde_json::to_string_pretty(&json_results).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_column_counts_from_one() {
        let source = "ab\ncd\nef";
        assert_eq!(line_column(source, 0), (1, 1));
        assert_eq!(line_column(source, 3), (2, 1));
        assert_eq!(line_column(source, 7), (3, 2));
    }

    #[test]
    fn json_output_shape() {
        let results = vec![LintResult {
            filename: "app.vue".to_string(),
            diagnostics: Vec::new(),
            error_count: 0,
            warning_count: 0,
        }];
        let sources = vec![("app.vue".to_string(), String::new())];
        let json = format_json(&results, &sources);
        assert!(json.contains("\"errorCount\": 0"));
        assert!(json.contains("\"file\": \"app.vue\""));
    }
}
