//! Rich terminal output using oxc_diagnostics.

use std::sync::Arc;

use oxc_diagnostics::{GraphicalReportHandler, GraphicalTheme, NamedSource};

use crate::linter::LintResult;

/// Format lint results with source snippets.
pub fn format_text(results: &[LintResult], sources: &[(String, String)]) -> String {
    let mut output = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode());

    let source_map: std::collections::HashMap<&str, &str> = sources
        .iter()
        .map(|(filename, source)| (filename.as_str(), source.as_str()))
        .collect();

    for result in results {
        if result.diagnostics.is_empty() {
            continue;
        }

        let source = source_map
            .get(result.filename.as_str())
            .copied()
            .unwrap_or("");
        let named_source = Arc::new(NamedSource::new(&result.filename, source.to_string()));

        for diagnostic in &result.diagnostics {
            let report = diagnostic
                .clone()
                .into_oxc_diagnostic()
                .with_source_code(Arc::clone(&named_source));
            let mut buf = String::new();
            if handler.render_report(&mut buf, report.as_ref()).is_ok() {
                output.push_str(&buf);
                output.push('\n');
            }
        }
    }

    output
}

/// Format a summary line
pub fn format_summary(error_count: usize, warning_count: usize, file_count: usize) -> String {
    let mut parts = Vec::new();

    if error_count > 0 {
        parts.push(format!(
            "{} error{}",
            error_count,
            if error_count == 1 { "" } else { "s" }
        ));
    }
    if warning_count > 0 {
        parts.push(format!(
            "{} warning{}",
            warning_count,
            if warning_count == 1 { "" } else { "s" }
        ));
    }

    if parts.is_empty() {
        format!("No problems found in {} file(s)", file_count)
    } else {
        format!(
            "{} in {} file{}",
            parts.join(", "),
            file_count,
            if file_count == 1 { "" } else { "s" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_pluralizes() {
        assert_eq!(format_summary(1, 0, 1), "1 error in 1 file");
        assert_eq!(format_summary(2, 1, 3), "2 errors, 1 warning in 3 files");
        assert_eq!(format_summary(0, 0, 2), "No problems found in 2 file(s)");
    }
}
