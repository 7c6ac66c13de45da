use crate::model::{CheckKind, IntegrityReport, ReportSource};

/// Render a deterministic markdown report.
pub fn render_report(report: &IntegrityReport, max_examples: usize) -> String {
    let mut lines = Vec::new();

    lines.push("# Feastgen Integrity Report".to_string());
    lines.push(String::new());
    let source = match report.source {
        ReportSource::Dataset => "dataset",
        ReportSource::Export => "export",
    };
    lines.push(format!("- source: {source}"));
    lines.push(format!("- violations: {}", report.violation_count()));
    lines.push(String::new());

    lines.push("## Row counts".to_string());
    lines.push("| table | rows |".to_string());
    lines.push("| --- | --- |".to_string());
    for (table, rows) in report.counts.by_table() {
        lines.push(format!("| {table} | {rows} |"));
    }
    lines.push(String::new());

    lines.push("## Checks".to_string());
    lines.push("| check | checked | violations |".to_string());
    lines.push("| --- | --- | --- |".to_string());
    for check in CheckKind::ALL {
        match report.checks.get(&check) {
            Some(summary) => lines.push(format!(
                "| {} | {} | {} |",
                check, summary.checked, summary.violations
            )),
            None => lines.push(format!("| {check} | - | - |")),
        }
    }
    lines.push(String::new());

    if !report.skipped.is_empty() {
        lines.push("## Skipped".to_string());
        for reason in &report.skipped {
            lines.push(format!("- {reason}"));
        }
        lines.push(String::new());
    }

    if !report.violations.is_empty() {
        lines.push("## Top violations".to_string());
        for violation in report.violations.iter().take(max_examples) {
            lines.push(format!(
                "- [{}] {}: {}",
                violation.code, violation.path, violation.message
            ));
        }
        let hidden = report.violations.len().saturating_sub(max_examples);
        if hidden > 0 {
            lines.push(format!("- ... and {hidden} more"));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
