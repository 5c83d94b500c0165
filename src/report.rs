use std::fmt::Write;

use serde_json::json;

use crate::models::RunSummary;

const MAX_REJECTION_LINES: usize = 10;

pub fn build_summary(summary: &RunSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Processed {}", summary.input.display());
    let _ = writeln!(
        output,
        "Signup window: {} to {} (inclusive)",
        summary.cutoff, summary.reference_date
    );
    let _ = writeln!(
        output,
        "Rows loaded: {}, rejected: {}, older than one year: {}, written: {}",
        summary.loaded,
        summary.rejected(),
        summary.filtered_out,
        summary.written
    );
    let _ = writeln!(output, "Output written to {}", summary.output.display());

    if !summary.rejections.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "Rejected rows:");
        for rejection in summary.rejections.iter().take(MAX_REJECTION_LINES) {
            let _ = writeln!(output, "- line {}: {}", rejection.line, rejection.error);
        }
        let hidden = summary.rejected().saturating_sub(MAX_REJECTION_LINES);
        if hidden > 0 {
            let _ = writeln!(output, "- ... and {hidden} more (see log)");
        }
    }

    output
}

pub fn summary_json(summary: &RunSummary) -> serde_json::Value {
    let rejections: Vec<serde_json::Value> = summary
        .rejections
        .iter()
        .map(|rejection| {
            json!({
                "line": rejection.line,
                "fields": rejection.error.fields(),
                "message": rejection.error.to_string(),
            })
        })
        .collect();

    json!({
        "input": summary.input.display().to_string(),
        "output": summary.output.display().to_string(),
        "reference_date": summary.reference_date,
        "cutoff": summary.cutoff,
        "loaded": summary.loaded,
        "rejected": summary.rejected(),
        "filtered_out": summary.filtered_out,
        "written": summary.written,
        "rejections": rejections,
    })
}
