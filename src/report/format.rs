//! Formatted terminal output.
//!
//! Formatting lives here so the comparison code stays free of presentation
//! concerns and output changes stay localized.

use crate::compare::ComparisonSummary;
use crate::report::Violation;

/// Format the run summary (inputs, tolerances, verdict).
pub fn format_summary(summary: &ComparisonSummary) -> String {
    let mut out = String::new();
    let tol = &summary.tolerances;

    out.push_str("=== funnel - tolerance tube comparison ===\n");
    out.push_str(&format!(
        "Samples: reference={} | test={}\n",
        summary.reference_samples, summary.test_samples
    ));
    out.push_str(&format!(
        "Tolerances: atolx={} atoly={} rtolx={} rtoly={}\n",
        tol.atolx, tol.atoly, tol.rtolx, tol.rtoly
    ));
    if let Some(dir) = &summary.output_dir {
        out.push_str(&format!("Output: {}\n", dir.display()));
    }

    if summary.valid {
        out.push_str("Result: valid (test curve lies inside the tube)\n");
    } else {
        out.push_str(&format!(
            "Result: INVALID ({} sample(s) outside the tube, max |diff|={:.6e})\n",
            summary.violations, summary.max_abs_diff
        ));
    }

    out
}

/// Format the largest violations as a table.
pub fn format_violations(rows: &[Violation]) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        return out;
    }

    out.push_str("Largest deviations:\n");
    out.push_str(format!("{:>16} {:>16} {:>16}", "x", "y", "diff").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<16} {:-<16} {:-<16}", "", "", "").trim_end());
    out.push('\n');

    for v in rows {
        out.push_str(&format!("{:>16.6e} {:>16.6e} {:>+16.6e}\n", v.x, v.y, v.diff));
    }

    out
}
