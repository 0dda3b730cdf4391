//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{DivisionPolicy, ModelFit};
use crate::fit::Classification;
use crate::io::ingest::IngestedData;
use crate::report::Residual;

/// Dataset header shared by every command.
pub fn format_dataset(ingest: &IngestedData, policy: DivisionPolicy) -> String {
    let mut out = String::new();
    let (x_min, x_max) = ingest.sample.x_range();

    out.push_str("=== gfit - growth curve fit ===\n");
    out.push_str(&format!(
        "Columns: x={} | y={}\n",
        ingest.x_label, ingest.y_label
    ));
    out.push_str(&format!(
        "Rows: read={} used={} skipped={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len()
    ));
    out.push_str(&format!("Range: x=[{x_min:.4}, {x_max:.4}]\n"));
    out.push_str(&format!("Policy: {policy:?}\n"));
    for err in &ingest.row_errors {
        out.push_str(&format!("  (line {}) {}\n", err.line, err.message));
    }
    out
}

/// Format a single fitted model.
pub fn format_fit(fit: &ModelFit) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{} fit ({}):\n", fit.model.display_name(), fit.model.formula()));
    out.push_str(&format!("- {}\n", fit.equation()));
    out.push_str(&format!("- a  = {}\n", fmt_num(fit.result.a)));
    out.push_str(&format!("- b  = {}\n", fmt_num(fit.result.b)));
    out.push_str(&format!("- R² = {}\n", fmt_num(fit.result.r2)));
    out
}

/// Format the model comparison table for a classification run.
pub fn format_classification(c: &Classification) -> String {
    let mut out = String::new();

    out.push_str("\nModel diagnostics:\n");
    for fit in &c.fits {
        let chosen = if fit.model == c.best.model { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} {:<12} a={:>14} b={:>14} R²={:.6}\n",
            fit.model.display_name(),
            fmt_num(fit.result.a),
            fmt_num(fit.result.b),
            fit.result.r2
        ));
    }
    for (kind, reason) in &c.skipped {
        out.push_str(&format!("  (skipped {}) {reason}\n", kind.display_name()));
    }

    out.push_str(&format!(
        "\nBest shape: {} ({})\n",
        c.best.model.display_name(),
        c.best.equation()
    ));
    out
}

/// Format a residual table.
pub fn format_residuals(title: &str, rows: &[Residual]) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{title}:\n"));
    out.push_str(&format!(
        "{:>14} {:>14} {:>14} {:>14}\n",
        "x", "y_obs", "y_fit", "residual"
    ));
    out.push_str(&format!("{:-<14} {:-<14} {:-<14} {:-<14}\n", "", "", "", ""));
    for r in rows {
        out.push_str(&format!(
            "{:>14} {:>14} {:>14} {:>14}\n",
            fmt_num(r.x),
            fmt_num(r.y_obs),
            fmt_num(r.y_fit),
            fmt_num(r.residual)
        ));
    }
    out
}

/// Fixed notation for ordinary magnitudes, scientific otherwise.
fn fmt_num(v: f64) -> String {
    let mag = v.abs();
    if v == 0.0 || (1e-3..1e7).contains(&mag) {
        format!("{v:.6}")
    } else {
        format!("{v:.4e}")
    }
}
