//! Export fit results to JSON and samples to CSV.
//!
//! The JSON report is meant to be easy to consume in downstream scripts, e.g. a
//! benchmark harness comparing R² and coefficients against expectations.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{DivisionPolicy, ModelFit, ModelKind, Sample};
use crate::error::AppError;
use crate::fit::Classification;

/// A model that could not be fitted, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedModel {
    pub model: ModelKind,
    pub reason: String,
}

/// Portable representation of one `gfit` run.
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub tool: String,
    pub generated: DateTime<Utc>,
    pub input: String,
    pub policy: DivisionPolicy,
    pub n: usize,
    pub best: Option<ModelKind>,
    pub fits: Vec<ModelFit>,
    pub skipped: Vec<SkippedModel>,
}

impl FitReport {
    fn new(input: &Path, policy: DivisionPolicy, n: usize) -> Self {
        Self {
            tool: "gfit".to_string(),
            generated: Utc::now(),
            input: input.display().to_string(),
            policy,
            n,
            best: None,
            fits: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Report for a single-model fit.
    pub fn single(input: &Path, policy: DivisionPolicy, fit: ModelFit) -> Self {
        let mut report = Self::new(input, policy, fit.n);
        report.best = Some(fit.model);
        report.fits.push(fit);
        report
    }

    /// Report for a classification run.
    pub fn classification(input: &Path, policy: DivisionPolicy, c: &Classification) -> Self {
        let mut report = Self::new(input, policy, c.best.n);
        report.best = Some(c.best.model);
        report.fits = c.fits.clone();
        report.skipped = c
            .skipped
            .iter()
            .map(|(model, err)| SkippedModel {
                model: *model,
                reason: err.to_string(),
            })
            .collect();
        report
    }
}

/// Write a JSON report file.
pub fn write_report_json(path: &Path, report: &FitReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

/// Write a sample as `x,y` CSV.
pub fn write_sample_csv<W: Write>(writer: W, sample: &Sample) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["x", "y"])
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV header: {e}")))?;
    for (x, y) in sample.pairs() {
        out.write_record([x.to_string(), y.to_string()])
            .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))?;
    }
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sample CSV: {e}")))?;
    Ok(())
}
