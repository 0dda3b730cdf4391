//! Reporting utilities: residuals, outliers, and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{ModelFit, Sample};
use crate::error::AppError;
use crate::models::predict;

/// Observed vs fitted value at one x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residual {
    pub x: f64,
    pub y_obs: f64,
    pub y_fit: f64,
    pub residual: f64,
}

/// Compute fitted values and residuals for each observation.
pub fn compute_residuals(sample: &Sample, fit: &ModelFit) -> Result<Vec<Residual>, AppError> {
    let mut out = Vec::with_capacity(sample.len());
    for (x, y_obs) in sample.pairs() {
        let y_fit = predict(fit.model, x, fit.result.a, fit.result.b);
        if !y_fit.is_finite() {
            return Err(AppError::new(4, "Non-finite model prediction during residual computation."));
        }
        out.push(Residual {
            x,
            y_obs,
            y_fit,
            residual: y_obs - y_fit,
        });
    }
    Ok(out)
}

/// The `top_n` observations farthest from the fitted curve, largest first.
pub fn largest_residuals(residuals: &[Residual], top_n: usize) -> Vec<Residual> {
    let mut sorted = residuals.to_vec();
    sorted.sort_by(|a, b| {
        b.residual
            .abs()
            .partial_cmp(&a.residual.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(top_n);
    sorted
}
