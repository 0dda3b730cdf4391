//! Growth-shape classification: fit several model kinds and pick the best.
//!
//! The tool fits each requested model and scores it by R² on the original data.
//!
//! Selection rules:
//! 1. Skip models whose preconditions fail for this sample (non-positive values
//!    for the log-linearized forms, degenerate systems, undefined R²)
//! 2. Choose the model with the highest R²
//! 3. If a simpler model is within `margin` of the best R², pick the simpler model
//!    (linear, then power, then exponential)

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{ModelFit, ModelKind, ModelSpec};
use crate::error::FitError;
use crate::fit::fitter::{fit_model, validate, FitOptions};

/// Options for `classify`.
#[derive(Debug, Clone, Copy)]
pub struct SelectionOptions {
    pub models: ModelSpec,
    /// R² margin within which a simpler model is preferred.
    pub margin: f64,
    pub fit: FitOptions,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            models: ModelSpec::All,
            margin: 0.0,
            fit: FitOptions::default(),
        }
    }
}

/// Output of fitting + selection.
#[derive(Debug, Clone)]
pub struct Classification {
    pub best: ModelFit,
    /// Fits for all models that could be scored, simplest first.
    pub fits: Vec<ModelFit>,
    /// Any models that were skipped and why.
    pub skipped: Vec<(ModelKind, FitError)>,
}

/// Fit every requested model and select the best one.
pub fn classify(xs: &[f64], ys: &[f64], opts: &SelectionOptions) -> Result<Classification, FitError> {
    // Length, size and finiteness problems apply to every model; report them
    // once instead of as a list of skipped models.
    validate(ModelKind::Linear, xs, ys)?;

    let outcomes: Vec<(ModelKind, Result<ModelFit, FitError>)> = opts
        .models
        .kinds()
        .par_iter()
        .map(|&model| {
            let outcome = fit_model(model, xs, ys, &opts.fit).and_then(|result| {
                if !(result.a.is_finite() && result.b.is_finite()) {
                    Err(FitError::DegenerateFit { model })
                } else if !result.r2.is_finite() {
                    Err(FitError::UndefinedGoodnessOfFit)
                } else {
                    Ok(ModelFit {
                        model,
                        result,
                        n: xs.len(),
                    })
                }
            });
            (model, outcome)
        })
        .collect();

    let mut fits = Vec::new();
    let mut skipped = Vec::new();
    for (model, outcome) in outcomes {
        match outcome {
            Ok(fit) => fits.push(fit),
            Err(err) => {
                debug!(model = %model, reason = %err, "skipping model");
                skipped.push((model, err));
            }
        }
    }

    let top = fits
        .iter()
        .map(|f| f.result.r2)
        .fold(f64::NEG_INFINITY, f64::max);
    let margin = opts.margin.max(0.0);

    // `fits` is ordered simplest first, so the first one within the margin wins.
    let Some(best) = fits.iter().find(|f| f.result.r2 >= top - margin).copied() else {
        return Err(FitError::NoCandidate);
    };

    debug!(model = %best.model, r2 = best.result.r2, candidates = fits.len(), "selected model");
    Ok(Classification { best, fits, skipped })
}
