//! Model evaluation for the linear / power / exponential forms.
//!
//! The fitters score their own predictions; this is the evaluation used by
//! everything downstream of a fit (plots, residual reports, synthetic data).

use crate::domain::ModelKind;

/// Predict `y(x)` for the given model kind and coefficients.
pub fn predict(model: ModelKind, x: f64, a: f64, b: f64) -> f64 {
    match model {
        ModelKind::Linear => a + b * x,
        ModelKind::Power => a * x.powf(b),
        ModelKind::Exponential => a * (b * x).exp(),
    }
}
