//! Coefficient of determination (R²).
//!
//! ```text
//! ȳ      = Σy / n
//! SS_tot = Σ(y - ȳ)²
//! SS_res = Σ(ŷ(x) - y)²
//! R²     = 1 - SS_res / SS_tot
//! ```
//!
//! `ŷ` is evaluated in the original (untransformed) y space, so log-linearized
//! fits are scored on the back-transformed curve.

use crate::error::FitError;
use crate::math::sigma::{sum, sum_by};

/// Raw R² of `predict` over `pairs`.
///
/// When every y is identical `SS_tot` is zero and the result is NaN or -∞;
/// use [`checked_fit_error`] to get an error instead.
pub fn fit_error<I, P>(pairs: I, predict: P) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
    I::IntoIter: Clone,
    P: Fn(f64) -> f64,
{
    let (ss_res, ss_tot) = sums_of_squares(pairs.into_iter(), predict);
    1.0 - ss_res / ss_tot
}

/// R² of `predict` over `pairs`, or `UndefinedGoodnessOfFit` for constant y.
///
/// The y values are compared directly: for values such as 0.1 the rounded mean
/// leaves `SS_tot` a tiny non-zero residue instead of zero.
pub fn checked_fit_error<I, P>(pairs: I, predict: P) -> Result<f64, FitError>
where
    I: IntoIterator<Item = (f64, f64)>,
    I::IntoIter: Clone,
    P: Fn(f64) -> f64,
{
    let pairs = pairs.into_iter();
    let mut ys = pairs.clone().map(|(_, y)| y);
    let constant = match ys.next() {
        Some(first) => ys.all(|y| y == first),
        None => true,
    };
    let (ss_res, ss_tot) = sums_of_squares(pairs, predict);
    if constant || ss_tot == 0.0 {
        return Err(FitError::UndefinedGoodnessOfFit);
    }
    Ok(1.0 - ss_res / ss_tot)
}

fn sums_of_squares<I, P>(pairs: I, predict: P) -> (f64, f64)
where
    I: Iterator<Item = (f64, f64)> + Clone,
    P: Fn(f64) -> f64,
{
    let n = pairs.clone().count() as f64;
    let y_bar = sum(pairs.clone().map(|(_, y)| y)) / n;
    let ss_tot = sum_by(pairs.clone(), |(_, y)| (y - y_bar).powi(2));
    let ss_res = sum_by(pairs, |(x, y)| (predict(x) - y).powi(2));
    (ss_res, ss_tot)
}
