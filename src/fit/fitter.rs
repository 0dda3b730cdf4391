//! Closed-form least-squares fitting for a single model kind.
//!
//! Given observations `(x_i, y_i)` we solve the 2×2 normal equations of an
//! ordinary least-squares line, possibly after log-linearizing:
//!
//! - linear:      `y = a + b·x`      fitted on `(x, y)`
//! - power:       `y = a·x^b`        fitted on `(ln x, ln y)`
//! - exponential: `y = a·e^(b·x)`    fitted on `(x, ln y)`
//!
//! With `X`, `Y` the (transformed) coordinates:
//!
//! ```text
//! c = n·ΣX² - (ΣX)²
//! b = (n·ΣXY - ΣX·ΣY) / c
//! ```
//!
//! The regression is unweighted in the transformed space. This is not the
//! nonlinear least-squares estimate on the original data (large-x residuals
//! are weighted differently), and results must stay comparable with data
//! recorded against these formulas.
//!
//! R² is always computed on the original `(x, y)` pairs against the
//! back-transformed curve.

use tracing::debug;

use crate::domain::{Axis, DivisionPolicy, FitResult, ModelKind};
use crate::error::FitError;
use crate::math::{checked_fit_error, fit_error, sum, sum_by};

/// Options that affect how a model is calibrated.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitOptions {
    pub policy: DivisionPolicy,
}

/// Fit `y = a + b·x`.
pub fn fit_linear(xs: &[f64], ys: &[f64]) -> Result<FitResult, FitError> {
    fit_model(ModelKind::Linear, xs, ys, &FitOptions::default())
}

/// Fit `y = a·x^b`. Every x and y must be strictly positive.
pub fn fit_power(xs: &[f64], ys: &[f64]) -> Result<FitResult, FitError> {
    fit_model(ModelKind::Power, xs, ys, &FitOptions::default())
}

/// Fit `y = a·e^(b·x)`. Every y must be strictly positive.
pub fn fit_exponential(xs: &[f64], ys: &[f64]) -> Result<FitResult, FitError> {
    fit_model(ModelKind::Exponential, xs, ys, &FitOptions::default())
}

/// Fit a single model kind.
pub fn fit_model(
    model: ModelKind,
    xs: &[f64],
    ys: &[f64],
    opts: &FitOptions,
) -> Result<FitResult, FitError> {
    validate(model, xs, ys)?;

    let fit = match model {
        ModelKind::Linear => linear(xs, ys, opts.policy)?,
        ModelKind::Power => power(xs, ys, opts.policy)?,
        ModelKind::Exponential => exponential(xs, ys, opts.policy)?,
    };
    // Sums of large but finite inputs can overflow to ∞ and leave NaN behind.
    if opts.policy == DivisionPolicy::Strict && !fit.is_finite() {
        return Err(FitError::DegenerateFit { model });
    }

    debug!(
        model = %model,
        n = xs.len(),
        a = fit.a,
        b = fit.b,
        r2 = fit.r2,
        "fitted model"
    );
    Ok(fit)
}

/// Check the preconditions of `model` on the observations.
///
/// Input errors are reported under every `DivisionPolicy`; the logarithm of a
/// non-positive value has no real result to be compatible with.
pub fn validate(model: ModelKind, xs: &[f64], ys: &[f64]) -> Result<(), FitError> {
    if xs.len() != ys.len() {
        return Err(FitError::LengthMismatch {
            x_len: xs.len(),
            y_len: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Err(FitError::InsufficientData { n: xs.len() });
    }

    for (axis, values) in [(Axis::X, xs), (Axis::Y, ys)] {
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(FitError::NonFinite { axis, index, value });
        }
    }

    let logged: Vec<(Axis, &[f64])> = match model {
        ModelKind::Linear => vec![],
        ModelKind::Power => vec![(Axis::X, xs), (Axis::Y, ys)],
        ModelKind::Exponential => vec![(Axis::Y, ys)],
    };
    for (axis, values) in logged {
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| **v <= 0.0) {
            return Err(FitError::NonPositive {
                model,
                axis,
                index,
                value,
            });
        }
    }

    Ok(())
}

fn linear(xs: &[f64], ys: &[f64], policy: DivisionPolicy) -> Result<FitResult, FitError> {
    let n = xs.len() as f64;
    let xys = || xs.iter().copied().zip(ys.iter().copied());

    let sx = sum(xs.iter().copied());
    let sy = sum(ys.iter().copied());
    let sx2 = sum_by(xs.iter(), |x| x.powi(2));
    let sxy = sum_by(xys(), |(x, y)| x * y);

    let c = n * sx2 - sx.powi(2);
    ensure_nondegenerate(ModelKind::Linear, xs.iter().copied(), c, policy)?;

    let a = (sy * sx2 - sx * sxy) / c;
    let b = (n * sxy - sx * sy) / c;
    let r2 = score(xys(), |x| a + b * x, policy)?;

    Ok(FitResult { a, b, r2 })
}

fn power(xs: &[f64], ys: &[f64], policy: DivisionPolicy) -> Result<FitResult, FitError> {
    let n = xs.len() as f64;
    let xys = || xs.iter().copied().zip(ys.iter().copied());

    let slnxlny = sum_by(xys(), |(x, y)| x.ln() * y.ln());
    let slnx = sum_by(xs.iter(), |x| x.ln());
    let slny = sum_by(ys.iter(), |y| y.ln());
    let slnx2 = sum_by(xs.iter(), |x| x.ln().powi(2));

    let c = n * slnx2 - slnx.powi(2);
    ensure_nondegenerate(ModelKind::Power, xs.iter().map(|x| x.ln()), c, policy)?;

    let b = (n * slnxlny - slnx * slny) / c;
    let ln_a = (slny - b * slnx) / n;
    let a = ln_a.exp();
    let r2 = score(xys(), |x| a * x.powf(b), policy)?;

    Ok(FitResult { a, b, r2 })
}

fn exponential(xs: &[f64], ys: &[f64], policy: DivisionPolicy) -> Result<FitResult, FitError> {
    let n = xs.len() as f64;
    let xys = || xs.iter().copied().zip(ys.iter().copied());

    let sxlny = sum_by(xys(), |(x, y)| x * y.ln());
    let slny = sum_by(ys.iter(), |y| y.ln());
    let sx2 = sum_by(xs.iter(), |x| x.powi(2));
    let sx = sum(xs.iter().copied());

    let c = n * sx2 - sx.powi(2);
    ensure_nondegenerate(ModelKind::Exponential, xs.iter().copied(), c, policy)?;

    let ln_a = (slny * sx2 - sx * sxlny) / c;
    let b = (n * sxlny - sx * slny) / c;
    let r2 = score(xys(), |x| (ln_a + b * x).exp(), policy)?;

    Ok(FitResult { a: ln_a.exp(), b, r2 })
}

/// Reject a zero-variance regressor, or a denominator that overflowed, under
/// `Strict`.
///
/// `c` can round to a tiny non-zero value when every regressor is equal, so the
/// regressors are compared directly as well.
fn ensure_nondegenerate(
    model: ModelKind,
    mut regressors: impl Iterator<Item = f64>,
    c: f64,
    policy: DivisionPolicy,
) -> Result<(), FitError> {
    if policy == DivisionPolicy::Compat {
        return Ok(());
    }
    let constant = match regressors.next() {
        Some(first) => regressors.all(|v| v == first),
        None => true,
    };
    if constant || c == 0.0 || !c.is_finite() {
        return Err(FitError::DegenerateFit { model });
    }
    Ok(())
}

fn score<I, P>(pairs: I, predict: P, policy: DivisionPolicy) -> Result<f64, FitError>
where
    I: Iterator<Item = (f64, f64)> + Clone,
    P: Fn(f64) -> f64,
{
    match policy {
        DivisionPolicy::Strict => checked_fit_error(pairs, predict),
        DivisionPolicy::Compat => Ok(fit_error(pairs, predict)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{DMatrix, DVector};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const COMPAT: FitOptions = FitOptions {
        policy: DivisionPolicy::Compat,
    };

    fn assert_fit(fit: FitResult, min_r2: f64, a: f64, b: f64) {
        assert!(fit.r2 >= min_r2, "r2 {} < {min_r2}", fit.r2);
        assert!((fit.a - a).abs() < 0.001, "a: expected {a}, got {}", fit.a);
        assert!((fit.b - b).abs() < 0.001, "b: expected {b}, got {}", fit.b);
    }

    #[test]
    fn linear_clean_dataset() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.2 * x + 3.1).collect();
        let fit = fit_linear(&xs, &ys).unwrap();
        assert_fit(fit, 0.999_999, 3.1, 2.2);
        assert!(fit.r2 <= 1.0);
    }

    #[test]
    fn linear_noisy_dataset() {
        let xs = [60.0, 61.0, 62.0, 63.0, 65.0];
        let ys = [3.1, 3.6, 3.8, 4.0, 4.1];
        assert_fit(fit_linear(&xs, &ys).unwrap(), 0.8315, -7.9635, 0.1878);
    }

    #[test]
    fn linear_two_points_is_exact() {
        let fit = fit_linear(&[1.0, 3.0], &[2.0, 6.0]).unwrap();
        assert_eq!(fit.into_tuple(), (0.0, 2.0, 1.0));
    }

    #[test]
    fn exponential_clean_dataset() {
        let xs: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys: Vec<f64> = xs.iter().map(|x| 1.1 * (2.1 * x).exp()).collect();
        assert_fit(fit_exponential(&xs, &ys).unwrap(), 0.999_999, 1.1, 2.1);
    }

    #[test]
    fn exponential_noisy_dataset() {
        let xs = [1.0, 1.9, 2.6, 3.4, 5.0];
        let ys = [12.0, 10.0, 8.2, 6.9, 5.9];
        assert_fit(fit_exponential(&xs, &ys).unwrap(), 0.95, 13.81148, -0.1820);
    }

    #[test]
    fn exponential_accepts_non_positive_x() {
        let xs: [f64; 5] = [-2.0, -1.0, 0.0, 1.0, 2.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * (0.5 * x).exp()).collect();
        assert_fit(fit_exponential(&xs, &ys).unwrap(), 0.999_999, 2.0, 0.5);
    }

    #[test]
    fn power_clean_dataset() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [1.0, 4.0, 9.0, 16.0, 25.0];
        assert_fit(fit_power(&xs, &ys).unwrap(), 0.999_999, 1.0, 2.0);
    }

    #[test]
    fn power_slightly_noisy_dataset() {
        let xs = [10.0, 12.0, 15.0, 17.0, 20.0, 22.0, 25.0, 27.0, 30.0, 32.0, 35.0];
        let ys = [95.0, 105.0, 125.0, 141.0, 173.0, 200.0, 253.0, 298.0, 385.0, 459.0, 602.0];
        assert_fit(fit_power(&xs, &ys).unwrap(), 0.90, 2.6217, 1.4556);
    }

    #[test]
    fn power_noisier_dataset() {
        // Income level vs share of households below it.
        let xs = [15000.0, 25000.0, 35000.0, 50000.0, 75000.0, 100000.0];
        let ys = [0.154, 0.283, 0.402, 0.55, 0.733, 0.843];
        assert_fit(fit_power(&xs, &ys).unwrap(), 0.96, 3.119e-5, 0.8959);
    }

    #[test]
    fn repeated_fits_are_bit_identical() {
        let xs = [1.0, 1.9, 2.6, 3.4, 5.0];
        let ys = [12.0, 10.0, 8.2, 6.9, 5.9];
        for model in ModelKind::ALL {
            let first = fit_model(model, &xs, &ys, &FitOptions::default()).unwrap();
            let second = fit_model(model, &xs, &ys, &FitOptions::default()).unwrap();
            assert_eq!(first.a.to_bits(), second.a.to_bits());
            assert_eq!(first.b.to_bits(), second.b.to_bits());
            assert_eq!(first.r2.to_bits(), second.r2.to_bits());
        }
    }

    #[test]
    fn zero_variance_x_is_degenerate() {
        let xs = [2.0, 2.0, 2.0];
        let ys = [1.0, 2.0, 3.0];
        for model in ModelKind::ALL {
            let err = fit_model(model, &xs, &ys, &FitOptions::default()).unwrap_err();
            assert_eq!(err, FitError::DegenerateFit { model });
        }
    }

    #[test]
    fn degenerate_inexact_denominator_is_still_reported() {
        // n·Σx² - (Σx)² rounds to 2.2e-16 here rather than zero.
        let xs = [0.3, 0.3, 0.3];
        let ys = [1.0, 2.0, 3.0];
        let err = fit_linear(&xs, &ys).unwrap_err();
        assert_eq!(err, FitError::DegenerateFit { model: ModelKind::Linear });
    }

    #[test]
    fn overflowing_sums_are_degenerate() {
        // Σx² overflows to ∞, so c = ∞ - ∞.
        let xs = [1e160, 2e160, 3e160];
        let ys = [1.0, 2.0, 3.0];
        for model in [ModelKind::Linear, ModelKind::Exponential] {
            let err = fit_model(model, &xs, &ys, &FitOptions::default()).unwrap_err();
            assert_eq!(err, FitError::DegenerateFit { model });
        }
        // ln x stays small, so the power fit is unaffected.
        assert!(fit_power(&xs, &ys).unwrap().is_finite());

        let fit = fit_model(ModelKind::Linear, &xs, &ys, &COMPAT).unwrap();
        assert!(fit.a.is_nan() && fit.b.is_nan());
    }

    #[test]
    fn inexact_constant_y_has_undefined_r2() {
        let xs = [1.0, 2.0, 3.0];
        for value in [0.1, 0.7] {
            let ys = [value; 3];
            for model in ModelKind::ALL {
                let err = fit_model(model, &xs, &ys, &FitOptions::default()).unwrap_err();
                assert_eq!(err, FitError::UndefinedGoodnessOfFit, "{model} with y = {value}");
            }
        }
    }

    #[test]
    fn compat_policy_propagates_nan() {
        let xs = [2.0, 2.0, 2.0];
        let ys = [1.0, 2.0, 3.0];
        let fit = fit_model(ModelKind::Linear, &xs, &ys, &COMPAT).unwrap();
        assert!(fit.a.is_nan());
        assert!(fit.b.is_nan());
        assert!(!fit.is_finite());
    }

    #[test]
    fn constant_y_has_undefined_r2() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [5.0, 5.0, 5.0, 5.0];
        assert_eq!(fit_linear(&xs, &ys).unwrap_err(), FitError::UndefinedGoodnessOfFit);

        let fit = fit_model(ModelKind::Linear, &xs, &ys, &COMPAT).unwrap();
        assert_eq!((fit.a, fit.b), (5.0, 0.0));
        assert!(fit.r2.is_nan());
    }

    #[test]
    fn power_rejects_non_positive_values() {
        let err = fit_power(&[1.0, 0.0, 3.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            FitError::NonPositive {
                model: ModelKind::Power,
                axis: Axis::X,
                index: 1,
                value: 0.0,
            }
        );

        let err = fit_power(&[1.0, 2.0, 3.0], &[1.0, 2.0, -3.0]).unwrap_err();
        assert!(matches!(err, FitError::NonPositive { axis: Axis::Y, index: 2, .. }));
    }

    #[test]
    fn exponential_rejects_non_positive_y_in_every_policy() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [1.0, 0.0, 3.0];
        assert!(matches!(
            fit_exponential(&xs, &ys),
            Err(FitError::NonPositive { axis: Axis::Y, index: 1, .. })
        ));
        assert!(fit_model(ModelKind::Exponential, &xs, &ys, &COMPAT).is_err());
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            fit_linear(&[1.0, 2.0], &[1.0]).unwrap_err(),
            FitError::LengthMismatch { x_len: 2, y_len: 1 }
        );
        assert_eq!(
            fit_linear(&[1.0], &[1.0]).unwrap_err(),
            FitError::InsufficientData { n: 1 }
        );
        assert!(matches!(
            fit_linear(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, 3.0]),
            Err(FitError::NonFinite { axis: Axis::X, index: 1, .. })
        ));
    }

    #[test]
    fn r2_never_exceeds_one_on_random_data() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let n = rng.gen_range(2..20);
            let xs: Vec<f64> = (0..n).map(|_| rng.gen_range(0.5..100.0)).collect();
            let ys: Vec<f64> = (0..n).map(|_| rng.gen_range(0.5..100.0)).collect();
            for model in ModelKind::ALL {
                if let Ok(fit) = fit_model(model, &xs, &ys, &FitOptions::default()) {
                    assert!(fit.r2 <= 1.0, "{model}: r2 = {}", fit.r2);
                }
            }
        }
    }

    /// Least-squares line through `(u, v)` via SVD, as `(intercept, slope)`.
    fn svd_line(u: &[f64], v: &[f64]) -> (f64, f64) {
        let design = DMatrix::from_fn(u.len(), 2, |row, col| if col == 0 { 1.0 } else { u[row] });
        let rhs = DVector::from_column_slice(v);
        let beta = design.svd(true, true).solve(&rhs, 1e-12).unwrap();
        (beta[0], beta[1])
    }

    #[test]
    fn normal_equations_agree_with_svd_solve() {
        let xs: [f64; 5] = [1.0, 1.9, 2.6, 3.4, 5.0];
        let ys: [f64; 5] = [12.0, 10.0, 8.2, 6.9, 5.9];
        let ln_xs: Vec<f64> = xs.iter().map(|x| x.ln()).collect();
        let ln_ys: Vec<f64> = ys.iter().map(|y| y.ln()).collect();

        let fit = fit_linear(&xs, &ys).unwrap();
        let (a, b) = svd_line(&xs, &ys);
        assert!((fit.a - a).abs() < 1e-9 && (fit.b - b).abs() < 1e-9);

        let fit = fit_exponential(&xs, &ys).unwrap();
        let (ln_a, b) = svd_line(&xs, &ln_ys);
        assert!((fit.a - ln_a.exp()).abs() < 1e-9 && (fit.b - b).abs() < 1e-9);

        let fit = fit_power(&xs, &ys).unwrap();
        let (ln_a, b) = svd_line(&ln_xs, &ln_ys);
        assert!((fit.a - ln_a.exp()).abs() < 1e-9 && (fit.b - b).abs() < 1e-9);
    }
}
