//! Synthetic growth samples drawn around a known model.
//!
//! ```text
//! y_i = model(x_i) · exp(σ·z_i),   z_i ~ N(0, 1)
//! ```
//!
//! Log-normal noise keeps `y` positive wherever the model value is, so the
//! log-linearized fits remain applicable to the generated data. The x values
//! form an evenly spaced grid; the generator is seeded and fully deterministic.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::domain::{ModelKind, Sample};
use crate::error::AppError;
use crate::models::predict;

/// Parameters for `generate`.
#[derive(Debug, Clone)]
pub struct SynthSpec {
    pub model: ModelKind,
    pub a: f64,
    pub b: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub n: usize,
    /// Log-scale noise standard deviation (0 disables noise).
    pub noise: f64,
    pub seed: u64,
}

/// Evenly spaced grid of `n` points covering `[x_min, x_max]`.
pub fn x_grid(x_min: f64, x_max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![x_min],
        _ => (0..n)
            .map(|i| x_min + (x_max - x_min) * i as f64 / (n as f64 - 1.0))
            .collect(),
    }
}

pub fn generate(spec: &SynthSpec) -> Result<Sample, AppError> {
    if spec.n < 2 {
        return Err(AppError::new(2, "Sample size must be at least 2."));
    }
    if !(spec.x_min.is_finite() && spec.x_max.is_finite() && spec.x_max > spec.x_min) {
        return Err(AppError::new(2, "Invalid x range for sample generation."));
    }
    if spec.model == ModelKind::Power && spec.x_min <= 0.0 {
        return Err(AppError::new(2, "Power samples require x_min > 0."));
    }
    if !(spec.noise.is_finite() && spec.noise >= 0.0) {
        return Err(AppError::new(2, "Noise level must be a non-negative number."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let xs = x_grid(spec.x_min, spec.x_max, spec.n);
    let mut ys = Vec::with_capacity(xs.len());
    for &x in &xs {
        let base = predict(spec.model, x, spec.a, spec.b);
        if !base.is_finite() {
            return Err(AppError::new(
                2,
                format!("Model {} is not finite at x = {x}.", spec.model),
            ));
        }
        let z: f64 = normal.sample(&mut rng);
        ys.push(base * (spec.noise * z).exp());
    }

    Ok(Sample::new(xs, ys)?)
}
