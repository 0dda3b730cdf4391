//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON
//! - printed in terminal reports

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// Functional form fitted to the observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// `y = a + b·x`
    Linear,
    /// `y = a·x^b`
    Power,
    /// `y = a·e^(b·x)`
    Exponential,
}

impl ModelKind {
    /// All model kinds, simplest first.
    pub const ALL: [ModelKind; 3] = [ModelKind::Linear, ModelKind::Power, ModelKind::Exponential];

    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::Power => "power",
            ModelKind::Exponential => "exponential",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear",
            ModelKind::Power => "Power",
            ModelKind::Exponential => "Exponential",
        }
    }

    /// Symbolic form of the model.
    pub fn formula(self) -> &'static str {
        match self {
            ModelKind::Linear => "y = a + b·x",
            ModelKind::Power => "y = a·x^b",
            ModelKind::Exponential => "y = a·e^(b·x)",
        }
    }

    /// Render the fitted formula with concrete coefficients.
    pub fn equation(self, a: f64, b: f64) -> String {
        match self {
            ModelKind::Linear => format!("y = {a:.4} + {b:.4}·x"),
            ModelKind::Power => format!("y = {a:.4}·x^{b:.4}"),
            ModelKind::Exponential => format!("y = {a:.4}·e^({b:.4}·x)"),
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which model(s) to attempt during classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelSpec {
    Linear,
    Power,
    Exponential,
    All,
}

impl ModelSpec {
    pub fn kinds(self) -> Vec<ModelKind> {
        match self {
            ModelSpec::Linear => vec![ModelKind::Linear],
            ModelSpec::Power => vec![ModelKind::Power],
            ModelSpec::Exponential => vec![ModelKind::Exponential],
            ModelSpec::All => ModelKind::ALL.to_vec(),
        }
    }
}

impl From<ModelKind> for ModelSpec {
    fn from(kind: ModelKind) -> Self {
        match kind {
            ModelKind::Linear => ModelSpec::Linear,
            ModelKind::Power => ModelSpec::Power,
            ModelKind::Exponential => ModelSpec::Exponential,
        }
    }
}

/// How zero denominators in the closed-form solution are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DivisionPolicy {
    /// Report degenerate fits and undefined R² as errors.
    #[default]
    Strict,
    /// Divide unguarded and let NaN/∞ propagate into the result.
    ///
    /// Reproduces the numbers of the plain closed-form formulas, for parity
    /// with results recorded by older tooling.
    Compat,
}

/// Observation axis, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// Coefficients and goodness of fit for one model.
///
/// For every model kind `a` is the leading coefficient and `b` the slope or
/// exponent; see `ModelKind::formula`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub a: f64,
    pub b: f64,
    pub r2: f64,
}

impl FitResult {
    pub fn into_tuple(self) -> (f64, f64, f64) {
        (self.a, self.b, self.r2)
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.r2.is_finite()
    }
}

impl From<FitResult> for (f64, f64, f64) {
    fn from(fit: FitResult) -> Self {
        fit.into_tuple()
    }
}

impl From<(f64, f64, f64)> for FitResult {
    fn from((a, b, r2): (f64, f64, f64)) -> Self {
        FitResult { a, b, r2 }
    }
}

/// A fitted model together with the size of the sample it was fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelFit {
    pub model: ModelKind,
    #[serde(flatten)]
    pub result: FitResult,
    pub n: usize,
}

impl ModelFit {
    pub fn equation(&self) -> String {
        self.model.equation(self.result.a, self.result.b)
    }
}

/// Paired observations `(x_i, y_i)`.
///
/// Construction validates equal column lengths and `n >= 2`; per-model
/// preconditions (finite, positive values) are checked by the fitters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Sample {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, FitError> {
        if xs.len() != ys.len() {
            return Err(FitError::LengthMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        if xs.len() < 2 {
            return Err(FitError::InsufficientData { n: xs.len() });
        }
        Ok(Self { xs, ys })
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Result<Self, FitError> {
        let (xs, ys) = pairs.into_iter().unzip();
        Self::new(xs, ys)
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + Clone + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Smallest and largest x value.
    pub fn x_range(&self) -> (f64, f64) {
        self.xs
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)))
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, environment variables and defaults.
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub input: PathBuf,
    pub x_column: Option<String>,
    pub y_column: Option<String>,
    pub model_spec: ModelSpec,
    pub policy: DivisionPolicy,
    /// R² margin within which a simpler model is preferred.
    pub margin: f64,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export: Option<PathBuf>,
}
