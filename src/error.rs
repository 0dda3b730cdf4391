//! Error types.
//!
//! - `FitError`: failures of the fitting core (input validation, degenerate
//!   least-squares systems, undefined R²)
//! - `AppError`: binary-level error carrying a message and a process exit code

use crate::domain::{Axis, ModelKind};

/// Coarse classification of a `FitError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The observations violate a precondition of the requested fit.
    InvalidInput,
    /// The least-squares denominator is zero or overflowed; coefficients are undefined.
    DegenerateFit,
    /// All observed y values are identical, so R² divides by zero.
    UndefinedGoodnessOfFit,
    /// Model selection could not fit any of the requested models.
    NoCandidate,
}

/// Errors reported by the fitting core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("x and y must have the same length (x: {x_len}, y: {y_len})")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error("at least 2 observations are required to fit, got {n}")]
    InsufficientData { n: usize },

    #[error("non-finite {axis} value {value} at index {index}")]
    NonFinite { axis: Axis, index: usize, value: f64 },

    #[error("{model} fit requires {axis} > 0, got {value} at index {index}")]
    NonPositive {
        model: ModelKind,
        axis: Axis,
        index: usize,
        value: f64,
    },

    #[error("{model} fit is degenerate: the normal equations have no finite solution")]
    DegenerateFit { model: ModelKind },

    #[error("R² is undefined: all y values are identical")]
    UndefinedGoodnessOfFit,

    #[error("none of the requested models could be fitted")]
    NoCandidate,
}

impl FitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FitError::LengthMismatch { .. }
            | FitError::InsufficientData { .. }
            | FitError::NonFinite { .. }
            | FitError::NonPositive { .. } => ErrorKind::InvalidInput,
            FitError::DegenerateFit { .. } => ErrorKind::DegenerateFit,
            FitError::UndefinedGoodnessOfFit => ErrorKind::UndefinedGoodnessOfFit,
            FitError::NoCandidate => ErrorKind::NoCandidate,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let exit_code = match err.kind() {
            ErrorKind::InvalidInput => 3,
            ErrorKind::DegenerateFit | ErrorKind::UndefinedGoodnessOfFit | ErrorKind::NoCandidate => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
