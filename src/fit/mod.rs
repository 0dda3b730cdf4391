//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - closed-form least squares for each model kind (`fitter`)
//! - fit several kinds concurrently and select the best shape (`selection`)

pub mod fitter;
pub mod selection;

pub use fitter::*;
pub use selection::*;
