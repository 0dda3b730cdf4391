//! `growth-fit` library crate.
//!
//! Closed-form least-squares fits of linear, power-law and exponential curves,
//! with R² scoring, for classifying how measurements grow with input size.
//!
//! The binary (`gfit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the fitting core is reusable by benchmark harnesses directly

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;

pub use domain::{DivisionPolicy, FitResult, ModelKind, Sample};
pub use error::{ErrorKind, FitError};
pub use fit::{classify, fit_exponential, fit_linear, fit_model, fit_power, FitOptions, SelectionOptions};
pub use math::{checked_fit_error, fit_error, sum, sum_by};
