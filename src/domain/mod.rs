//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - model selection enums (`ModelKind`, `ModelSpec`, `DivisionPolicy`)
//! - paired observations (`Sample`)
//! - fit outputs (`FitResult`, `ModelFit`)
//! - resolved run configuration (`FitConfig`)

pub mod types;

pub use types::*;
