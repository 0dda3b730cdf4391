//! Mathematical primitives: summation and goodness of fit.

pub mod goodness;
pub mod sigma;

pub use goodness::*;
pub use sigma::*;
