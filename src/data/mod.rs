//! Sample data sources other than CSV ingest.

pub mod synthetic;

pub use synthetic::*;
