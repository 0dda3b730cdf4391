//! Command-line parsing for the growth curve fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.
//!
//! Defaults can also come from the environment (or a `.env` file):
//! - `GFIT_POLICY`: `strict` | `compat`
//! - `GFIT_LOG`: tracing filter, e.g. `debug` (read in `app`)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DivisionPolicy, ModelKind, ModelSpec};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "gfit",
    version,
    about = "Fit growth data to linear, power-law and exponential curves"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit one model to a CSV sample and print coefficients and R².
    Fit(FitArgs),
    /// Fit every model and report which growth shape explains the data best.
    Classify(ClassifyArgs),
    /// Generate a synthetic sample around a known model (CSV to stdout or file).
    Synth(SynthArgs),
}

/// Input and output options shared by `fit` and `classify`.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// CSV file with one observation per row.
    #[arg(short = 'f', long, value_name = "CSV")]
    pub input: PathBuf,

    /// Column holding x values (default: `x`, else the first column).
    #[arg(long)]
    pub x_col: Option<String>,

    /// Column holding y values (default: `y`, else the second column).
    #[arg(long)]
    pub y_col: Option<String>,

    /// Handling of degenerate fits and undefined R².
    #[arg(long, value_enum, env = "GFIT_POLICY", default_value_t = DivisionPolicy::Strict)]
    pub policy: DivisionPolicy,

    /// Render an ASCII plot of the data and the fitted curve.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Show the N observations with the largest residuals.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub residuals: usize,

    /// Export the results to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Model to fit.
    #[arg(short = 'm', long, value_enum)]
    pub model: ModelKind,
}

#[derive(Debug, Args, Clone)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Which model(s) to compare.
    #[arg(long, value_enum, default_value_t = ModelSpec::All)]
    pub models: ModelSpec,

    /// Prefer a simpler model when its R² is within this margin of the best.
    #[arg(long, default_value_t = 0.0)]
    pub margin: f64,
}

#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    /// Model to sample from.
    #[arg(short = 'm', long, value_enum)]
    pub model: ModelKind,

    /// Coefficient `a`.
    #[arg(short = 'a', long, allow_negative_numbers = true)]
    pub a: f64,

    /// Coefficient `b`.
    #[arg(short = 'b', long, allow_negative_numbers = true)]
    pub b: f64,

    /// Smallest x value.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub x_min: f64,

    /// Largest x value.
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    pub x_max: f64,

    /// Number of observations.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub count: usize,

    /// Log-scale noise standard deviation.
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Write the CSV here instead of stdout.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}
