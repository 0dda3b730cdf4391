//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and installs the log subscriber
//! - parses CLI arguments
//! - runs fits / classification / sample generation
//! - prints reports/plots
//! - writes optional exports

use std::fs::File;
use std::io;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{ClassifyArgs, Command, FitArgs, InputArgs, SynthArgs};
use crate::data::{generate, SynthSpec};
use crate::domain::{FitConfig, ModelSpec};
use crate::error::AppError;
use crate::io::export::{write_report_json, write_sample_csv, FitReport};

pub mod pipeline;

/// Environment variable holding the tracing filter directive.
const LOG_ENV: &str = "GFIT_LOG";

/// Entry point for the `gfit` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Classify(args) => handle_classify(args),
        Command::Synth(args) => handle_synth(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args.input, args.model.into(), 0.0);
    let run = pipeline::run_fit(&config, args.model)?;

    println!("{}", crate::report::format_dataset(&run.ingest, config.policy));
    println!("{}", crate::report::format_fit(&run.best));
    print_details(&run, &config, args.input.residuals);

    if let Some(path) = &config.export {
        let report = FitReport::single(&config.input, config.policy, run.best);
        write_report_json(path, &report)?;
        info!(path = %path.display(), "wrote report");
    }
    Ok(())
}

fn handle_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args.input, args.models, args.margin);
    let run = pipeline::run_classify(&config)?;

    println!("{}", crate::report::format_dataset(&run.ingest, config.policy));
    if let Some(classification) = &run.classification {
        println!("{}", crate::report::format_classification(classification));
    }
    println!("{}", crate::report::format_fit(&run.best));
    print_details(&run, &config, args.input.residuals);

    if let (Some(path), Some(classification)) = (&config.export, &run.classification) {
        let report = FitReport::classification(&config.input, config.policy, classification);
        write_report_json(path, &report)?;
        info!(path = %path.display(), "wrote report");
    }
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let spec = SynthSpec {
        model: args.model,
        a: args.a,
        b: args.b,
        x_min: args.x_min,
        x_max: args.x_max,
        n: args.count,
        noise: args.noise,
        seed: args.seed,
    };
    let sample = generate(&spec)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display()))
            })?;
            write_sample_csv(file, &sample)?;
            info!(path = %path.display(), n = sample.len(), "wrote sample");
        }
        None => write_sample_csv(io::stdout().lock(), &sample)?,
    }
    Ok(())
}

fn print_details(run: &pipeline::RunOutput, config: &FitConfig, top_residuals: usize) {
    if top_residuals > 0 && !run.residuals.is_empty() {
        let rows = crate::report::largest_residuals(&run.residuals, top_residuals);
        println!("{}", crate::report::format_residuals("Largest residuals", &rows));
    }

    if config.plot && run.best.result.is_finite() {
        let plot = crate::plot::render_ascii_plot(
            &run.ingest.sample,
            &run.best,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }
}

pub fn fit_config_from_args(args: &InputArgs, model_spec: ModelSpec, margin: f64) -> FitConfig {
    FitConfig {
        input: args.input.clone(),
        x_column: args.x_col.clone(),
        y_column: args.y_col.clone(),
        model_spec,
        policy: args.policy,
        margin,
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
        export: args.export.clone(),
    }
}
