//! Shared "fit pipeline" logic used by the `fit` and `classify` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> fit or classify -> residuals
//!
//! The command handlers can then focus on presentation.

use crate::domain::{FitConfig, ModelFit, ModelKind};
use crate::error::AppError;
use crate::fit::{classify, fit_model, Classification, FitOptions, SelectionOptions};
use crate::io::ingest::{load_sample, IngestedData};
use crate::report::{compute_residuals, Residual};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub best: ModelFit,
    /// Present for `classify` runs.
    pub classification: Option<Classification>,
    /// Empty when the fit is not finite (possible under the compat policy).
    pub residuals: Vec<Residual>,
}

/// Fit a single model kind to the configured input.
pub fn run_fit(config: &FitConfig, model: ModelKind) -> Result<RunOutput, AppError> {
    let ingest = load(config)?;
    let sample = &ingest.sample;

    let opts = FitOptions {
        policy: config.policy,
    };
    let result = fit_model(model, sample.xs(), sample.ys(), &opts)?;
    let best = ModelFit {
        model,
        result,
        n: sample.len(),
    };

    let residuals = residuals_for(&ingest, &best)?;
    Ok(RunOutput {
        ingest,
        best,
        classification: None,
        residuals,
    })
}

/// Fit every configured model kind and select the best growth shape.
pub fn run_classify(config: &FitConfig) -> Result<RunOutput, AppError> {
    if !(config.margin.is_finite() && config.margin >= 0.0) {
        return Err(AppError::new(2, "Margin must be a non-negative number."));
    }

    let ingest = load(config)?;
    let sample = &ingest.sample;

    let opts = SelectionOptions {
        models: config.model_spec,
        margin: config.margin,
        fit: FitOptions {
            policy: config.policy,
        },
    };
    let classification = classify(sample.xs(), sample.ys(), &opts)?;
    let best = classification.best;

    let residuals = residuals_for(&ingest, &best)?;
    Ok(RunOutput {
        ingest,
        best,
        classification: Some(classification),
        residuals,
    })
}

fn load(config: &FitConfig) -> Result<IngestedData, AppError> {
    load_sample(
        &config.input,
        config.x_column.as_deref(),
        config.y_column.as_deref(),
    )
}

fn residuals_for(ingest: &IngestedData, fit: &ModelFit) -> Result<Vec<Residual>, AppError> {
    if fit.result.is_finite() {
        compute_residuals(&ingest.sample, fit)
    } else {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::domain::{DivisionPolicy, ModelSpec};

    fn write_csv(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("gfit_{}_{name}.csv", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    fn config(input: PathBuf, policy: DivisionPolicy) -> FitConfig {
        FitConfig {
            input,
            x_column: None,
            y_column: None,
            model_spec: ModelSpec::All,
            policy,
            margin: 0.0,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export: None,
        }
    }

    #[test]
    fn classify_runs_end_to_end() {
        let path = write_csv("classify", "x,y\n1,1\n2,4\n3,9\n4,16\n5,25\n");
        let run = run_classify(&config(path.clone(), DivisionPolicy::Strict)).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(run.best.model, ModelKind::Power);
        assert_eq!(run.residuals.len(), 5);
        assert_eq!(run.classification.unwrap().fits.len(), 3);
    }

    #[test]
    fn strict_degenerate_fit_exits_with_code_4() {
        let path = write_csv("degenerate", "x,y\n2,1\n2,2\n2,3\n");
        let err = run_fit(&config(path.clone(), DivisionPolicy::Strict), ModelKind::Linear).unwrap_err();
        std::fs::remove_file(path).ok();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn compat_degenerate_fit_has_no_residuals() {
        let path = write_csv("compat", "x,y\n2,1\n2,2\n2,3\n");
        let run = run_fit(&config(path.clone(), DivisionPolicy::Compat), ModelKind::Linear).unwrap();
        std::fs::remove_file(path).ok();
        assert!(!run.best.result.is_finite());
        assert!(run.residuals.is_empty());
    }
}
