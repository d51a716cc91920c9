//! OLS on the natural log of the target.

use crate::analysis::{AnalysisError, ModelFit};
use crate::core::RegressionOptions;
use crate::data::{BaseLevel, DataError, Dataset, DesignMatrix};
use tracing::{info, warn};

/// Result of the log-target stage. A failure does not abort the run.
#[derive(Debug, Clone)]
pub enum LogModelOutcome {
    Fitted {
        model: ModelFit,
        /// Rows dropped because the target was not strictly positive.
        excluded_rows: usize,
    },
    Failed {
        reason: String,
    },
}

impl LogModelOutcome {
    pub fn model(&self) -> Option<&ModelFit> {
        match self {
            LogModelOutcome::Fitted { model, .. } => Some(model),
            LogModelOutcome::Failed { .. } => None,
        }
    }
}

/// Fit `ln(target)` on the rows with a strictly positive target.
///
/// Category encodings are recomputed on the retained rows.
pub fn fit_log_model(
    dataset: &Dataset,
    target: &str,
    base_level: BaseLevel,
    options: &RegressionOptions,
) -> LogModelOutcome {
    match try_fit(dataset, target, base_level, options) {
        Ok((model, excluded_rows)) => {
            info!(
                rows = model.design.n_rows(),
                excluded_rows, "log model fitted"
            );
            LogModelOutcome::Fitted {
                model,
                excluded_rows,
            }
        }
        Err(err) => {
            warn!(error = %err, "log model failed");
            LogModelOutcome::Failed {
                reason: err.to_string(),
            }
        }
    }
}

fn try_fit(
    dataset: &Dataset,
    target: &str,
    base_level: BaseLevel,
    options: &RegressionOptions,
) -> Result<(ModelFit, usize), AnalysisError> {
    let values = dataset.numeric_values(target)?;
    let positive = dataset.filter_rows(|i| values[i] > 0.0);
    if positive.n_rows() == 0 {
        return Err(DataError::NoPositiveTarget(target.to_string()).into());
    }
    let excluded = dataset.n_rows() - positive.n_rows();

    let design = DesignMatrix::build(&positive, target, None, base_level)?
        .map_target(format!("log({target})"), f64::ln);
    let model = ModelFit::fit("Modelo log", design, options)?;

    Ok((model, excluded))
}

/// Approximate percent change of the target per unit change: `100·(exp(β) − 1)`.
pub fn percent_effect(coefficient: f64) -> f64 {
    100.0 * coefficient.exp_m1()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::solvers::FittedRegressor;

    fn dataset(targets: &[f64]) -> Dataset {
        let n = targets.len();
        Dataset::new(vec![
            Column::numeric("x", (0..n).map(|i| Some(i as f64)).collect()),
            Column::numeric("z", (0..n).map(|i| Some((i as f64 * 0.8).sin())).collect()),
            Column::numeric("y", targets.iter().map(|&t| Some(t)).collect()),
        ])
        .expect("valid")
    }

    #[test]
    fn test_excludes_non_positive_targets() {
        let mut targets: Vec<f64> = (0..20)
            .map(|i| (0.5 + 0.1 * i as f64 + 0.01 * (i as f64 * 1.3).cos()).exp())
            .collect();
        targets[3] = 0.0;
        targets[7] = -2.0;

        let outcome = fit_log_model(
            &dataset(&targets),
            "y",
            BaseLevel::Alphabetical,
            &RegressionOptions::default(),
        );

        match outcome {
            LogModelOutcome::Fitted {
                model,
                excluded_rows,
            } => {
                assert_eq!(excluded_rows, 2);
                assert_eq!(model.design.n_rows(), 18);
                assert_eq!(model.design.target(), "log(y)");
                assert!((model.fitted.coefficients()[0] - 0.1).abs() < 0.01);
            }
            LogModelOutcome::Failed { reason } => panic!("unexpected failure: {reason}"),
        }
    }

    #[test]
    fn test_no_positive_rows_fails_explicitly() {
        let outcome = fit_log_model(
            &dataset(&[0.0, -1.0, -3.0, 0.0, -0.5]),
            "y",
            BaseLevel::Alphabetical,
            &RegressionOptions::default(),
        );

        match outcome {
            LogModelOutcome::Failed { reason } => assert!(reason.contains("positive")),
            LogModelOutcome::Fitted { .. } => panic!("expected failure"),
        }
    }

    #[test]
    fn test_percent_effect() {
        assert!((percent_effect(0.0)).abs() < 1e-12);
        assert!((percent_effect(2.0_f64.ln()) - 100.0).abs() < 1e-9);
    }
}
