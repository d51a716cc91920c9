//! Single-step backward elimination.

use crate::analysis::{AnalysisError, ModelFit};
use crate::core::RegressionOptions;
use tracing::{debug, info};

/// The predictor removed by one elimination step.
#[derive(Debug, Clone, PartialEq)]
pub struct Elimination {
    pub removed: String,
    pub p_value: f64,
}

/// Predictor with the largest p-value above `alpha`, if any. NaN p-values
/// are never selected.
pub fn least_significant(p_values: &[(String, f64)], alpha: f64) -> Option<Elimination> {
    p_values
        .iter()
        .filter(|(_, p)| p.is_finite() && *p > alpha)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, p)| Elimination {
            removed: name.clone(),
            p_value: *p,
        })
}

/// Reduced model and the predictor it lacks.
#[derive(Debug, Clone)]
pub struct ReducedModel {
    pub elimination: Elimination,
    pub model: ModelFit,
}

/// Drop the least significant predictor of `full` and refit once.
///
/// Returns `None` when every predictor is significant at `alpha`.
pub fn reduce_once(
    full: &ModelFit,
    alpha: f64,
    label: &str,
    options: &RegressionOptions,
) -> Result<Option<ReducedModel>, AnalysisError> {
    let Some(elimination) = least_significant(&full.predictor_p_values(), alpha) else {
        debug!(alpha, "all predictors significant");
        return Ok(None);
    };

    info!(
        removed = %elimination.removed,
        p_value = elimination.p_value,
        "refitting without least significant predictor"
    );

    let design = full.design.drop_predictor(&elimination.removed)?;
    let model = ModelFit::fit(label, design, options)?;

    Ok(Some(ReducedModel { elimination, model }))
}
