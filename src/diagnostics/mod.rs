//! Regression diagnostics (leverage, Cook's distance, VIF, Breusch-Pagan).
//!
//! This module provides tools for diagnosing fitted OLS models:
//!
//! - **Leverage**: Identifies observations with unusual predictor values
//! - **Residuals**: Internally and externally studentized residuals
//! - **Influence**: Cook's distance and the influence summary behind the plots
//! - **VIF**: Variance Inflation Factor for multicollinearity detection
//! - **Heteroscedasticity**: Breusch-Pagan test on the residuals
//!
//! # Example
//!
//! ```rust,ignore
//! use regress_report::diagnostics::{BreuschPagan, InfluenceMeasures, VifTable};
//!
//! // After fitting a model on predictors `x`
//! let vif = VifTable::compute(&x, &names, 10.0);
//! let bp = BreuschPagan::test(&residuals, &x, Default::default(), Default::default(), 0.05)?;
//! let influence = InfluenceMeasures::compute(&x, &fitted);
//! println!("{}", bp.verdict);
//! ```

mod heteroscedasticity;
mod influence;
mod leverage;
mod residuals;
mod vif;

pub use heteroscedasticity::{BpCriterion, BreuschPagan, BreuschPaganVariant, Verdict};
pub use influence::{
    cooks_distance, cooks_threshold, influential_cooks, InfluenceMeasures, InfluentialObservation,
};
pub use leverage::{compute_leverage, hat_diagonal, high_leverage_points};
pub use residuals::{externally_studentized_residuals, residual_outliers, studentized_residuals};
pub use vif::{high_vif_predictors, variance_inflation_factor, VifRow, VifTable};
