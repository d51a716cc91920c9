//! Regression report for hardware response-time datasets.
//!
//! Loads a CSV, drops incomplete rows, describes every column, fits an OLS
//! model with heteroscedasticity-consistent (HC3) inference and writes a text
//! report with VIF, Breusch-Pagan, a one-step reduced model, a log-target
//! model and Cook's-distance influence plots.
//!
//! # Example
//!
//! ```rust,ignore
//! use regress_report::prelude::*;
//!
//! let config = AnalysisConfig::builder()
//!     .input("dataset_5.csv")
//!     .output_dir("output")
//!     .build()?;
//!
//! let outcome = run(&config)?;
//! println!("{}", outcome.breusch_pagan.verdict);
//! ```
//!
//! The regression layer is usable on its own:
//!
//! ```rust,ignore
//! let fitted = OlsRegressor::builder()
//!     .with_intercept(true)
//!     .covariance(CovarianceType::HC3)
//!     .build()
//!     .fit(&x, &y)?;
//! println!("R² = {}", fitted.result().r_squared);
//! ```

pub mod analysis;
pub mod core;
pub mod data;
pub mod diagnostics;
pub mod inference;
pub mod report;
pub mod solvers;
pub mod stats;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analysis::{
        fit_log_model, run, run_on_dataset, AnalysisConfig, AnalysisError, AnalysisOutcome,
        LogModelOutcome, ModelFit,
    };
    pub use crate::core::{
        CovarianceType, RegressionOptions, RegressionOptionsBuilder, RegressionResult,
    };
    pub use crate::data::{load_csv, BaseLevel, CsvOptions, DataError, Dataset, DesignMatrix};
    pub use crate::diagnostics::{
        cooks_distance, BpCriterion, BreuschPagan, BreuschPaganVariant, InfluenceMeasures,
        Verdict, VifTable,
    };
    pub use crate::report::Report;
    pub use crate::solvers::{FittedOls, FittedRegressor, OlsRegressor, RegressionError, Regressor};
}

pub use crate::analysis::{run, AnalysisConfig, AnalysisError, AnalysisOutcome};
pub use crate::core::{CovarianceType, RegressionOptions, RegressionResult};
pub use crate::solvers::{FittedRegressor, OlsRegressor, Regressor};
