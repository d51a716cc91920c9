//! The end-to-end analysis: configuration, model stages and the pipeline driver.

mod config;
mod log_model;
mod model;
mod pipeline;
mod stepwise;

pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigError};
pub use log_model::{fit_log_model, percent_effect, LogModelOutcome};
pub use model::ModelFit;
pub use pipeline::{run, run_on_dataset, AnalysisOutcome};
pub use stepwise::{least_significant, reduce_once, Elimination, ReducedModel};

use crate::core::OptionsError;
use crate::data::DataError;
use crate::report::PlotError;
use crate::solvers::RegressionError;
use thiserror::Error;

/// Any failure that aborts an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Regression(#[from] RegressionError),

    #[error("invalid regression options: {0}")]
    Options(#[from] OptionsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("plot error: {0}")]
    Plot(#[from] PlotError),
}
