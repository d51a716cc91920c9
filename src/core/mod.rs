//! Core types for regression analysis.

mod options;
mod result;

pub use options::{CovarianceType, OptionsError, RegressionOptions, RegressionOptionsBuilder};
pub use result::RegressionResult;
