//! Estimator traits and the error every fit can return.

use crate::core::{OptionsError, RegressionResult};
use faer::{Col, Mat};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("dimension mismatch: X has {x_rows} rows but y has {y_len} elements")]
    DimensionMismatch { x_rows: usize, y_len: usize },

    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    /// `aliased` indexes the predictor columns that lie in the span of the
    /// columns before them (the constant included).
    #[error(
        "design matrix is rank deficient: rank {rank} with {n_columns} columns \
         (dependent columns: {aliased:?})"
    )]
    RankDeficient {
        rank: usize,
        n_columns: usize,
        aliased: Vec<usize>,
    },

    #[error("matrix is singular or nearly singular")]
    SingularMatrix,

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    #[error("numerical error: {0}")]
    NumericalError(String),
}

/// Something that can be fit to a predictor matrix and a response.
pub trait Regressor {
    type Fitted: FittedRegressor;

    /// `x` holds the predictors only; the constant column is added from the options.
    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError>;
}

/// A fit that owns its [`RegressionResult`].
pub trait FittedRegressor {
    fn result(&self) -> &RegressionResult;

    fn coefficients(&self) -> &Col<f64> {
        &self.result().coefficients
    }

    fn intercept(&self) -> Option<f64> {
        self.result().intercept
    }

    fn r_squared(&self) -> f64 {
        self.result().r_squared
    }
}
