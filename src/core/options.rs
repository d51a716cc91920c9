//! Regression options and configuration.

use std::fmt;

use thiserror::Error;

/// Estimator used for the coefficient covariance matrix.
///
/// The heteroscedasticity-consistent variants use the sandwich form
/// `(X'X)⁻¹ X' Ω X (X'X)⁻¹` with a diagonal Ω built from the residuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CovarianceType {
    /// Homoscedastic estimator: `σ² (X'X)⁻¹`.
    Classical,
    /// White's estimator: `ω_i = e_i²`.
    #[value(name = "hc0")]
    HC0,
    /// Degrees-of-freedom corrected: `ω_i = n/(n-p) · e_i²`.
    #[value(name = "hc1")]
    HC1,
    /// Leverage corrected: `ω_i = e_i² / (1 - h_ii)`.
    #[value(name = "hc2")]
    HC2,
    /// Jackknife-like: `ω_i = e_i² / (1 - h_ii)²`.
    #[default]
    #[value(name = "hc3")]
    HC3,
}

impl CovarianceType {
    /// Whether this is one of the sandwich (robust) estimators.
    pub fn is_robust(self) -> bool {
        !matches!(self, CovarianceType::Classical)
    }
}

impl fmt::Display for CovarianceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CovarianceType::Classical => "nonrobust",
            CovarianceType::HC0 => "HC0",
            CovarianceType::HC1 => "HC1",
            CovarianceType::HC2 => "HC2",
            CovarianceType::HC3 => "HC3",
        };
        f.write_str(label)
    }
}

/// Configuration options for regression models.
#[derive(Debug, Clone)]
pub struct RegressionOptions {
    /// Whether to include an intercept term (default: true).
    pub with_intercept: bool,
    /// Whether to compute standard errors and inference statistics (default: true).
    pub compute_inference: bool,
    /// Confidence level for confidence intervals (default: 0.95).
    pub confidence_level: f64,
    /// Covariance estimator for inference (default: HC3).
    pub covariance: CovarianceType,
    /// Relative tolerance below which a design column counts as linearly
    /// dependent on the columns before it.
    pub rank_tolerance: f64,
    /// Reference distribution for coefficient tests. `None` uses Student t
    /// for the classical covariance and the standard normal for robust ones.
    pub use_t: Option<bool>,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            with_intercept: true,
            compute_inference: true,
            confidence_level: 0.95,
            covariance: CovarianceType::HC3,
            rank_tolerance: 1e-10,
            use_t: None,
        }
    }
}

/// Errors that can occur when validating regression options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("confidence_level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("rank_tolerance must be positive and finite, got {0}")]
    InvalidRankTolerance(f64),
}

impl RegressionOptions {
    /// Create a new builder for regression options.
    pub fn builder() -> RegressionOptionsBuilder {
        RegressionOptionsBuilder::default()
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.confidence_level <= 0.0 || self.confidence_level >= 1.0 {
            return Err(OptionsError::InvalidConfidenceLevel(self.confidence_level));
        }
        if self.rank_tolerance <= 0.0 || !self.rank_tolerance.is_finite() {
            return Err(OptionsError::InvalidRankTolerance(self.rank_tolerance));
        }
        Ok(())
    }

    /// Whether coefficient tests use Student t rather than the standard normal.
    pub fn uses_t(&self) -> bool {
        self.use_t.unwrap_or(!self.covariance.is_robust())
    }
}

/// Builder for `RegressionOptions`.
#[derive(Debug, Clone, Default)]
pub struct RegressionOptionsBuilder {
    options: RegressionOptions,
}

impl RegressionOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.options.with_intercept = include;
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.options.compute_inference = compute;
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.options.confidence_level = level;
        self
    }

    /// Set the covariance estimator.
    pub fn covariance(mut self, covariance: CovarianceType) -> Self {
        self.options.covariance = covariance;
        self
    }

    /// Set the rank tolerance for the QR rank check.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.options.rank_tolerance = tol;
        self
    }

    /// Force Student t (`true`) or normal (`false`) coefficient tests.
    pub fn use_t(mut self, use_t: bool) -> Self {
        self.options.use_t = Some(use_t);
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<RegressionOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build without validating. Estimators validate again when fitting.
    pub fn build_unchecked(self) -> RegressionOptions {
        self.options
    }
}
