//! Everything an OLS fit produces.

use super::options::CovarianceType;
use faer::{Col, Mat};

/// Estimates, goodness of fit and (optionally) coefficient inference of one fit.
///
/// Slope quantities are indexed like the predictor columns; the intercept is
/// kept in separate `intercept*` fields so reports can list it as `const`.
#[derive(Debug, Clone)]
pub struct RegressionResult {
    pub coefficients: Col<f64>,
    pub intercept: Option<f64>,
    /// `y - fitted_values`.
    pub residuals: Col<f64>,
    pub fitted_values: Col<f64>,

    /// Rank of the design including the constant column.
    pub rank: usize,
    /// Estimated parameters, constant included.
    pub n_parameters: usize,
    pub n_observations: usize,

    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub rmse: f64,
    /// RSS divided by the residual degrees of freedom.
    pub mse: f64,
    /// Overall significance of the slopes. Classical ANOVA F, or the Wald F
    /// built from the robust covariance when one is selected.
    pub f_statistic: f64,
    pub f_pvalue: f64,

    pub aic: f64,
    pub bic: f64,
    /// Gaussian log-likelihood at the ML variance `RSS/n`.
    pub log_likelihood: f64,

    pub covariance_type: CovarianceType,
    /// Parameter covariance, constant first when present.
    pub covariance: Option<Mat<f64>>,
    pub std_errors: Option<Col<f64>>,
    pub intercept_std_error: Option<f64>,
    pub t_statistics: Option<Col<f64>>,
    pub intercept_t_statistic: Option<f64>,
    /// Two-sided p-values, from Student t on the residual df when `use_t`
    /// and from the standard normal otherwise.
    pub p_values: Option<Col<f64>>,
    pub intercept_p_value: Option<f64>,
    pub conf_interval_lower: Option<Col<f64>>,
    pub conf_interval_upper: Option<Col<f64>>,
    pub intercept_conf_interval: Option<(f64, f64)>,
    pub confidence_level: f64,
    /// Whether tests and intervals use Student t (`t`) or the normal (`z`).
    pub use_t: bool,
}

impl RegressionResult {
    /// Zeroed result sized for a fit; the solver fills it in.
    pub(crate) fn empty(n_features: usize, n_observations: usize) -> Self {
        Self {
            coefficients: Col::zeros(n_features),
            intercept: None,
            residuals: Col::zeros(n_observations),
            fitted_values: Col::zeros(n_observations),
            rank: 0,
            n_parameters: 0,
            n_observations,
            r_squared: 0.0,
            adj_r_squared: 0.0,
            rmse: 0.0,
            mse: 0.0,
            f_statistic: 0.0,
            f_pvalue: 1.0,
            aic: 0.0,
            bic: 0.0,
            log_likelihood: 0.0,
            covariance_type: CovarianceType::Classical,
            covariance: None,
            std_errors: None,
            intercept_std_error: None,
            t_statistics: None,
            intercept_t_statistic: None,
            p_values: None,
            intercept_p_value: None,
            conf_interval_lower: None,
            conf_interval_upper: None,
            intercept_conf_interval: None,
            confidence_level: 0.95,
            use_t: true,
        }
    }

    /// `n - p`.
    pub fn residual_df(&self) -> usize {
        self.n_observations.saturating_sub(self.n_parameters)
    }

    /// Slope count: the constant does not count as a model degree of freedom.
    pub fn model_df(&self) -> usize {
        let constant = usize::from(self.intercept.is_some());
        self.n_parameters.saturating_sub(constant)
    }

    /// Centered around the mean of `y` when a constant is fit, raw otherwise.
    pub fn tss(&self) -> f64 {
        let n = self.n_observations;
        let observed = |i: usize| self.fitted_values[i] + self.residuals[i];

        let center = if self.intercept.is_some() && n > 0 {
            (0..n).map(observed).sum::<f64>() / n as f64
        } else {
            0.0
        };
        (0..n).map(|i| (observed(i) - center).powi(2)).sum()
    }

    pub fn rss(&self) -> f64 {
        (0..self.residuals.nrows())
            .map(|i| self.residuals[i] * self.residuals[i])
            .sum()
    }

    /// `TSS - RSS`.
    pub fn ess(&self) -> f64 {
        self.tss() - self.rss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn with_observations(observed: &[f64], fitted: &[f64]) -> RegressionResult {
        let n = observed.len();
        let mut result = RegressionResult::empty(1, n);
        result.fitted_values = Col::from_fn(n, |i| fitted[i]);
        result.residuals = Col::from_fn(n, |i| observed[i] - fitted[i]);
        result
    }

    #[test]
    fn test_degrees_of_freedom() {
        let mut result = RegressionResult::empty(9, 192);
        result.n_parameters = 10;
        result.intercept = Some(0.0);
        assert_eq!(result.residual_df(), 182);
        assert_eq!(result.model_df(), 9);

        result.intercept = None;
        assert_eq!(result.model_df(), 10);
    }

    #[test]
    fn test_sums_of_squares_with_constant() {
        let mut result = with_observations(&[2.0, 4.0, 6.0, 8.0], &[2.5, 3.5, 6.5, 7.5]);
        result.intercept = Some(0.0);

        assert_relative_eq!(result.rss(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(result.tss(), 20.0, epsilon = 1e-12);
        assert_relative_eq!(result.ess(), 19.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tss_uncentered_without_constant() {
        let result = with_observations(&[1.0, 2.0], &[1.0, 2.0]);
        assert_relative_eq!(result.tss(), 5.0, epsilon = 1e-12);
        assert_eq!(result.rss(), 0.0);
    }
}
