//! Ordinary Least Squares regression solver.

use crate::core::{CovarianceType, RegressionOptions, RegressionOptionsBuilder, RegressionResult};
use crate::inference::{
    dependent_columns, parameter_covariance, r_factor, xtx_inverse_from_r, CoefficientInference,
    Reference,
};
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::prepend_constant;
use faer::{Col, Mat};

/// Ordinary Least Squares regression estimator.
///
/// Uses the R factor of a QR decomposition of the design matrix. Perfectly
/// collinear designs are rejected with [`RegressionError::RankDeficient`]
/// instead of producing NaN coefficients.
///
/// # Example
///
/// ```rust,ignore
/// use regress_report::solvers::{OlsRegressor, Regressor, FittedRegressor};
/// use regress_report::core::CovarianceType;
/// use faer::{Mat, Col};
///
/// let x = Mat::from_fn(100, 2, |i, j| ((i * (j + 1)) as f64).sin());
/// let y = Col::from_fn(100, |i| 1.0 + 2.0 * x[(i, 0)]);
///
/// let fitted = OlsRegressor::builder()
///     .with_intercept(true)
///     .covariance(CovarianceType::HC3)
///     .build()
///     .fit(&x, &y)?;
///
/// println!("R² = {}", fitted.r_squared());
/// ```
#[derive(Debug, Clone)]
pub struct OlsRegressor {
    options: RegressionOptions,
}

impl OlsRegressor {
    /// Create a new OLS regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }

    /// Options this regressor fits with.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;

        let n_samples = x.nrows();
        let n_features = x.ncols();

        if x.nrows() != y.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: x.nrows(),
                y_len: y.nrows(),
            });
        }

        let offset = usize::from(self.options.with_intercept);
        let n_params = n_features + offset;

        if n_params == 0 {
            return Err(RegressionError::NumericalError(
                "model has no parameters to estimate".to_string(),
            ));
        }

        // Residual df must be positive for any inference
        if n_samples <= n_params {
            return Err(RegressionError::InsufficientObservations {
                needed: n_params + 1,
                got: n_samples,
            });
        }

        let all_finite = (0..n_samples)
            .all(|i| y[i].is_finite() && (0..n_features).all(|j| x[(i, j)].is_finite()));
        if !all_finite {
            return Err(RegressionError::NumericalError(
                "design matrix or target contains non-finite values".to_string(),
            ));
        }

        let design = if self.options.with_intercept {
            prepend_constant(x)
        } else {
            x.to_owned()
        };

        let dependent = dependent_columns(&design, self.options.rank_tolerance);
        if !dependent.is_empty() {
            let aliased = dependent
                .iter()
                .filter(|&&j| j >= offset)
                .map(|&j| j - offset)
                .collect();
            return Err(RegressionError::RankDeficient {
                rank: n_params - dependent.len(),
                n_columns: n_params,
                aliased,
            });
        }

        let xtx_inv = xtx_inverse_from_r(&r_factor(&design))?;
        let beta = Self::solve(&design, y, &xtx_inv);

        let mut fitted_values = Col::zeros(n_samples);
        let mut residuals = Col::zeros(n_samples);
        for i in 0..n_samples {
            let pred: f64 = (0..n_params).map(|j| design[(i, j)] * beta[j]).sum();
            fitted_values[i] = pred;
            residuals[i] = y[i] - pred;
        }

        let intercept = if self.options.with_intercept {
            Some(beta[0])
        } else {
            None
        };
        let coefficients = Col::from_fn(n_features, |j| beta[j + offset]);

        let mut result = RegressionResult::empty(n_features, n_samples);
        result.coefficients = coefficients;
        result.intercept = intercept;
        result.residuals = residuals;
        result.fitted_values = fitted_values;
        result.rank = n_params;
        result.n_parameters = n_params;
        result.confidence_level = self.options.confidence_level;
        result.covariance_type = self.options.covariance;
        result.use_t = self.options.uses_t();

        self.compute_statistics(&mut result);

        if self.options.compute_inference {
            self.compute_inference(&design, &xtx_inv, &mut result);
        }

        Ok(FittedOls {
            options: self.options.clone(),
            result,
            xtx_inverse: xtx_inv,
        })
    }
}

impl OlsRegressor {
    /// β = (X'X)⁻¹ X'y followed by one refinement step on the residuals.
    fn solve(design: &Mat<f64>, y: &Col<f64>, xtx_inv: &Mat<f64>) -> Col<f64> {
        let n = design.nrows();
        let p = design.ncols();

        let project = |v: &Col<f64>| -> Col<f64> {
            let xtv = Col::from_fn(p, |j| (0..n).map(|i| design[(i, j)] * v[i]).sum::<f64>());
            Col::from_fn(p, |j| (0..p).map(|k| xtx_inv[(j, k)] * xtv[k]).sum::<f64>())
        };

        let mut beta = project(y);

        let resid = Col::from_fn(n, |i| {
            y[i] - (0..p).map(|j| design[(i, j)] * beta[j]).sum::<f64>()
        });
        let correction = project(&resid);
        for j in 0..p {
            beta[j] += correction[j];
        }

        beta
    }

    /// Fill in goodness-of-fit statistics and information criteria.
    fn compute_statistics(&self, result: &mut RegressionResult) {
        let n = result.n_observations;
        let n_params = result.n_parameters;

        let tss = result.tss();
        let rss = result.rss();

        let r_squared = if tss > 0.0 {
            (1.0 - rss / tss).clamp(0.0, 1.0)
        } else if rss < 1e-10 {
            1.0
        } else {
            0.0
        };

        let df_total = if result.intercept.is_some() {
            (n - 1) as f64
        } else {
            n as f64
        };
        let df_resid = (n - n_params) as f64;
        let adj_r_squared = if df_resid > 0.0 && df_total > 0.0 {
            1.0 - (1.0 - r_squared) * df_total / df_resid
        } else {
            f64::NAN
        };

        let mse = if df_resid > 0.0 { rss / df_resid } else { f64::NAN };

        // Classical ANOVA F; replaced by the Wald F under a robust covariance
        let df_model = result.model_df() as f64;
        let f_statistic = if df_model > 0.0 && df_resid > 0.0 && mse > 0.0 {
            ((tss - rss) / df_model) / mse
        } else {
            f64::NAN
        };

        // Gaussian log-likelihood at the ML variance estimate RSS/n
        let n_f = n as f64;
        let log_likelihood = if rss > 0.0 {
            -0.5 * n_f * ((2.0 * std::f64::consts::PI).ln() + (rss / n_f).ln() + 1.0)
        } else {
            f64::NAN
        };

        let k = n_params as f64;
        result.r_squared = r_squared;
        result.adj_r_squared = adj_r_squared;
        result.mse = mse;
        result.rmse = mse.sqrt();
        result.f_statistic = f_statistic;
        result.f_pvalue = CoefficientInference::f_pvalue(f_statistic, df_model, df_resid);
        result.log_likelihood = log_likelihood;
        result.aic = 2.0 * k - 2.0 * log_likelihood;
        result.bic = k * n_f.ln() - 2.0 * log_likelihood;
    }

    /// Compute covariance, standard errors, test statistics, p-values and CIs.
    fn compute_inference(
        &self,
        design: &Mat<f64>,
        xtx_inv: &Mat<f64>,
        result: &mut RegressionResult,
    ) {
        let df = result.residual_df() as f64;
        if df <= 0.0 || !result.mse.is_finite() {
            return;
        }

        let covariance = parameter_covariance(
            design,
            &result.residuals,
            xtx_inv,
            result.mse,
            self.options.covariance,
        );
        let se_all = CoefficientInference::standard_errors(&covariance);

        let offset = usize::from(result.intercept.is_some());
        let n_features = result.coefficients.nrows();

        let se = Col::from_fn(n_features, |j| se_all[j + offset]);
        let reference = Reference::new(result.use_t, df);
        let t_stats = CoefficientInference::t_statistics(&result.coefficients, &se);
        let p_vals = CoefficientInference::p_values(&t_stats, reference);
        let (ci_lower, ci_upper) = CoefficientInference::confidence_intervals(
            &result.coefficients,
            &se,
            reference,
            self.options.confidence_level,
        );

        if let Some(intercept) = result.intercept {
            let se_int = se_all[0];
            let t_int = if se_int > 0.0 {
                intercept / se_int
            } else {
                f64::NAN
            };
            let crit = reference.critical_value(self.options.confidence_level);

            result.intercept_std_error = Some(se_int);
            result.intercept_t_statistic = Some(t_int);
            result.intercept_p_value = Some(reference.two_sided_p(t_int));
            result.intercept_conf_interval = Some((intercept - crit * se_int, intercept + crit * se_int));
        }

        if self.options.covariance.is_robust() && n_features > 0 {
            let slope_cov =
                Mat::from_fn(n_features, n_features, |i, j| covariance[(i + offset, j + offset)]);
            let (f_stat, f_p) =
                CoefficientInference::wald_f_test(&result.coefficients, &slope_cov, df);
            result.f_statistic = f_stat;
            result.f_pvalue = f_p;
        }

        result.covariance = Some(covariance);
        result.std_errors = Some(se);
        result.t_statistics = Some(t_stats);
        result.p_values = Some(p_vals);
        result.conf_interval_lower = Some(ci_lower);
        result.conf_interval_upper = Some(ci_upper);
    }
}

/// A fitted OLS regression model.
#[derive(Debug, Clone)]
pub struct FittedOls {
    options: RegressionOptions,
    result: RegressionResult,
    /// (X'X)⁻¹ of the design the model was fit on (intercept column included).
    xtx_inverse: Mat<f64>,
}

impl FittedOls {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// `(X'X)⁻¹` of the fitted design, intercept at index 0 when present.
    pub fn xtx_inverse(&self) -> &Mat<f64> {
        &self.xtx_inverse
    }

    /// Covariance estimator used for inference.
    pub fn covariance_type(&self) -> CovarianceType {
        self.options.covariance
    }
}

impl FittedRegressor for FittedOls {
    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for `OlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct OlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl OlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.builder = self.builder.compute_inference(compute);
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.builder = self.builder.confidence_level(level);
        self
    }

    /// Set the covariance estimator.
    pub fn covariance(mut self, covariance: CovarianceType) -> Self {
        self.builder = self.builder.covariance(covariance);
        self
    }

    /// Set the rank tolerance for the QR rank check.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.rank_tolerance(tol);
        self
    }

    /// Force Student t (`true`) or normal (`false`) coefficient tests.
    pub fn use_t(mut self, use_t: bool) -> Self {
        self.builder = self.builder.use_t(use_t);
        self
    }

    /// Build the OLS regressor. Options are validated when fitting.
    pub fn build(self) -> OlsRegressor {
        OlsRegressor::new(self.builder.build_unchecked())
    }
}
