//! Breusch-Pagan test for heteroscedastic residuals.
//!
//! The auxiliary regression always carries an intercept; `x` holds the
//! predictors of the original model without their constant column, so the
//! test has `x.ncols()` degrees of freedom.

use crate::core::CovarianceType;
use crate::solvers::{FittedRegressor, OlsRegressor, RegressionError, Regressor};
use clap::ValueEnum;
use faer::{Col, Mat};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::fmt;

/// Form of the Lagrange-multiplier statistic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BreuschPaganVariant {
    /// Koenker's studentized form, `n·R²` of `e²` on X.
    #[default]
    Koenker,
    /// Breusch and Pagan's form, half the explained sum of squares of
    /// `e²/σ̂²` on X. Assumes normal errors.
    Original,
}

/// Which p-value decides the verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BpCriterion {
    #[default]
    F,
    Lm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Heteroscedastic,
    Homoscedastic,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Heteroscedastic => write!(f, "heterocedasticidade"),
            Verdict::Homoscedastic => write!(f, "homocedasticidade"),
        }
    }
}

/// Outcome of a Breusch-Pagan test.
#[derive(Debug, Clone, PartialEq)]
pub struct BreuschPagan {
    pub variant: BreuschPaganVariant,
    pub lm_statistic: f64,
    pub lm_pvalue: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    /// Numerator degrees of freedom (number of non-constant regressors).
    pub df: usize,
    pub criterion: BpCriterion,
    pub significance: f64,
    pub verdict: Verdict,
}

impl BreuschPagan {
    /// Run the test on the residuals of a model fit on `x`.
    pub fn test(
        residuals: &Col<f64>,
        x: &Mat<f64>,
        variant: BreuschPaganVariant,
        criterion: BpCriterion,
        significance: f64,
    ) -> Result<Self, RegressionError> {
        let n = residuals.nrows();
        let k = x.ncols();

        if x.nrows() != n {
            return Err(RegressionError::DimensionMismatch {
                x_rows: x.nrows(),
                y_len: n,
            });
        }
        if k == 0 {
            return Err(RegressionError::NumericalError(
                "Breusch-Pagan test needs at least one regressor".to_string(),
            ));
        }

        let rss: f64 = (0..n).map(|i| residuals[i] * residuals[i]).sum();
        if rss <= 0.0 {
            return Err(RegressionError::NumericalError(
                "residuals are identically zero".to_string(),
            ));
        }

        let squared = match variant {
            BreuschPaganVariant::Koenker => Col::from_fn(n, |i| residuals[i] * residuals[i]),
            BreuschPaganVariant::Original => {
                let sigma2 = rss / n as f64;
                Col::from_fn(n, |i| residuals[i] * residuals[i] / sigma2)
            }
        };

        // Equal squared residuals leave nothing for the auxiliary fit to explain
        let mean_sq = (0..n).map(|i| squared[i]).sum::<f64>() / n as f64;
        let spread: f64 = (0..n).map(|i| (squared[i] - mean_sq).powi(2)).sum();
        if spread <= f64::EPSILON * mean_sq * mean_sq * n as f64 {
            return Ok(Self {
                variant,
                lm_statistic: 0.0,
                lm_pvalue: 1.0,
                f_statistic: 0.0,
                f_pvalue: 1.0,
                df: k,
                criterion,
                significance,
                verdict: Verdict::Homoscedastic,
            });
        }

        let auxiliary = OlsRegressor::builder()
            .with_intercept(true)
            .compute_inference(false)
            .covariance(CovarianceType::Classical)
            .build()
            .fit(x, &squared)?;
        let aux = auxiliary.result();

        let lm_statistic = match variant {
            BreuschPaganVariant::Koenker => n as f64 * aux.r_squared,
            BreuschPaganVariant::Original => aux.ess() / 2.0,
        };
        let lm_pvalue = chi_squared_sf(lm_statistic, k as f64);

        let (f_statistic, f_pvalue) = (aux.f_statistic, aux.f_pvalue);

        let decisive = match criterion {
            BpCriterion::F => f_pvalue,
            BpCriterion::Lm => lm_pvalue,
        };
        let verdict = if decisive < significance {
            Verdict::Heteroscedastic
        } else {
            Verdict::Homoscedastic
        };

        Ok(Self {
            variant,
            lm_statistic,
            lm_pvalue,
            f_statistic,
            f_pvalue,
            df: k,
            criterion,
            significance,
            verdict,
        })
    }

    pub fn rejects_homoscedasticity(&self) -> bool {
        self.verdict == Verdict::Heteroscedastic
    }
}

fn chi_squared_sf(statistic: f64, df: f64) -> f64 {
    if !statistic.is_finite() || df <= 0.0 {
        return f64::NAN;
    }
    match ChiSquared::new(df) {
        Ok(dist) => dist.sf(statistic.max(0.0)),
        Err(_) => f64::NAN,
    }
}
