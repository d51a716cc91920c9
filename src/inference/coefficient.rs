//! Coefficient inference calculations.

use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, Normal, StudentsT};

use super::gram::invert_spd;

/// Distribution coefficient test statistics are compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reference {
    /// Student t with the given degrees of freedom.
    StudentT(f64),
    /// Standard normal (large-sample robust inference).
    Normal,
}

impl Reference {
    /// Student t on `df` when `use_t`, the standard normal otherwise.
    pub fn new(use_t: bool, df: f64) -> Self {
        if use_t {
            Reference::StudentT(df)
        } else {
            Reference::Normal
        }
    }

    pub fn is_student_t(self) -> bool {
        matches!(self, Reference::StudentT(_))
    }

    /// `P(|Z| > |stat|)`; NaN for a NaN statistic or df <= 0.
    pub fn two_sided_p(self, stat: f64) -> f64 {
        if stat.is_nan() {
            return f64::NAN;
        }
        match self {
            Reference::StudentT(df) if df > 0.0 => StudentsT::new(0.0, 1.0, df)
                .map_or(f64::NAN, |d| 2.0 * d.sf(stat.abs())),
            Reference::StudentT(_) => f64::NAN,
            Reference::Normal => {
                Normal::new(0.0, 1.0).map_or(f64::NAN, |d| 2.0 * d.sf(stat.abs()))
            }
        }
    }

    /// Two-sided critical value at `confidence_level`; NaN for df <= 0.
    pub fn critical_value(self, confidence_level: f64) -> f64 {
        let q = 1.0 - (1.0 - confidence_level) / 2.0;
        match self {
            Reference::StudentT(df) if df > 0.0 => {
                StudentsT::new(0.0, 1.0, df).map_or(f64::NAN, |d| d.inverse_cdf(q))
            }
            Reference::StudentT(_) => f64::NAN,
            Reference::Normal => Normal::new(0.0, 1.0).map_or(f64::NAN, |d| d.inverse_cdf(q)),
        }
    }
}

/// Computes inference statistics for regression coefficients.
pub struct CoefficientInference;

impl CoefficientInference {
    /// Standard errors from the diagonal of a parameter covariance matrix.
    ///
    /// SE(β_j) = sqrt(V_jj); negative variances (numerical noise) give NaN.
    pub fn standard_errors(covariance: &Mat<f64>) -> Col<f64> {
        Col::from_fn(covariance.nrows(), |j| {
            let var = covariance[(j, j)];
            if var >= 0.0 {
                var.sqrt()
            } else {
                f64::NAN
            }
        })
    }

    /// Compute t-statistics for coefficients.
    ///
    /// t_j = β_j / SE(β_j)
    pub fn t_statistics(coefficients: &Col<f64>, std_errors: &Col<f64>) -> Col<f64> {
        Col::from_fn(coefficients.nrows(), |j| {
            if std_errors[j].is_nan() || std_errors[j] == 0.0 {
                f64::NAN
            } else {
                coefficients[j] / std_errors[j]
            }
        })
    }

    /// Two-sided p-values of the test statistics against `reference`.
    pub fn p_values(statistics: &Col<f64>, reference: Reference) -> Col<f64> {
        Col::from_fn(statistics.nrows(), |j| reference.two_sided_p(statistics[j]))
    }

    /// Compute confidence intervals for coefficients.
    ///
    /// CI_j = β_j ± q_{α/2} * SE(β_j), with q from `reference`.
    pub fn confidence_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        reference: Reference,
        confidence_level: f64,
    ) -> (Col<f64>, Col<f64>) {
        let crit = reference.critical_value(confidence_level);
        let n = coefficients.nrows();

        let lower = Col::from_fn(n, |j| coefficients[j] - crit * std_errors[j]);
        let upper = Col::from_fn(n, |j| coefficients[j] + crit * std_errors[j]);

        (lower, upper)
    }

    /// Wald F-test that every coefficient in `beta` is zero.
    ///
    /// F = β' V⁻¹ β / q with `q = len(β)`, compared against F(q, df_resid).
    /// Returns `(NaN, NaN)` when V cannot be inverted.
    pub fn wald_f_test(beta: &Col<f64>, covariance: &Mat<f64>, df_resid: f64) -> (f64, f64) {
        let q = beta.nrows();
        if q == 0 || df_resid <= 0.0 {
            return (f64::NAN, f64::NAN);
        }

        let v_inv = match invert_spd(covariance) {
            Ok(inv) => inv,
            Err(_) => return (f64::NAN, f64::NAN),
        };

        let mut quad = 0.0;
        for i in 0..q {
            for j in 0..q {
                quad += beta[i] * v_inv[(i, j)] * beta[j];
            }
        }
        let f_stat = quad / q as f64;

        (f_stat, Self::f_pvalue(f_stat, q as f64, df_resid))
    }

    /// Upper-tail p-value of an F statistic.
    pub fn f_pvalue(f_stat: f64, df_num: f64, df_den: f64) -> f64 {
        if !f_stat.is_finite() || df_num <= 0.0 || df_den <= 0.0 {
            return f64::NAN;
        }
        FisherSnedecor::new(df_num, df_den).map_or(f64::NAN, |d| d.sf(f_stat))
    }
}
