//! Variance Inflation Factor (VIF) for multicollinearity detection.

use crate::core::CovarianceType;
use crate::solvers::{FittedRegressor, OlsRegressor, RegressionError, Regressor};
use crate::utils::{column, drop_column};
use faer::{Col, Mat};

/// R² at or above which a predictor counts as perfectly explained.
const PERFECT_FIT_R2: f64 = 1.0 - 1e-12;

/// Compute Variance Inflation Factor for each predictor.
///
/// VIF measures how much the variance of a coefficient estimate is inflated
/// due to multicollinearity. For predictor j:
///
/// VIF_j = 1 / (1 - R²_j)
///
/// where R²_j is the R² from regressing x_j on all other predictors plus an
/// intercept. `x` must not contain a constant column.
///
/// # Interpretation
/// - VIF = 1: No correlation with other predictors
/// - VIF > 5: Moderate multicollinearity
/// - VIF > 10: High multicollinearity
///
/// A predictor that is an exact linear combination of the others (or is
/// constant) gets `f64::INFINITY`.
pub fn variance_inflation_factor(x: &Mat<f64>) -> Col<f64> {
    let p = x.ncols();
    Col::from_fn(p, |j| single_vif(x, j))
}

fn single_vif(x: &Mat<f64>, j: usize) -> f64 {
    let target = column(x, j);
    let mut others = drop_column(x, j);

    let model = OlsRegressor::builder()
        .with_intercept(true)
        .compute_inference(false)
        .covariance(CovarianceType::Classical)
        .build();

    // Aliased columns among the other predictors do not change the column
    // space, so they are dropped and the auxiliary fit retried.
    loop {
        match model.fit(&others, &target) {
            Ok(fitted) => {
                let r_squared = fitted.r_squared();
                return if r_squared >= PERFECT_FIT_R2 {
                    f64::INFINITY
                } else {
                    (1.0 / (1.0 - r_squared)).max(1.0)
                };
            }
            Err(RegressionError::RankDeficient { aliased, .. }) if !aliased.is_empty() => {
                let mut aliased = aliased;
                aliased.sort_unstable();
                for &col in aliased.iter().rev() {
                    others = drop_column(&others, col);
                }
            }
            Err(_) => return f64::NAN,
        }
    }
}

/// Identify predictors with high multicollinearity.
///
/// Returns indices of predictors with VIF > threshold.
pub fn high_vif_predictors(vif: &Col<f64>, threshold: f64) -> Vec<usize> {
    (0..vif.nrows()).filter(|&j| vif[j] > threshold).collect()
}

/// VIF of one named predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct VifRow {
    pub name: String,
    pub vif: f64,
    pub flagged: bool,
}

/// VIF of every predictor of a design, flagged against a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct VifTable {
    pub rows: Vec<VifRow>,
    pub threshold: f64,
}

impl VifTable {
    /// `names` must line up with the columns of `x`.
    pub fn compute(x: &Mat<f64>, names: &[String], threshold: f64) -> Self {
        let vif = variance_inflation_factor(x);
        let high = high_vif_predictors(&vif, threshold);
        let rows = names
            .iter()
            .enumerate()
            .map(|(j, name)| VifRow {
                name: name.clone(),
                vif: vif[j],
                flagged: high.contains(&j),
            })
            .collect();

        Self { rows, threshold }
    }

    pub fn flagged(&self) -> impl Iterator<Item = &VifRow> {
        self.rows.iter().filter(|row| row.flagged)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.rows.iter().find(|row| row.name == name).map(|row| row.vif)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vif_orthogonal_predictors() {
        let x = Mat::from_fn(100, 2, |i, j| {
            let t = i as f64 * 0.1;
            if j == 0 {
                t.sin()
            } else {
                t.cos()
            }
        });

        let vif = variance_inflation_factor(&x);

        assert!((vif[0] - 1.0).abs() < 0.5, "VIF[0] = {}", vif[0]);
        assert!((vif[1] - 1.0).abs() < 0.5, "VIF[1] = {}", vif[1]);
    }

    #[test]
    fn test_vif_collinear_predictors() {
        let x = Mat::from_fn(100, 2, |i, j| {
            let t = i as f64;
            if j == 0 {
                t
            } else {
                t + 0.01 * t.sin()
            }
        });

        let vif = variance_inflation_factor(&x);

        assert!(vif[0] > 10.0, "VIF[0] = {}", vif[0]);
        assert!(vif[1] > 10.0, "VIF[1] = {}", vif[1]);
    }

    #[test]
    fn test_vif_exact_combination_is_infinite() {
        let x = Mat::from_fn(30, 3, |i, j| {
            let a = i as f64;
            let b = (i as f64 * 0.9).cos();
            match j {
                0 => a,
                1 => b,
                _ => 2.0 * a - b,
            }
        });

        let vif = variance_inflation_factor(&x);

        for j in 0..3 {
            assert!(vif[j].is_infinite(), "VIF[{}] = {}", j, vif[j]);
        }
    }

    #[test]
    fn test_single_predictor_has_unit_vif() {
        let x = Mat::from_fn(20, 1, |i, _| (i as f64).sqrt());
        let vif = variance_inflation_factor(&x);
        assert!((vif[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_table_flags_by_threshold() {
        let x = Mat::from_fn(50, 3, |i, j| {
            let t = i as f64;
            match j {
                0 => t,
                1 => t.sin(),
                _ => t * 1.01 + 0.5 + 0.05 * (t * 3.1).cos(),
            }
        });
        let names: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();

        let table = VifTable::compute(&x, &names, 10.0);

        assert_eq!(table.len(), 3);
        let flagged: Vec<&str> = table.flagged().map(|r| r.name.as_str()).collect();
        assert_eq!(flagged, vec!["a", "c"]);
        assert!(table.get("b").expect("row for b") < 10.0);
        assert_eq!(high_vif_predictors(&variance_inflation_factor(&x), 10.0), vec![0, 2]);
    }
}
