//! Influence measures: leverage, studentized residuals and Cook's distance.

use crate::diagnostics::leverage::{hat_diagonal, high_leverage_points};
use crate::diagnostics::residuals::{
    externally_studentized_residuals, residual_outliers, studentized_residuals,
};
use crate::solvers::{FittedOls, FittedRegressor};
use crate::utils::prepend_constant;
use faer::{Col, Mat};

/// Compute Cook's distance for each observation.
///
/// Cook's distance measures the influence of each observation on the fitted values.
/// D_i = (e_i² / (p * MSE)) * (h_ii / (1 - h_ii)²)
///
/// Observations with D_i > 4/n or D_i > 1 are typically considered influential.
pub fn cooks_distance(
    residuals: &Col<f64>,
    leverage: &Col<f64>,
    mse: f64,
    n_params: usize,
) -> Col<f64> {
    let n = residuals.nrows();

    if mse <= 0.0 || !mse.is_finite() || n_params == 0 {
        return Col::from_fn(n, |_| f64::NAN);
    }

    Col::from_fn(n, |i| {
        let e_i = residuals[i];
        let h_ii = leverage[i];
        let one_minus_h = (1.0 - h_ii).max(1e-14);

        let d_i = (e_i * e_i / (n_params as f64 * mse)) * (h_ii / (one_minus_h * one_minus_h));

        if d_i.is_finite() {
            d_i.max(0.0)
        } else {
            f64::NAN
        }
    })
}

/// Conventional Cook's distance cutoff, 4/n.
pub fn cooks_threshold(n_observations: usize) -> f64 {
    if n_observations == 0 {
        f64::INFINITY
    } else {
        4.0 / n_observations as f64
    }
}

/// Identify influential observations based on Cook's distance.
///
/// Returns indices of observations with D_i > threshold (4/n when `None`).
pub fn influential_cooks(cooks_d: &Col<f64>, threshold: Option<f64>) -> Vec<usize> {
    let cutoff = threshold.unwrap_or_else(|| cooks_threshold(cooks_d.nrows()));

    (0..cooks_d.nrows())
        .filter(|&i| cooks_d[i].is_finite() && cooks_d[i] > cutoff)
        .collect()
}

/// One row of the influence summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfluentialObservation {
    /// Zero-based row of the fitted data.
    pub index: usize,
    /// Input row the observation came from.
    pub row: usize,
    pub leverage: f64,
    pub studentized: f64,
    pub externally_studentized: f64,
    pub cooks_distance: f64,
}

/// Per-observation influence measures of a fitted OLS model.
#[derive(Debug, Clone)]
pub struct InfluenceMeasures {
    pub leverage: Col<f64>,
    pub studentized: Col<f64>,
    pub externally_studentized: Col<f64>,
    pub cooks_distance: Col<f64>,
    /// Cook's distance above which an observation counts as influential.
    pub threshold: f64,
    /// Parameters of the fit, constant included.
    pub n_parameters: usize,
    /// Input row of each observation; `0..n` unless relabelled.
    pub row_ids: Vec<usize>,
}

impl InfluenceMeasures {
    /// Compute the measures for `fitted`, which must have been fit on `x`.
    ///
    /// `x` holds the predictors only; the constant column is added back when
    /// the model has an intercept.
    pub fn compute(x: &Mat<f64>, fitted: &FittedOls) -> Self {
        let result = fitted.result();
        let design = if result.intercept.is_some() {
            prepend_constant(x)
        } else {
            x.to_owned()
        };

        let leverage = hat_diagonal(&design, fitted.xtx_inverse());
        let studentized = studentized_residuals(&result.residuals, &leverage, result.mse);
        let externally_studentized = externally_studentized_residuals(
            &result.residuals,
            &leverage,
            result.mse,
            result.n_parameters,
        );
        let cooks = cooks_distance(&result.residuals, &leverage, result.mse, result.n_parameters);

        Self {
            threshold: cooks_threshold(result.n_observations),
            leverage,
            studentized,
            externally_studentized,
            cooks_distance: cooks,
            n_parameters: result.n_parameters,
            row_ids: (0..result.n_observations).collect(),
        }
    }

    /// Label observations with the input rows they came from.
    pub fn with_row_ids(mut self, row_ids: &[usize]) -> Self {
        if row_ids.len() == self.row_ids.len() {
            self.row_ids = row_ids.to_vec();
        }
        self
    }

    pub fn n_observations(&self) -> usize {
        self.cooks_distance.nrows()
    }

    /// Indices whose Cook's distance exceeds the threshold.
    pub fn influential(&self) -> Vec<usize> {
        influential_cooks(&self.cooks_distance, Some(self.threshold))
    }

    /// Indices with leverage above `2p/n`.
    pub fn high_leverage(&self) -> Vec<usize> {
        high_leverage_points(&self.leverage, self.n_parameters, None)
    }

    /// Indices whose studentized residual exceeds `cutoff` in absolute value.
    pub fn outliers(&self, cutoff: f64) -> Vec<usize> {
        residual_outliers(&self.studentized, cutoff)
    }

    pub fn observation(&self, index: usize) -> InfluentialObservation {
        InfluentialObservation {
            index,
            row: self.row_ids[index],
            leverage: self.leverage[index],
            studentized: self.studentized[index],
            externally_studentized: self.externally_studentized[index],
            cooks_distance: self.cooks_distance[index],
        }
    }

    /// The `limit` observations with the largest Cook's distance, largest first.
    pub fn top(&self, limit: usize) -> Vec<InfluentialObservation> {
        let mut order: Vec<usize> = (0..self.n_observations())
            .filter(|&i| self.cooks_distance[i].is_finite())
            .collect();
        order.sort_by(|&a, &b| self.cooks_distance[b].total_cmp(&self.cooks_distance[a]));

        order
            .into_iter()
            .take(limit)
            .map(|i| self.observation(i))
            .collect()
    }
}
