//! Leverage (hat matrix diagonal) calculations.

use crate::inference::compute_xtx_inverse;
use crate::utils::prepend_constant;
use faer::{Col, Mat};

/// Leverage of every row of `design` given `(X'X)⁻¹` of the same design.
///
/// h_ii = x_i' (X'X)⁻¹ x_i, clamped to [0, 1].
pub fn hat_diagonal(design: &Mat<f64>, xtx_inv: &Mat<f64>) -> Col<f64> {
    let p = design.ncols();

    Col::from_fn(design.nrows(), |i| {
        let mut h_ii = 0.0;
        for j in 0..p {
            let xij = design[(i, j)];
            if xij == 0.0 {
                continue;
            }
            for k in 0..p {
                h_ii += xij * xtx_inv[(j, k)] * design[(i, k)];
            }
        }
        h_ii.clamp(0.0, 1.0)
    })
}

/// Compute leverage values (diagonal of hat matrix H = X(X'X)^(-1)X').
///
/// Leverage measures the influence of each observation on its own fitted value.
/// High leverage points have unusual predictor values.
///
/// # Properties
/// - h_ii ∈ [0, 1]
/// - Σ h_ii = p (number of parameters)
/// - Points with h_ii > 2p/n are considered high leverage
///
/// A rank-deficient design yields a vector of NaN.
pub fn compute_leverage(x: &Mat<f64>, with_intercept: bool) -> Col<f64> {
    let design = if with_intercept {
        prepend_constant(x)
    } else {
        x.to_owned()
    };

    match compute_xtx_inverse(&design) {
        Ok(xtx_inv) => hat_diagonal(&design, &xtx_inv),
        Err(_) => Col::from_fn(x.nrows(), |_| f64::NAN),
    }
}

/// Identify high leverage points.
///
/// Returns indices of observations with leverage > threshold.
/// Default threshold is 2p/n where p is number of parameters.
pub fn high_leverage_points(
    leverage: &Col<f64>,
    n_params: usize,
    threshold: Option<f64>,
) -> Vec<usize> {
    let n = leverage.nrows();
    let cutoff = threshold.unwrap_or(2.0 * n_params as f64 / n as f64);

    (0..n).filter(|&i| leverage[i] > cutoff).collect()
}
