//! Parameter covariance estimators, classical and heteroscedasticity-consistent.
//!
//! The robust variants use the sandwich formula
//! `V_HC = (X'X)⁻¹ X' Ω X (X'X)⁻¹` with diagonal Ω:
//!
//! | type | ω_i |
//! |------|-----|
//! | HC0  | e_i² |
//! | HC1  | n/(n-p) · e_i² |
//! | HC2  | e_i² / (1 - h_ii) |
//! | HC3  | e_i² / (1 - h_ii)² |
//!
//! # References
//!
//! - White, H. (1980). "A Heteroskedasticity-Consistent Covariance Matrix Estimator
//!   and a Direct Test for Heteroskedasticity." *Econometrica*, 48(4), 817–838.
//! - MacKinnon, J.G. & White, H. (1985). "Some Heteroskedasticity-Consistent
//!   Covariance Matrix Estimators with Improved Finite Sample Properties."
//!   *Journal of Econometrics*, 29(3), 305–325.

use crate::core::CovarianceType;
use crate::diagnostics::hat_diagonal;
use faer::{Col, Mat};

/// Parameter covariance matrix for a fitted least-squares model.
///
/// # Arguments
/// * `design` - Full design matrix (n × p), intercept column included when present
/// * `residuals` - OLS residuals
/// * `xtx_inv` - `(X'X)⁻¹` of `design`
/// * `mse` - RSS / (n - p), only used by the classical estimator
/// * `covariance_type` - Which estimator to compute
pub fn parameter_covariance(
    design: &Mat<f64>,
    residuals: &Col<f64>,
    xtx_inv: &Mat<f64>,
    mse: f64,
    covariance_type: CovarianceType,
) -> Mat<f64> {
    let p = design.ncols();

    if covariance_type == CovarianceType::Classical {
        return Mat::from_fn(p, p, |i, j| mse * xtx_inv[(i, j)]);
    }

    let omega = omega_weights(design, residuals, xtx_inv, covariance_type);

    // Meat: X' Ω X
    let n = design.nrows();
    let mut meat: Mat<f64> = Mat::zeros(p, p);
    for i in 0..n {
        let w = omega[i];
        for r in 0..p {
            let xr = w * design[(i, r)];
            for c in 0..p {
                meat[(r, c)] += xr * design[(i, c)];
            }
        }
    }

    let bread_meat = xtx_inv * &meat;
    &bread_meat * xtx_inv
}

/// Diagonal weights of Ω for the given robust estimator.
fn omega_weights(
    design: &Mat<f64>,
    residuals: &Col<f64>,
    xtx_inv: &Mat<f64>,
    covariance_type: CovarianceType,
) -> Col<f64> {
    let n = design.nrows();
    let p = design.ncols();

    match covariance_type {
        CovarianceType::Classical | CovarianceType::HC0 => {
            Col::from_fn(n, |i| residuals[i].powi(2))
        }
        CovarianceType::HC1 => {
            let scale = n as f64 / (n.saturating_sub(p)).max(1) as f64;
            Col::from_fn(n, |i| scale * residuals[i].powi(2))
        }
        CovarianceType::HC2 => {
            let h = hat_diagonal(design, xtx_inv);
            Col::from_fn(n, |i| residuals[i].powi(2) / (1.0 - h[i]).max(1e-14))
        }
        CovarianceType::HC3 => {
            let h = hat_diagonal(design, xtx_inv);
            Col::from_fn(n, |i| {
                let one_minus_h = (1.0 - h[i]).max(1e-14);
                residuals[i].powi(2) / (one_minus_h * one_minus_h)
            })
        }
    }
}
