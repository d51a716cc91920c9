//! Internally and externally studentized residuals.

use faer::Col;

/// Compute internally studentized residuals: e_i / (s * sqrt(1 - h_ii))
///
/// These account for the varying variance of residuals due to leverage.
/// They are the vertical axis of the influence plot.
pub fn studentized_residuals(residuals: &Col<f64>, leverage: &Col<f64>, mse: f64) -> Col<f64> {
    let n = residuals.nrows();

    if mse <= 0.0 || !mse.is_finite() {
        return Col::from_fn(n, |_| f64::NAN);
    }

    let s = mse.sqrt();

    Col::from_fn(n, |i| {
        let denominator = s * one_minus(leverage[i]).sqrt();
        residuals[i] / denominator
    })
}

/// Compute externally studentized residuals (deleted residuals).
///
/// Uses leave-one-out MSE: e_i / (s_{(i)} * sqrt(1 - h_ii))
/// where s_{(i)} is the standard error computed without observation i.
///
/// These follow a t-distribution with n-p-1 degrees of freedom under null.
pub fn externally_studentized_residuals(
    residuals: &Col<f64>,
    leverage: &Col<f64>,
    mse: f64,
    n_params: usize,
) -> Col<f64> {
    let n = residuals.nrows();

    if n <= n_params + 1 || mse <= 0.0 || !mse.is_finite() {
        return Col::from_fn(n, |_| f64::NAN);
    }

    let df_resid = n - n_params;
    let rss = mse * df_resid as f64;

    Col::from_fn(n, |i| {
        let e_i = residuals[i];
        let h = one_minus(leverage[i]);

        match leave_one_out_mse(rss, e_i, h, df_resid) {
            Some(mse_loo) => e_i / (mse_loo.sqrt() * h.sqrt()),
            None => f64::NAN,
        }
    })
}

/// Identify outliers based on studentized residuals.
///
/// Returns indices of observations with |r_i| > threshold.
/// Common threshold is 2 or 3.
pub fn residual_outliers(studentized: &Col<f64>, threshold: f64) -> Vec<usize> {
    (0..studentized.nrows())
        .filter(|&i| studentized[i].abs() > threshold)
        .collect()
}

fn one_minus(h_ii: f64) -> f64 {
    (1.0 - h_ii).max(1e-14)
}

// RSS_(i) = RSS - e_i² / (1 - h_ii), over n - p - 1 df
fn leave_one_out_mse(rss: f64, e_i: f64, one_minus_h: f64, df_resid: usize) -> Option<f64> {
    let rss_loo = rss - e_i * e_i / one_minus_h;
    let mse_loo = rss_loo / (df_resid - 1) as f64;
    (mse_loo > 0.0).then_some(mse_loo)
}
