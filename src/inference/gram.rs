//! Cross-product inverses built from the R factor of a QR decomposition.
//!
//! For a full-rank design `X = QR`, `X'X = R'R`, so `(X'X)⁻¹ = R⁻¹ R⁻ᵀ`
//! without ever forming `X'X` or the (n × n) Q factor.

use crate::solvers::RegressionError;
use crate::utils::{column, column_norm};
use faer::{Col, Mat};

/// Upper-triangular R (p × p) of the QR decomposition of `design` (n ≥ p).
pub fn r_factor(design: &Mat<f64>) -> Mat<f64> {
    let p = design.ncols();
    let qr = design.qr();
    let r = qr.R();

    Mat::from_fn(p, p, |i, j| if i <= j { r[(i, j)] } else { 0.0 })
}

/// Columns that are numerically a linear combination of the columns kept before them.
///
/// Columns are visited left to right and orthogonalized against the basis of
/// the columns already kept (two Gram-Schmidt passes). A column is dependent
/// when its remainder has norm at most `tolerance · ||x_j||`; it then stays
/// out of the basis, so later columns are judged against the kept ones only.
/// All-zero columns are always dependent.
pub fn dependent_columns(design: &Mat<f64>, tolerance: f64) -> Vec<usize> {
    let n = design.nrows();
    let mut basis: Vec<Col<f64>> = Vec::with_capacity(design.ncols());
    let mut dependent = Vec::new();

    for j in 0..design.ncols() {
        let norm = column_norm(design, j);
        if norm == 0.0 {
            dependent.push(j);
            continue;
        }

        let mut v = column(design, j);
        for _ in 0..2 {
            for q in &basis {
                let dot: f64 = (0..n).map(|i| q[i] * v[i]).sum();
                for i in 0..n {
                    v[i] -= dot * q[i];
                }
            }
        }

        let remainder = (0..n).map(|i| v[i] * v[i]).sum::<f64>().sqrt();
        if remainder <= tolerance * norm {
            dependent.push(j);
        } else {
            basis.push(Col::from_fn(n, |i| v[i] / remainder));
        }
    }

    dependent
}

/// Invert an upper-triangular matrix by back-substitution.
pub fn invert_upper_triangular(r: &Mat<f64>) -> Result<Mat<f64>, RegressionError> {
    let p = r.nrows();

    for i in 0..p {
        if r[(i, i)] == 0.0 || !r[(i, i)].is_finite() {
            return Err(RegressionError::SingularMatrix);
        }
    }

    // Solve R * inv = I one column at a time
    let mut inv = Mat::zeros(p, p);
    for col in 0..p {
        for i in (0..=col).rev() {
            let mut sum = if i == col { 1.0 } else { 0.0 };
            for j in (i + 1)..=col {
                sum -= r[(i, j)] * inv[(j, col)];
            }
            inv[(i, col)] = sum / r[(i, i)];
        }
    }

    Ok(inv)
}

/// `(X'X)⁻¹` from the R factor of X.
pub fn xtx_inverse_from_r(r: &Mat<f64>) -> Result<Mat<f64>, RegressionError> {
    let r_inv = invert_upper_triangular(r)?;
    let r_inv_t = r_inv.transpose().to_owned();
    Ok(&r_inv * &r_inv_t)
}

/// Relative tolerance used when no caller-specific one is available.
pub const DEFAULT_RANK_TOLERANCE: f64 = 1e-10;

/// `(X'X)⁻¹` for a full-rank design matrix.
///
/// Fails with `RankDeficient` when a column depends on the ones before it.
pub fn compute_xtx_inverse(design: &Mat<f64>) -> Result<Mat<f64>, RegressionError> {
    let p = design.ncols();
    if design.nrows() < p {
        return Err(RegressionError::InsufficientObservations {
            needed: p,
            got: design.nrows(),
        });
    }

    let dependent = dependent_columns(design, DEFAULT_RANK_TOLERANCE);
    if !dependent.is_empty() {
        return Err(RegressionError::RankDeficient {
            rank: p - dependent.len(),
            n_columns: p,
            aliased: dependent,
        });
    }

    xtx_inverse_from_r(&r_factor(design))
}

/// Inverse of a small symmetric positive-definite matrix via Cholesky.
pub fn invert_spd(m: &Mat<f64>) -> Result<Mat<f64>, RegressionError> {
    let n = m.nrows();
    let mut l: Mat<f64> = Mat::zeros(n, n);

    for j in 0..n {
        let mut diag = m[(j, j)];
        for k in 0..j {
            diag -= l[(j, k)] * l[(j, k)];
        }
        if diag <= 0.0 || !diag.is_finite() {
            return Err(RegressionError::SingularMatrix);
        }
        l[(j, j)] = diag.sqrt();

        for i in (j + 1)..n {
            let mut sum = m[(i, j)];
            for k in 0..j {
                sum -= l[(i, k)] * l[(j, k)];
            }
            l[(i, j)] = sum / l[(j, j)];
        }
    }

    // M⁻¹ = L⁻ᵀ L⁻¹, and Lᵀ is upper triangular
    let lt = l.transpose().to_owned();
    let lt_inv = invert_upper_triangular(&lt)?;
    let lt_inv_t = lt_inv.transpose().to_owned();
    Ok(&lt_inv * &lt_inv_t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_error(a: &Mat<f64>, b: &Mat<f64>) -> f64 {
        let prod = a * b;
        let n = prod.nrows();
        let mut worst: f64 = 0.0;
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                worst = worst.max((prod[(i, j)] - expected).abs());
            }
        }
        worst
    }

    #[test]
    fn test_xtx_inverse_matches_gram() {
        let x = Mat::from_fn(20, 3, |i, j| match j {
            0 => 1.0,
            1 => i as f64,
            _ => (i as f64 * 0.7).sin(),
        });

        let inv = compute_xtx_inverse(&x).expect("full rank");
        let xtx = x.transpose() * &x;

        assert!(identity_error(&xtx, &inv) < 1e-8);
    }

    #[test]
    fn test_dependent_columns_detects_duplicate() {
        let x = Mat::from_fn(10, 3, |i, j| match j {
            0 => 1.0,
            1 => i as f64,
            _ => 2.0 * i as f64 + 1.0,
        });

        assert_eq!(dependent_columns(&x, 1e-10), vec![2]);
    }

    #[test]
    fn test_independent_column_after_duplicate_is_kept() {
        let x = Mat::from_fn(30, 4, |i, j| match j {
            0 => 1.0,
            1 => i as f64,
            2 => 2.0 * i as f64,
            _ => (i as f64 * 0.7).sin(),
        });

        assert_eq!(dependent_columns(&x, 1e-10), vec![2]);
    }

    #[test]
    fn test_zero_column_is_dependent() {
        let x = Mat::from_fn(6, 3, |i, j| match j {
            0 => 1.0,
            1 => 0.0,
            _ => i as f64,
        });

        assert_eq!(dependent_columns(&x, 1e-10), vec![1]);
    }

    #[test]
    fn test_invert_spd() {
        let mut m = Mat::zeros(2, 2);
        m[(0, 0)] = 4.0;
        m[(0, 1)] = 1.0;
        m[(1, 0)] = 1.0;
        m[(1, 1)] = 3.0;

        let inv = invert_spd(&m).expect("positive definite");
        assert!(identity_error(&m, &inv) < 1e-12);
    }

    #[test]
    fn test_invert_spd_rejects_indefinite() {
        let mut m = Mat::zeros(2, 2);
        m[(0, 0)] = 1.0;
        m[(0, 1)] = 2.0;
        m[(1, 0)] = 2.0;
        m[(1, 1)] = 1.0;

        assert!(matches!(invert_spd(&m), Err(RegressionError::SingularMatrix)));
    }
}
