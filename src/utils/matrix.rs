//! Column helpers for design matrices.

use faer::{Col, Mat};

/// Build `[1 | X]`, the design matrix with a leading column of ones.
pub fn prepend_constant(x: &Mat<f64>) -> Mat<f64> {
    Mat::from_fn(x.nrows(), x.ncols() + 1, |i, j| {
        if j == 0 {
            1.0
        } else {
            x[(i, j - 1)]
        }
    })
}

/// Copy of a single column.
pub fn column(x: &Mat<f64>, j: usize) -> Col<f64> {
    Col::from_fn(x.nrows(), |i| x[(i, j)])
}

/// Matrix made of the given columns, in the given order.
pub fn select_columns(x: &Mat<f64>, columns: &[usize]) -> Mat<f64> {
    Mat::from_fn(x.nrows(), columns.len(), |i, k| x[(i, columns[k])])
}

/// Matrix with column `j` removed.
pub fn drop_column(x: &Mat<f64>, j: usize) -> Mat<f64> {
    let keep: Vec<usize> = (0..x.ncols()).filter(|&k| k != j).collect();
    select_columns(x, &keep)
}

pub fn column_norm(x: &Mat<f64>, j: usize) -> f64 {
    (0..x.nrows()).map(|i| x[(i, j)].powi(2)).sum::<f64>().sqrt()
}
