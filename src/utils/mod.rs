//! Small matrix helpers shared by the solvers and diagnostics.

mod matrix;

pub use matrix::{column, column_norm, drop_column, prepend_constant, select_columns};
