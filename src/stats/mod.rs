//! Descriptive statistics over dataset columns.

mod descriptive;

pub use descriptive::{
    describe, describe_numeric, quantile_sorted, CategoricalSummary, ColumnSummary,
    NumericSummary,
};
