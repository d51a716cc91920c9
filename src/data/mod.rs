//! Tabular input: CSV loading, missing-row cleaning and design matrices.
//!
//! # Example
//!
//! ```rust,ignore
//! use regress_report::data::{load_csv, BaseLevel, CsvOptions, DesignMatrix};
//!
//! let raw = load_csv(Path::new("dataset_5.csv"), &CsvOptions::default())?;
//! let (clean, summary) = raw.drop_missing();
//! let design = DesignMatrix::build(&clean, "tempo_resposta", None, BaseLevel::Alphabetical)?;
//! ```

mod cleaning;
mod dataset;
mod encoding;
mod loader;

pub use cleaning::{CleaningSummary, MissingCount};
pub use dataset::{Column, ColumnData, ColumnKind, Dataset};
pub use encoding::{BaseLevel, CategoricalEncoding, DesignMatrix};
pub use loader::{load_csv, read_csv, CsvOptions, DEFAULT_MISSING_TOKENS};

use thiserror::Error;

/// Errors that can occur while loading or preparing data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("input has no header row")]
    EmptyInput,

    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("column '{column}' has {found} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),

    #[error("column '{column}' still has {count} missing values")]
    MissingValues { column: String, count: usize },

    #[error("no rows left after removing missing values")]
    EmptyAfterCleaning,

    #[error("no rows with strictly positive '{0}'")]
    NoPositiveTarget(String),
}
