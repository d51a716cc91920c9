//! Design-matrix construction with one-hot encoded categorical columns.

use crate::data::{ColumnKind, DataError, Dataset};
use crate::utils::{drop_column, prepend_constant};
use clap::ValueEnum;
use faer::{Col, Mat};

/// Rule for picking the dropped (reference) category of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BaseLevel {
    /// Lexicographically smallest level.
    #[default]
    Alphabetical,
    /// Level of the first row.
    FirstSeen,
}

/// Indicator coding of one categorical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalEncoding {
    pub column: String,
    /// Reference level; has no indicator column.
    pub base: String,
    /// Levels that got an indicator, in column order.
    pub levels: Vec<String>,
}

impl CategoricalEncoding {
    pub fn indicator_name(&self, level: &str) -> String {
        format!("{}_{}", self.column, level)
    }

    pub fn indicator_names(&self) -> Vec<String> {
        self.levels.iter().map(|l| self.indicator_name(l)).collect()
    }

    /// Number of distinct levels, base included.
    pub fn n_levels(&self) -> usize {
        self.levels.len() + 1
    }
}

/// Predictors and target of one model, rows aligned.
///
/// The intercept is not stored; solvers add it through `with_intercept`
/// and [`DesignMatrix::with_constant`] materialises `[1 | X]` on demand.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    x: Mat<f64>,
    y: Col<f64>,
    names: Vec<String>,
    target: String,
    encodings: Vec<CategoricalEncoding>,
    /// Input row of each design row.
    row_ids: Vec<usize>,
}

impl DesignMatrix {
    /// Build the design for `target` from every other column of `dataset`.
    ///
    /// `categorical` lists the columns to one-hot encode; `None` encodes every
    /// categorical column. Numeric predictors come first, then the indicator
    /// columns, each group in dataset column order.
    pub fn build(
        dataset: &Dataset,
        target: &str,
        categorical: Option<&[String]>,
        base_level: BaseLevel,
    ) -> Result<Self, DataError> {
        let y_values = dataset.numeric_values(target)?;
        if y_values.is_empty() {
            return Err(DataError::EmptyAfterCleaning);
        }
        let n = y_values.len();

        let encoded: Vec<&str> = match categorical {
            Some(names) => {
                for name in names {
                    dataset.column(name)?;
                }
                names
                    .iter()
                    .map(String::as_str)
                    .filter(|&name| name != target)
                    .collect()
            }
            None => dataset.categorical_column_names(),
        };

        let mut columns: Vec<Vec<f64>> = Vec::new();
        let mut names: Vec<String> = Vec::new();

        for column in dataset.columns() {
            if column.name == target || encoded.contains(&column.name.as_str()) {
                continue;
            }
            if column.kind() != ColumnKind::Numeric {
                return Err(DataError::NonNumericColumn(column.name.clone()));
            }
            columns.push(dataset.numeric_values(&column.name)?);
            names.push(column.name.clone());
        }

        let mut encodings = Vec::new();
        for column in dataset.columns() {
            if column.name == target || !encoded.contains(&column.name.as_str()) {
                continue;
            }

            let missing = column.missing_count();
            if missing > 0 {
                return Err(DataError::MissingValues {
                    column: column.name.clone(),
                    count: missing,
                });
            }
            let cells: Vec<String> = (0..n).filter_map(|i| column.text_at(i)).collect();

            let mut levels: Vec<String> = Vec::new();
            for cell in &cells {
                if !levels.contains(cell) {
                    levels.push(cell.clone());
                }
            }
            if base_level == BaseLevel::Alphabetical {
                levels.sort();
            }
            if levels.is_empty() {
                continue;
            }
            let base = levels.remove(0);

            let encoding = CategoricalEncoding {
                column: column.name.clone(),
                base,
                levels,
            };
            for level in &encoding.levels {
                columns.push(
                    cells
                        .iter()
                        .map(|cell| if cell == level { 1.0 } else { 0.0 })
                        .collect(),
                );
                names.push(encoding.indicator_name(level));
            }
            encodings.push(encoding);
        }

        let x = Mat::from_fn(n, columns.len(), |i, j| columns[j][i]);
        let y = Col::from_fn(n, |i| y_values[i]);

        Ok(Self {
            x,
            y,
            names,
            target: target.to_string(),
            encodings,
            row_ids: dataset.row_ids().to_vec(),
        })
    }

    pub fn x(&self) -> &Mat<f64> {
        &self.x
    }

    pub fn y(&self) -> &Col<f64> {
        &self.y
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn encodings(&self) -> &[CategoricalEncoding] {
        &self.encodings
    }

    pub fn n_rows(&self) -> usize {
        self.x.nrows()
    }

    pub fn row_ids(&self) -> &[usize] {
        &self.row_ids
    }

    pub fn n_predictors(&self) -> usize {
        self.x.ncols()
    }

    pub fn predictor_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// `[1 | X]`.
    pub fn with_constant(&self) -> Mat<f64> {
        prepend_constant(&self.x)
    }

    /// Same design without one predictor. A dropped indicator folds its
    /// level into the base level of that column.
    pub fn drop_predictor(&self, name: &str) -> Result<DesignMatrix, DataError> {
        let j = self
            .predictor_index(name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;

        let mut names = self.names.clone();
        names.remove(j);

        let encodings = self
            .encodings
            .iter()
            .map(|enc| {
                let mut enc = enc.clone();
                enc.levels.retain(|level| enc_name(&enc.column, level) != name);
                enc
            })
            .collect();

        Ok(DesignMatrix {
            x: drop_column(&self.x, j),
            y: self.y.clone(),
            names,
            target: self.target.clone(),
            encodings,
            row_ids: self.row_ids.clone(),
        })
    }

    /// Apply `f` to every target value and rename the target.
    pub fn map_target(mut self, label: impl Into<String>, f: impl Fn(f64) -> f64) -> Self {
        for i in 0..self.y.nrows() {
            self.y[i] = f(self.y[i]);
        }
        self.target = label.into();
        self
    }
}

fn enc_name(column: &str, level: &str) -> String {
    format!("{}_{}", column, level)
}
