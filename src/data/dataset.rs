//! Column-oriented in-memory table.

use crate::data::DataError;
use std::collections::HashSet;

/// Values of one column. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn is_missing(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Numeric(v) => v[row].is_none(),
            ColumnData::Categorical(v) => v[row].is_none(),
        }
    }

    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_missing(i)).count()
    }

    /// Storage type label used in the dataset info block.
    pub fn dtype(&self) -> &'static str {
        match &self.data {
            ColumnData::Numeric(v) => {
                let integral = v.iter().flatten().all(|x| x.fract() == 0.0);
                if integral && !v.iter().any(Option::is_none) {
                    "int64"
                } else {
                    "float64"
                }
            }
            ColumnData::Categorical(_) => "object",
        }
    }

    /// Numeric values, failing on a categorical column.
    pub fn as_numeric(&self) -> Result<&[Option<f64>], DataError> {
        match &self.data {
            ColumnData::Numeric(v) => Ok(v),
            ColumnData::Categorical(_) => Err(DataError::NonNumericColumn(self.name.clone())),
        }
    }

    /// Cell rendered as text; numbers use their shortest round-trip form.
    pub fn text_at(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Numeric(v) => v[row].map(|x| x.to_string()),
            ColumnData::Categorical(v) => v[row].clone(),
        }
    }

    fn select(&self, rows: &[usize]) -> Column {
        let data = match &self.data {
            ColumnData::Numeric(v) => ColumnData::Numeric(rows.iter().map(|&i| v[i]).collect()),
            ColumnData::Categorical(v) => {
                ColumnData::Categorical(rows.iter().map(|&i| v[i].clone()).collect())
            }
        };
        Column {
            name: self.name.clone(),
            data,
        }
    }
}

/// Ordered collection of equally long columns.
///
/// Every row keeps the zero-based position it had in the input, so subsets
/// can still be reported against the rows of the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
    row_ids: Vec<usize>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        let n_rows = columns.first().map_or(0, Column::len);

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(DataError::DuplicateColumn(column.name.clone()));
            }
            if column.len() != n_rows {
                return Err(DataError::ColumnLengthMismatch {
                    column: column.name.clone(),
                    expected: n_rows,
                    found: column.len(),
                });
            }
        }

        Ok(Self {
            columns,
            n_rows,
            row_ids: (0..n_rows).collect(),
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    /// Input row of each current row.
    pub fn row_ids(&self) -> &[usize] {
        &self.row_ids
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Result<&Column, DataError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn names_of_kind(&self, kind: ColumnKind) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind() == kind)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.names_of_kind(ColumnKind::Numeric)
    }

    pub fn categorical_column_names(&self) -> Vec<&str> {
        self.names_of_kind(ColumnKind::Categorical)
    }

    pub fn row_has_missing(&self, row: usize) -> bool {
        self.columns.iter().any(|c| c.is_missing(row))
    }

    /// Keep only the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Dataset {
        Dataset {
            columns: self.columns.iter().map(|c| c.select(rows)).collect(),
            n_rows: rows.len(),
            row_ids: rows.iter().map(|&i| self.row_ids[i]).collect(),
        }
    }

    /// Keep the rows for which `keep` returns true.
    pub fn filter_rows(&self, keep: impl Fn(usize) -> bool) -> Dataset {
        let rows: Vec<usize> = (0..self.n_rows).filter(|&i| keep(i)).collect();
        self.select_rows(&rows)
    }

    /// Non-missing values of a numeric column, failing on gaps.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<f64>, DataError> {
        let column = self.column(name)?;
        let values = column.as_numeric()?;
        let missing = column.missing_count();
        if missing > 0 {
            return Err(DataError::MissingValues {
                column: name.to_string(),
                count: missing,
            });
        }
        Ok(values.iter().flatten().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::numeric("a", vec![Some(1.0), None, Some(3.0)]),
            Column::categorical(
                "b",
                vec![Some("x".to_string()), Some("y".to_string()), None],
            ),
        ])
        .expect("valid dataset")
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let err = Dataset::new(vec![
            Column::numeric("a", vec![Some(1.0)]),
            Column::numeric("b", vec![Some(1.0), Some(2.0)]),
        ])
        .unwrap_err();
        assert!(matches!(err, DataError::ColumnLengthMismatch { .. }));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Dataset::new(vec![
            Column::numeric("a", vec![Some(1.0)]),
            Column::numeric("a", vec![Some(2.0)]),
        ])
        .unwrap_err();
        assert!(matches!(err, DataError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn test_kinds_and_missing() {
        let ds = sample();
        assert_eq!(ds.shape(), (3, 2));
        assert_eq!(ds.numeric_column_names(), vec!["a"]);
        assert_eq!(ds.categorical_column_names(), vec!["b"]);
        assert!(ds.row_has_missing(1));
        assert!(ds.row_has_missing(2));
        assert!(!ds.row_has_missing(0));
    }

    #[test]
    fn test_numeric_values_reports_gaps() {
        let ds = sample();
        assert!(matches!(
            ds.numeric_values("a"),
            Err(DataError::MissingValues { count: 1, .. })
        ));
        assert!(matches!(
            ds.numeric_values("b"),
            Err(DataError::NonNumericColumn(_))
        ));
        assert!(matches!(
            ds.numeric_values("zzz"),
            Err(DataError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_row_ids_survive_nested_selection() {
        let ds = Dataset::new(vec![Column::numeric(
            "a",
            (0..6).map(|i| Some(i as f64)).collect(),
        )])
        .expect("valid dataset");
        assert_eq!(ds.row_ids(), &[0, 1, 2, 3, 4, 5]);

        let odd = ds.filter_rows(|i| i % 2 == 1);
        let tail = odd.select_rows(&[1, 2]);
        assert_eq!(odd.row_ids(), &[1, 3, 5]);
        assert_eq!(tail.row_ids(), &[3, 5]);
        assert_eq!(tail.numeric_values("a").expect("numeric"), vec![3.0, 5.0]);
    }

    #[test]
    fn test_dtype_labels() {
        let ints = Column::numeric("i", vec![Some(1.0), Some(2.0)]);
        let floats = Column::numeric("f", vec![Some(1.5), Some(2.0)]);
        assert_eq!(ints.dtype(), "int64");
        assert_eq!(floats.dtype(), "float64");
        assert_eq!(sample().columns()[1].dtype(), "object");
    }
}
