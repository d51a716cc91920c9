//! Listwise deletion of rows with missing values.

use crate::data::{DataError, Dataset};

/// Missing cells of one column before cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCount {
    pub column: String,
    pub count: usize,
}

/// What `drop_missing` removed.
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    pub missing: Vec<MissingCount>,
}

impl CleaningSummary {
    pub fn rows_removed(&self) -> usize {
        self.rows_before - self.rows_after
    }

    /// Share of rows removed, in percent of the original row count.
    pub fn removed_percent(&self) -> f64 {
        percent(self.rows_removed(), self.rows_before)
    }

    pub fn total_missing(&self) -> usize {
        self.missing.iter().map(|m| m.count).sum()
    }

    /// Fail when nothing is left to analyse.
    pub fn ensure_rows(&self) -> Result<(), DataError> {
        if self.rows_after == 0 {
            Err(DataError::EmptyAfterCleaning)
        } else {
            Ok(())
        }
    }
}

pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

impl Dataset {
    /// Per-column missing counts, in column order.
    pub fn missing_counts(&self) -> Vec<MissingCount> {
        self.columns()
            .iter()
            .map(|c| MissingCount {
                column: c.name.clone(),
                count: c.missing_count(),
            })
            .collect()
    }

    /// Drop every row with at least one missing cell.
    pub fn drop_missing(&self) -> (Dataset, CleaningSummary) {
        let missing = self.missing_counts();
        let cleaned = self.filter_rows(|row| !self.row_has_missing(row));

        let summary = CleaningSummary {
            rows_before: self.n_rows(),
            rows_after: cleaned.n_rows(),
            missing,
        };
        (cleaned, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;

    #[test]
    fn test_no_missing_is_noop() {
        let ds = Dataset::new(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0)]),
            Column::categorical("b", vec![Some("x".into()), Some("y".into())]),
        ])
        .expect("valid");

        let (cleaned, summary) = ds.drop_missing();

        assert_eq!(cleaned, ds);
        assert_eq!(summary.rows_removed(), 0);
        assert_eq!(summary.total_missing(), 0);
    }

    #[test]
    fn test_rows_with_any_missing_are_dropped() {
        let ds = Dataset::new(vec![
            Column::numeric("a", vec![Some(1.0), None, Some(3.0), None, Some(5.0)]),
            Column::categorical(
                "b",
                vec![Some("x".into()), None, None, Some("z".into()), Some("w".into())],
            ),
        ])
        .expect("valid");

        let (cleaned, summary) = ds.drop_missing();

        // rows 1, 2 and 3 each have a gap
        assert_eq!(cleaned.n_rows(), 2);
        assert_eq!(summary.rows_before, 5);
        assert_eq!(summary.rows_after, 2);
        assert_eq!(summary.total_missing(), 4);
        assert!((summary.removed_percent() - 60.0).abs() < 1e-12);
        assert_eq!(
            cleaned.numeric_values("a").expect("numeric"),
            vec![1.0, 5.0]
        );
    }

    #[test]
    fn test_everything_missing_fails_check() {
        let ds = Dataset::new(vec![Column::numeric("a", vec![None, None])]).expect("valid");
        let (_, summary) = ds.drop_missing();
        assert!(matches!(
            summary.ensure_rows(),
            Err(DataError::EmptyAfterCleaning)
        ));
    }
}
