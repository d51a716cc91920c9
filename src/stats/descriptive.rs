//! Per-column descriptive statistics.

use crate::data::{ColumnData, DataError, Dataset};
use std::collections::HashMap;

/// Summary of a numeric column (missing cells skipped).
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1).
    pub std_dev: f64,
    /// Sample variance (ddof = 1).
    pub variance: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericSummary {
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        let name = name.into();
        let count = values.len();
        if count == 0 {
            return Self {
                name,
                count,
                mean: f64::NAN,
                std_dev: f64::NAN,
                variance: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = if count > 1 {
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64
        } else {
            f64::NAN
        };

        Self {
            name,
            count,
            mean,
            std_dev: variance.sqrt(),
            variance,
            min: sorted[0],
            q25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted[count - 1],
        }
    }
}

/// Summary of a categorical column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalSummary {
    pub name: String,
    pub count: usize,
    pub distinct: usize,
    pub mode: Option<String>,
    pub mode_frequency: usize,
    /// Level counts, most frequent first; ties in lexicographic order.
    pub frequencies: Vec<(String, usize)>,
}

impl CategoricalSummary {
    pub fn from_values<'a>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut count = 0;
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
            count += 1;
        }

        let mut frequencies: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(level, n)| (level.to_string(), n))
            .collect();
        frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let (mode, mode_frequency) = frequencies
            .first()
            .map_or((None, 0), |(level, n)| (Some(level.clone()), *n));

        Self {
            name: name.into(),
            count,
            distinct: frequencies.len(),
            mode,
            mode_frequency,
            frequencies,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSummary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

/// Linear-interpolation quantile of already sorted values.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let index = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = index - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

/// Summarise the named columns, in the order given.
pub fn describe(dataset: &Dataset, columns: &[&str]) -> Result<Vec<ColumnSummary>, DataError> {
    columns
        .iter()
        .map(|&name| {
            let column = dataset.column(name)?;
            Ok(match &column.data {
                ColumnData::Numeric(values) => {
                    let present: Vec<f64> = values.iter().flatten().copied().collect();
                    ColumnSummary::Numeric(NumericSummary::from_values(name, &present))
                }
                ColumnData::Categorical(values) => ColumnSummary::Categorical(
                    CategoricalSummary::from_values(name, values.iter().flatten().map(String::as_str)),
                ),
            })
        })
        .collect()
}

/// Numeric summaries only, for the given columns.
pub fn describe_numeric(
    dataset: &Dataset,
    columns: &[&str],
) -> Result<Vec<NumericSummary>, DataError> {
    Ok(describe(dataset, columns)?
        .into_iter()
        .filter_map(|summary| match summary {
            ColumnSummary::Numeric(s) => Some(s),
            ColumnSummary::Categorical(_) => None,
        })
        .collect())
}
