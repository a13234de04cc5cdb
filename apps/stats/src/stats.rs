//! Descriptive statistics over loaded columns.

use std::cmp::Ordering;
use std::collections::HashMap;

use thiserror::Error;

use crate::table::{Dtype, Table};

pub const GROUP_COLUMN: &str = "department";
pub const VALUE_COLUMN: &str = "salary";

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("column '{0}' is not numeric and cannot be aggregated")]
    NonNumeric(String),
}

/// The eight rows of a describe table.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN below two values.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

pub fn summarize_numeric(values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    Some(NumericSummary {
        count: sorted.len(),
        mean: mean(&sorted),
        std: sample_std(&sorted),
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Linear interpolation between closest ranks. `sorted` must be ascending.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    quantile(&sorted, 0.5)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalSummary {
    pub unique: usize,
    /// Most frequent value; ties resolve to the smallest. `None` if all missing.
    pub top: Option<String>,
}

pub fn summarize_categorical(cells: &[Option<String>]) -> CategoricalSummary {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in cells.iter().flatten() {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }
    let top = counts
        .iter()
        .max_by(|(a_val, a_n), (b_val, b_n)| a_n.cmp(b_n).then_with(|| b_val.cmp(a_val)))
        .map(|(value, _)| value.to_string());

    CategoricalSummary {
        unique: counts.len(),
        top,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub key: String,
    pub mean: f64,
    pub median: f64,
    /// Present values of the aggregated column in this group.
    pub count: usize,
}

/// Mean, median and count of `salary` per `department`, when both exist.
///
/// Rows with a missing department are left out. Groups are sorted by key,
/// numerically when the key column is numeric.
pub fn department_salary(table: &Table) -> Result<Option<Vec<GroupRow>>, StatsError> {
    let (Some(keys), Some(values)) = (table.column(GROUP_COLUMN), table.column(VALUE_COLUMN))
    else {
        return Ok(None);
    };
    if !values.dtype.is_numeric() && values.non_null() > 0 {
        return Err(StatsError::NonNumeric(VALUE_COLUMN.to_string()));
    }

    let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
    for (row, key) in keys.cells.iter().enumerate() {
        let Some(key) = key else { continue };
        let bucket = groups.entry(key.as_str()).or_default();
        if let Some(v) = values.number_at(row) {
            bucket.push(v);
        }
    }

    let mut rows: Vec<GroupRow> = groups
        .into_iter()
        .map(|(key, vals)| GroupRow {
            key: key.to_string(),
            mean: mean(&vals),
            median: median(&vals),
            count: vals.len(),
        })
        .collect();

    let numeric_keys = keys.dtype.is_numeric();
    rows.sort_by(|a, b| compare_keys(&a.key, &b.key, numeric_keys));
    Ok(Some(rows))
}

fn compare_keys(a: &str, b: &str, numeric: bool) -> Ordering {
    if numeric {
        if let (Ok(x), Ok(y)) = (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
            return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        }
    }
    a.cmp(b)
}

/// `int64(2), object(1)` style breakdown for the column info section.
pub fn dtype_counts(table: &Table) -> Vec<(Dtype, usize)> {
    [Dtype::Float64, Dtype::Int64, Dtype::Object]
        .into_iter()
        .map(|d| (d, table.columns.iter().filter(|c| c.dtype == d).count()))
        .filter(|(_, n)| *n > 0)
        .collect()
}
