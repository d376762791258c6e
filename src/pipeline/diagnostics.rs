//! Read-only diagnostics: missing values and per-column summary statistics

use std::collections::HashSet;

use polars::prelude::*;
use serde::Serialize;

use super::stats::{mean_std, quantile, sorted_present};
use super::table::{column_kind, numeric_values, text_values, ColumnKind};

/// Missing-value count for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
    pub ratio: f64,
}

/// Summary statistics for one column, in the spirit of `describe()`
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub kind: ColumnKind,
    /// Present (non-missing) values
    pub count: usize,
    pub missing: usize,
    pub distinct: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q3: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Everything the diagnostics stage reports about the loaded table
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub rows: usize,
    pub columns: usize,
    pub missing: Vec<MissingCount>,
    pub summaries: Vec<ColumnSummary>,
}

impl DiagnosticsReport {
    pub fn total_missing(&self) -> usize {
        self.missing.iter().map(|m| m.missing).sum()
    }
}

/// Nulls plus, for float columns, NaN cells
fn missing_count(column: &Column) -> usize {
    let series = column.as_materialized_series();
    let nan = match series.dtype() {
        DataType::Float64 => series
            .f64()
            .map(|ca| ca.into_iter().filter(|v| v.is_some_and(f64::is_nan)).count())
            .unwrap_or(0),
        DataType::Float32 => series
            .f32()
            .map(|ca| ca.into_iter().filter(|v| v.is_some_and(f32::is_nan)).count())
            .unwrap_or(0),
        _ => 0,
    };
    column.null_count() + nan
}

/// Count missing values (null or NaN) per column, sorted by ratio descending
pub fn analyze_missing_values(df: &DataFrame) -> Vec<MissingCount> {
    if df.height() == 0 {
        return Vec::new();
    }

    let rows = df.height() as f64;
    let mut counts: Vec<MissingCount> = df
        .get_columns()
        .iter()
        .map(|column| {
            let missing = missing_count(column);
            MissingCount {
                column: column.name().to_string(),
                missing,
                ratio: missing as f64 / rows,
            }
        })
        .collect();

    // Stable sort keeps table order among equal ratios
    counts.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));
    counts
}

/// Summarize a single column
pub fn summarize_column(df: &DataFrame, name: &str) -> PolarsResult<ColumnSummary> {
    let column = df.column(name)?;
    let kind = column_kind(column);
    let missing = missing_count(column);

    let mut summary = ColumnSummary {
        name: name.to_string(),
        dtype: column.dtype().to_string(),
        kind,
        count: column.len() - missing,
        missing,
        distinct: 0,
        mean: None,
        std: None,
        min: None,
        q1: None,
        median: None,
        q3: None,
        max: None,
    };

    match kind {
        ColumnKind::Numeric => {
            let values: Vec<Option<f64>> = numeric_values(df, name)?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect();
            let sorted = sorted_present(&values);
            let mut distinct: Vec<f64> = sorted.clone();
            distinct.dedup();
            summary.distinct = distinct.len();
            if let Some((mean, std)) = mean_std(&values) {
                summary.mean = Some(mean);
                summary.std = Some(std);
            }
            summary.min = sorted.first().copied();
            summary.q1 = quantile(&sorted, 0.25);
            summary.median = quantile(&sorted, 0.5);
            summary.q3 = quantile(&sorted, 0.75);
            summary.max = sorted.last().copied();
        }
        ColumnKind::Categorical => {
            let values = text_values(df, name)?;
            let distinct: HashSet<&String> = values.iter().flatten().collect();
            summary.distinct = distinct.len();
        }
    }

    Ok(summary)
}

/// Full diagnostics of a table
pub fn describe(df: &DataFrame) -> PolarsResult<DiagnosticsReport> {
    let summaries = df
        .get_column_names()
        .iter()
        .map(|name| summarize_column(df, name.as_str()))
        .collect::<PolarsResult<Vec<_>>>()?;

    Ok(DiagnosticsReport {
        rows: df.height(),
        columns: df.width(),
        missing: analyze_missing_values(df),
        summaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_counts_sorted_descending() {
        let df = df! {
            "complete" => [1.0f64, 2.0, 3.0, 4.0],
            "half" => [Some(1.0f64), None, Some(3.0), None],
            "quarter" => [Some("a"), None, Some("c"), Some("d")],
        }
        .unwrap();

        let counts = analyze_missing_values(&df);

        assert_eq!(counts[0].column, "half");
        assert_eq!(counts[0].missing, 2);
        assert!((counts[0].ratio - 0.5).abs() < 1e-12);
        assert_eq!(counts[1].column, "quarter");
        assert_eq!(counts[2].column, "complete");
        assert_eq!(counts[2].missing, 0);
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let df = df! {
            "ph" => [Some(1.0f64), Some(f64::NAN), None],
        }
        .unwrap();

        let counts = analyze_missing_values(&df);
        assert_eq!(counts[0].missing, 2);

        let summary = summarize_column(&df, "ph").unwrap();
        assert_eq!(summary.missing, 2);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.mean, Some(1.0));
        assert_eq!(summary.max, Some(1.0));
    }

    #[test]
    fn test_empty_table_has_no_missing_counts() {
        assert!(analyze_missing_values(&DataFrame::empty()).is_empty());
    }

    #[test]
    fn test_numeric_summary() {
        let df = df! {
            "x" => [Some(1.0f64), Some(2.0), None, Some(3.0), Some(4.0)],
        }
        .unwrap();

        let summary = summarize_column(&df, "x").unwrap();

        assert_eq!(summary.kind, ColumnKind::Numeric);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.distinct, 4);
        assert_eq!(summary.min, Some(1.0));
        assert_eq!(summary.max, Some(4.0));
        assert_eq!(summary.median, Some(2.5));
        assert!((summary.mean.unwrap() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_categorical_summary_counts_distinct() {
        let df = df! {
            "city" => [Some("a"), Some("b"), Some("a"), None],
        }
        .unwrap();

        let summary = summarize_column(&df, "city").unwrap();

        assert_eq!(summary.kind, ColumnKind::Categorical);
        assert_eq!(summary.distinct, 2);
        assert_eq!(summary.missing, 1);
        assert!(summary.mean.is_none());
    }

    #[test]
    fn test_describe_reports_shape() {
        let df = df! {
            "a" => [1.0f64, 2.0],
            "b" => ["x", "y"],
        }
        .unwrap();

        let report = describe(&df).unwrap();

        assert_eq!(report.rows, 2);
        assert_eq!(report.columns, 2);
        assert_eq!(report.summaries.len(), 2);
        assert_eq!(report.total_missing(), 0);
    }
}
