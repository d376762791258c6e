//! Quantile binning of a preserved original-scale column into low/medium/high
//!
//! Cut points sit at the 1/3 and 2/3 quantiles. The first bucket is closed on
//! both ends, the other two are left-open: `[min, c1]`, `(c1, c2]`, `(c2, max]`.

use polars::prelude::*;
use serde::Serialize;

use super::error::CleaningError;
use super::stats::{quantile, sorted_present};
use super::table::{numeric_values, put_numeric, put_text};

/// Bucket labels in ascending order
pub const BIN_LABELS: [&str; 3] = ["low", "medium", "high"];

/// Fitted quantile cut for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantileBins {
    /// Column the buckets were computed from
    pub source_column: String,
    /// Column holding the bucket labels
    pub label_column: String,
    /// `[min, c1, c2, max]`
    pub edges: [f64; 4],
    /// Rows per bucket, in label order
    pub counts: [usize; 3],
}

impl QuantileBins {
    /// Compute edges from the present values of a column
    pub fn fit(source_column: &str, label_column: &str, values: &[Option<f64>]) -> Result<Self, CleaningError> {
        let binning_error = |reason: String| CleaningError::Binning {
            column: source_column.to_string(),
            reason,
        };

        let sorted = sorted_present(values);
        let mut distinct = sorted.clone();
        distinct.dedup();
        if distinct.len() < BIN_LABELS.len() {
            return Err(binning_error(format!(
                "{} distinct value(s), at least {} required",
                distinct.len(),
                BIN_LABELS.len()
            )));
        }

        let edges = [
            sorted[0],
            quantile(&sorted, 1.0 / 3.0).unwrap_or(sorted[0]),
            quantile(&sorted, 2.0 / 3.0).unwrap_or(sorted[0]),
            sorted[sorted.len() - 1],
        ];
        if edges.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(binning_error(format!(
                "quantile edges {:?} are not strictly increasing",
                edges
            )));
        }

        Ok(Self {
            source_column: source_column.to_string(),
            label_column: label_column.to_string(),
            edges,
            counts: [0; 3],
        })
    }

    /// Bucket index of a value
    pub fn bucket(&self, value: f64) -> usize {
        if value <= self.edges[1] {
            0
        } else if value <= self.edges[2] {
            1
        } else {
            2
        }
    }

    pub fn label(&self, value: f64) -> &'static str {
        BIN_LABELS[self.bucket(value)]
    }
}

/// Copy a column under a new name so later stages cannot change its units
pub fn preserve_column(mut df: DataFrame, source: &str, preserved: &str) -> Result<DataFrame, CleaningError> {
    let values = numeric_values(&df, source)?;
    put_numeric(&mut df, preserved, values)?;
    Ok(df)
}

/// Bin `source_column` into three equal-population buckets written to `label_column`
pub fn bin_column(
    mut df: DataFrame,
    source_column: &str,
    label_column: &str,
) -> Result<(DataFrame, QuantileBins), CleaningError> {
    let values = numeric_values(&df, source_column)?;
    let mut bins = QuantileBins::fit(source_column, label_column, &values)?;

    let labels: Vec<Option<String>> = values
        .iter()
        .map(|v| {
            v.map(|x| {
                let bucket = bins.bucket(x);
                bins.counts[bucket] += 1;
                BIN_LABELS[bucket].to_string()
            })
        })
        .collect();

    put_text(&mut df, label_column, labels)?;
    Ok((df, bins))
}
