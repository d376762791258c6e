//! IQR-based outlier suppression
//!
//! Fences are `Q1 - 1.5 * IQR` and `Q3 + 1.5 * IQR`. Under the filter policy
//! columns are processed in table order and each column's fences are computed
//! on the rows that survived the previous columns, so the result depends on
//! column order. That compounding is intentional and reproducible.

use polars::prelude::*;
use serde::Serialize;

use super::config::OutlierPolicy;
use super::error::CleaningError;
use super::stats::{quantile, sorted_present};
use super::table::{numeric_values, put_numeric};

/// Multiplier applied to the IQR to place the fences
pub const IQR_FENCE: f64 = 1.5;

/// Fitted fences for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierBounds {
    pub column: String,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
    /// Values capped (cap policy) or rows dropped (filter policy)
    pub affected: usize,
}

impl OutlierBounds {
    /// Fences from the present values of a column; `None` if it has none
    pub fn fit(column: &str, values: &[Option<f64>]) -> Option<Self> {
        let sorted = sorted_present(values);
        let q1 = quantile(&sorted, 0.25)?;
        let q3 = quantile(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            column: column.to_string(),
            q1,
            q3,
            iqr,
            lower: q1 - IQR_FENCE * iqr,
            upper: q3 + IQR_FENCE * iqr,
            affected: 0,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}

/// Clamp a column into its fences
fn cap_column(df: &mut DataFrame, bounds: &mut OutlierBounds, values: Vec<Option<f64>>) -> Result<(), CleaningError> {
    let mut capped = 0;
    let values: Vec<Option<f64>> = values
        .into_iter()
        .map(|v| {
            v.map(|x| {
                if !bounds.contains(x) {
                    capped += 1;
                }
                bounds.clamp(x)
            })
        })
        .collect();

    bounds.affected = capped;
    if capped > 0 {
        put_numeric(df, &bounds.column, values)?;
    }
    Ok(())
}

/// Drop rows whose value lies outside the fences. Missing values are kept.
fn filter_column(df: DataFrame, bounds: &mut OutlierBounds, values: &[Option<f64>]) -> Result<DataFrame, CleaningError> {
    let keep: Vec<bool> = values
        .iter()
        .map(|v| v.map_or(true, |x| bounds.contains(x)))
        .collect();
    bounds.affected = keep.iter().filter(|k| !**k).count();

    if bounds.affected == 0 {
        return Ok(df);
    }

    let mask: BooleanChunked = keep.into_iter().collect();
    Ok(df.filter(&mask)?)
}

/// Apply the outlier policy to `columns`, in the order given.
pub fn suppress_outliers(
    mut df: DataFrame,
    columns: &[String],
    policy: OutlierPolicy,
) -> Result<(DataFrame, Vec<OutlierBounds>), CleaningError> {
    let mut fitted = Vec::with_capacity(columns.len());

    for column in columns {
        let values = numeric_values(&df, column)?;
        let Some(mut bounds) = OutlierBounds::fit(column, &values) else {
            continue;
        };

        match policy {
            OutlierPolicy::Cap => cap_column(&mut df, &mut bounds, values)?,
            OutlierPolicy::Filter => df = filter_column(df, &mut bounds, &values)?,
        }

        fitted.push(bounds);
    }

    Ok((df, fitted))
}
