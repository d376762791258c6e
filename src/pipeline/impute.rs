//! Missing-value imputation: median for numeric columns, mode for categorical

use std::collections::HashMap;

use polars::prelude::*;
use serde::Serialize;

use super::error::CleaningError;
use super::stats::{median, sorted_present};
use super::table::{column_kind, column_names, numeric_values, put_numeric, put_text, text_values, ColumnKind};

/// Fill value learned for a column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "strategy", content = "value", rename_all = "lowercase")]
pub enum FillValue {
    Median(f64),
    Mode(String),
}

/// Fitted imputation for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnFill {
    pub column: String,
    pub fill: FillValue,
    /// Cells filled when the fill was applied during the run
    pub filled: usize,
}

/// Most frequent present value; ties go to the value seen first
pub fn mode(values: &[Option<String>]) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, value) in values.iter().flatten().enumerate() {
        counts
            .entry(value.as_str())
            .or_insert((0, position))
            .0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value.to_string())
}

/// Learn a fill value for every column of the table.
///
/// Fails on the first column (in table order) with no present values.
pub fn fit_imputer(df: &DataFrame) -> Result<Vec<ColumnFill>, CleaningError> {
    column_names(df)
        .into_iter()
        .map(|name| {
            let fill = match column_kind(df.column(&name)?) {
                ColumnKind::Numeric => {
                    let sorted = sorted_present(&numeric_values(df, &name)?);
                    median(&sorted).map(FillValue::Median)
                }
                ColumnKind::Categorical => mode(&text_values(df, &name)?).map(FillValue::Mode),
            };

            match fill {
                Some(fill) => Ok(ColumnFill {
                    column: name,
                    fill,
                    filled: 0,
                }),
                None => Err(CleaningError::DataQuality { column: name }),
            }
        })
        .collect()
}

/// Replace missing values using previously fitted fills.
///
/// Columns without a fitted fill are left untouched. The `filled` counter of
/// each fill is updated with the number of cells written.
pub fn apply_imputation(
    mut df: DataFrame,
    fills: &mut [ColumnFill],
) -> Result<DataFrame, CleaningError> {
    for fill in fills.iter_mut() {
        let column = df.column(&fill.column)?;
        fill.filled = column.null_count();
        if fill.filled == 0 {
            continue;
        }

        match &fill.fill {
            FillValue::Median(value) => {
                let values = numeric_values(&df, &fill.column)?
                    .into_iter()
                    .map(|v| Some(v.unwrap_or(*value)))
                    .collect();
                put_numeric(&mut df, &fill.column, values)?;
            }
            FillValue::Mode(value) => {
                let values = text_values(&df, &fill.column)?
                    .into_iter()
                    .map(|v| Some(v.unwrap_or_else(|| value.clone())))
                    .collect();
                put_text(&mut df, &fill.column, values)?;
            }
        }
    }

    Ok(df)
}

/// Fit on the table and fill it in one step
pub fn impute_missing(df: DataFrame) -> Result<(DataFrame, Vec<ColumnFill>), CleaningError> {
    let mut fills = fit_imputer(&df)?;
    let df = apply_imputation(df, &mut fills)?;
    Ok((df, fills))
}
