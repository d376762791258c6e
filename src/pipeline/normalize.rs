//! Type normalization: every column becomes exactly numeric or categorical

use polars::prelude::*;
use serde::Serialize;

use super::config::{PipelineConfig, TypePolicy};
use super::error::CleaningError;
use super::table::{column_names, numeric_values, put_numeric, put_text, text_values, ColumnKind};

/// Outcome of normalizing one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnCoercion {
    pub column: String,
    pub kind: ColumnKind,
    /// Present values that became missing during coercion
    pub coerced_to_missing: usize,
}

/// Parse a text cell as a finite number
fn parse_numeric(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric() || matches!(dtype, DataType::Boolean)
}

fn coerce_numeric(df: &mut DataFrame, name: &str) -> Result<usize, CleaningError> {
    let column = df.column(name)?;
    let before = column.null_count();

    let values: Vec<Option<f64>> = if is_numeric_dtype(column.dtype()) {
        numeric_values(df, name)?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect()
    } else {
        text_values(df, name)?
            .into_iter()
            .map(|v| v.as_deref().and_then(parse_numeric))
            .collect()
    };

    let after = values.iter().filter(|v| v.is_none()).count();
    put_numeric(df, name, values)?;
    Ok(after.saturating_sub(before))
}

fn keep_categorical(df: &mut DataFrame, name: &str) -> Result<usize, CleaningError> {
    let values = text_values(df, name)?;
    put_text(df, name, values)?;
    Ok(0)
}

/// Coerce every column according to the configured policy.
///
/// Coercion failures are recorded as missing values, never raised.
pub fn normalize_types(
    mut df: DataFrame,
    config: &PipelineConfig,
) -> Result<(DataFrame, Vec<ColumnCoercion>), CleaningError> {
    let mut report = Vec::with_capacity(df.width());

    for name in column_names(&df) {
        let kind = match config.type_policy {
            TypePolicy::CoerceAllNumeric => ColumnKind::Numeric,
            TypePolicy::DeclaredKinds => {
                let dtype = df.column(&name)?.dtype().clone();
                if config.categorical_columns.contains(&name) || !is_numeric_dtype(&dtype) {
                    ColumnKind::Categorical
                } else {
                    ColumnKind::Numeric
                }
            }
        };

        let coerced_to_missing = match kind {
            ColumnKind::Numeric => coerce_numeric(&mut df, &name)?,
            ColumnKind::Categorical => keep_categorical(&mut df, &name)?,
        };

        report.push(ColumnCoercion {
            column: name,
            kind,
            coerced_to_missing,
        });
    }

    Ok((df, report))
}
