//! Column access helpers and role resolution over the working table

use polars::prelude::*;
use serde::Serialize;

use super::config::PipelineConfig;

/// Kind of a column after type normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Classify a column by its dtype
pub fn column_kind(column: &Column) -> ColumnKind {
    if column.dtype().is_primitive_numeric() {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

/// Column names in table order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Read a column as nullable floats
pub fn numeric_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let values = column.f64()?.into_iter().collect();
    Ok(values)
}

/// Read a column as nullable strings
pub fn text_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(values)
}

/// Replace (or append) a float column in place
pub fn put_numeric(df: &mut DataFrame, name: &str, values: Vec<Option<f64>>) -> PolarsResult<()> {
    df.with_column(Column::new(name.into(), values))?;
    Ok(())
}

/// Replace (or append) a string column in place
pub fn put_text(df: &mut DataFrame, name: &str, values: Vec<Option<String>>) -> PolarsResult<()> {
    df.with_column(Column::new(name.into(), values))?;
    Ok(())
}

/// Column roles derived from the current table and the configuration.
///
/// Never cached across stages: kinds change during type normalization and
/// encoding, and the binning columns appear mid-run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRoles {
    pub target: Option<String>,
    /// Configured exclusions that are present in the table
    pub excluded: Vec<String>,
    /// Numeric columns that outlier handling and scaling may alter
    pub scalable: Vec<String>,
    pub categorical: Vec<String>,
    /// Every numeric column, protected or not
    pub numeric: Vec<String>,
}

impl ColumnRoles {
    pub fn resolve(df: &DataFrame, config: &PipelineConfig) -> Self {
        let preserved = config.preserved_column();
        let label = config.bin_label_column();
        let mut roles = ColumnRoles::default();

        for column in df.get_columns() {
            let name = column.name().to_string();
            let kind = column_kind(column);

            if name == config.target_column {
                roles.target = Some(name.clone());
            } else if config.exclusion_columns.contains(&name) {
                roles.excluded.push(name.clone());
            }

            match kind {
                ColumnKind::Numeric => {
                    let derived = Some(&name) == preserved.as_ref() || Some(&name) == label.as_ref();
                    if !config.is_protected(&name) && !derived {
                        roles.scalable.push(name.clone());
                    }
                    roles.numeric.push(name);
                }
                ColumnKind::Categorical => roles.categorical.push(name),
            }
        }

        roles
    }
}
