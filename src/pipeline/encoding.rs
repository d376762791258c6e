//! Dense integer encoding of categorical columns
//!
//! Codes follow first-seen order, so encoding the same column twice always
//! yields the same assignment.

use std::collections::HashMap;

use polars::prelude::*;
use serde::Serialize;

use super::error::CleaningError;
use super::table::text_values;

/// Fitted code assignment for one column. The code of a category is its
/// position in `categories`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodingMap {
    pub column: String,
    pub categories: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, u32>,
}

impl EncodingMap {
    /// Learn categories from present values in first-seen order
    pub fn fit(column: &str, values: &[Option<String>]) -> Self {
        let mut categories = Vec::new();
        let mut index = HashMap::new();
        for value in values.iter().flatten() {
            if !index.contains_key(value) {
                index.insert(value.clone(), categories.len() as u32);
                categories.push(value.clone());
            }
        }
        Self {
            column: column.to_string(),
            categories,
            index,
        }
    }

    pub fn encode(&self, value: &str) -> Option<u32> {
        self.index.get(value).copied()
    }

    pub fn decode(&self, code: u32) -> Option<&str> {
        self.categories.get(code as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Replace each listed column with its codes. Values the map has never seen
/// become missing.
pub fn apply_encoding(mut df: DataFrame, maps: &[EncodingMap]) -> Result<DataFrame, CleaningError> {
    for map in maps {
        let codes: Vec<Option<u32>> = text_values(&df, &map.column)?
            .iter()
            .map(|v| v.as_deref().and_then(|s| map.encode(s)))
            .collect();
        df.with_column(Column::new(map.column.as_str().into(), codes))?;
    }
    Ok(df)
}

/// Fit an encoding per column, independently, and encode the table
pub fn encode_categoricals(
    df: DataFrame,
    columns: &[String],
) -> Result<(DataFrame, Vec<EncodingMap>), CleaningError> {
    let maps = columns
        .iter()
        .map(|column| Ok(EncodingMap::fit(column, &text_values(&df, column)?)))
        .collect::<Result<Vec<_>, CleaningError>>()?;

    let df = apply_encoding(df, &maps)?;
    Ok((df, maps))
}
