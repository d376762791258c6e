//! Exact-duplicate row removal

use polars::prelude::*;

use super::error::CleaningError;

/// Remove exact-duplicate rows, keeping the first occurrence in input order.
///
/// Missing cells compare equal to each other and to nothing else. Returns the
/// table and the number of rows removed.
pub fn remove_duplicates(df: DataFrame) -> Result<(DataFrame, usize), CleaningError> {
    let before = df.height();
    let deduplicated = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
    let removed = before - deduplicated.height();
    Ok((deduplicated, removed))
}
