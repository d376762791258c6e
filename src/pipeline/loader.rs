//! Dataset loader for delimited text files

use std::path::Path;

use polars::prelude::*;

use super::error::CleaningError;

/// Options for reading a delimited file
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Single-byte field separator
    pub separator: u8,
    /// Rows used for schema inference; 0 scans the whole file
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            infer_schema_length: 10000,
        }
    }
}

/// Shape and size of a freshly loaded table
#[derive(Debug, Clone, Copy)]
pub struct LoadStats {
    pub rows: usize,
    pub columns: usize,
    pub memory_mb: f64,
}

impl LoadStats {
    pub fn of(df: &DataFrame) -> Self {
        let (rows, columns) = df.shape();
        Self {
            rows,
            columns,
            memory_mb: df.estimated_size() as f64 / (1024.0 * 1024.0),
        }
    }
}

fn source_error(path: &Path, message: impl std::fmt::Display) -> CleaningError {
    CleaningError::SourceRead {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

fn lazy_reader(path: &Path, options: &LoadOptions) -> Result<LazyFrame, CleaningError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !matches!(extension.as_str(), "csv" | "tsv" | "txt") {
        return Err(source_error(
            path,
            format!(
                "Unsupported file format: '{}'. Supported formats: csv, tsv, txt",
                extension
            ),
        ));
    }

    if !path.exists() {
        return Err(source_error(path, "file does not exist"));
    }

    let schema_length = if options.infer_schema_length == 0 {
        None
    } else {
        Some(options.infer_schema_length)
    };

    LazyCsvReader::new(path)
        .with_has_header(true)
        .with_separator(options.separator)
        .with_infer_schema_length(schema_length)
        .finish()
        .map_err(|e| source_error(path, e))
}

/// Load the whole file into memory.
///
/// A cell past the inference window that does not fit the inferred dtype
/// fails the bounded read; the file is then re-read with a full-scan schema,
/// which widens that column to text.
pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<DataFrame, CleaningError> {
    let df = match lazy_reader(path, options)?.collect() {
        Ok(df) => df,
        Err(_) if options.infer_schema_length != 0 => {
            let full_scan = LoadOptions {
                infer_schema_length: 0,
                ..*options
            };
            lazy_reader(path, &full_scan)?
                .collect()
                .map_err(|e| source_error(path, e))?
        }
        Err(e) => return Err(source_error(path, e)),
    };

    if df.width() == 0 {
        return Err(source_error(path, "no header row found"));
    }

    Ok(df)
}

/// Read only the header of a file
pub fn get_column_names(path: &Path, options: &LoadOptions) -> Result<Vec<String>, CleaningError> {
    let schema = lazy_reader(path, options)?
        .collect_schema()
        .map_err(|e| source_error(path, e))?;

    Ok(schema.iter_names().map(|s| s.to_string()).collect())
}
