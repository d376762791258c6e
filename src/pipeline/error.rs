//! Error types for the cleaning pipeline.
//!
//! `CleaningError` covers every failure a single stage can produce. The driver
//! wraps it in `PipelineError`, which adds the stage that failed and the last
//! state the pipeline reached before halting.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

use super::state::{PipelineState, Stage};

/// Errors raised by individual pipeline stages.
#[derive(Debug, Error)]
pub enum CleaningError {
    /// Input file is missing, unreadable, malformed, or of an unsupported format.
    #[error("Failed to read source '{}': {message}", path.display())]
    SourceRead { path: PathBuf, message: String },

    /// A column has no present values, so no median or mode exists.
    #[error("Column '{column}' has no usable values for imputation (all values missing)")]
    DataQuality { column: String },

    /// A column has zero variance at scaling time.
    #[error("Column '{column}' has zero variance (std = {std:e}) and cannot be standardized")]
    DegenerateColumn { column: String, std: f64 },

    /// The quantile cut cannot produce the requested buckets.
    #[error("Cannot bin column '{column}' into low/medium/high: {reason}")]
    Binning { column: String, reason: String },

    /// The configuration references columns that are absent or of the wrong kind.
    #[error("Invalid configuration for column(s) {}: {reason}", columns.join(", "))]
    Configuration { columns: Vec<String>, reason: String },

    /// Error raised by the table engine.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl CleaningError {
    /// Column(s) involved in the failure, if any.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            CleaningError::DataQuality { column }
            | CleaningError::DegenerateColumn { column, .. }
            | CleaningError::Binning { column, .. } => vec![column.as_str()],
            CleaningError::Configuration { columns, .. } => {
                columns.iter().map(|c| c.as_str()).collect()
            }
            CleaningError::SourceRead { .. } | CleaningError::Polars(_) => Vec::new(),
        }
    }

    pub(crate) fn configuration(columns: Vec<String>, reason: impl Into<String>) -> Self {
        CleaningError::Configuration {
            columns,
            reason: reason.into(),
        }
    }
}

/// A stage failure surfaced by the pipeline driver.
#[derive(Debug, Error)]
#[error("{stage} failed (pipeline halted at '{state}'): {source}")]
pub struct PipelineError {
    /// Stage that was running when the failure occurred
    pub stage: Stage,
    /// Last state successfully reached
    pub state: PipelineState,
    #[source]
    pub source: CleaningError,
}

impl PipelineError {
    pub fn new(stage: Stage, state: PipelineState, source: CleaningError) -> Self {
        Self {
            stage,
            state,
            source,
        }
    }

    /// Column(s) involved in the failure, if any.
    pub fn columns(&self) -> Vec<&str> {
        self.source.columns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_quality_display_names_column() {
        let err = CleaningError::DataQuality {
            column: "ph".to_string(),
        };
        assert!(err.to_string().contains("'ph'"));
        assert_eq!(err.columns(), vec!["ph"]);
    }

    #[test]
    fn test_configuration_lists_all_columns() {
        let err = CleaningError::configuration(
            vec!["a".to_string(), "b".to_string()],
            "not found in dataset",
        );
        let msg = err.to_string();
        assert!(msg.contains("a, b"));
        assert!(msg.contains("not found"));
        assert_eq!(err.columns(), vec!["a", "b"]);
    }

    #[test]
    fn test_pipeline_error_surfaces_stage_and_state() {
        let err = PipelineError::new(
            Stage::Scaling,
            PipelineState::OutlierHandled,
            CleaningError::DegenerateColumn {
                column: "hardness".to_string(),
                std: 0.0,
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("Scaling"));
        assert!(msg.contains("outlier-handled"));
        assert!(msg.contains("hardness"));
        assert_eq!(err.columns(), vec!["hardness"]);
    }

    #[test]
    fn test_source_read_has_no_columns() {
        let err = CleaningError::SourceRead {
            path: PathBuf::from("missing.csv"),
            message: "not found".to_string(),
        };
        assert!(err.to_string().contains("missing.csv"));
        assert!(err.columns().is_empty());
    }
}
