//! Fitted-state export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{CleaningOutcome, DiagnosticsReport, FittedState, PipelineConfig, TransformationLog};

/// Metadata about the cleaning run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the export (ISO 8601 format)
    pub timestamp: String,
    pub tidewash_version: String,
    pub input_file: String,
    /// Cleaned table written alongside this export
    pub output_file: String,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// Everything needed to reproduce or reverse the run on new data
#[derive(Serialize)]
pub struct FittedStateExport<'a> {
    pub metadata: RunMetadata,
    pub configuration: &'a PipelineConfig,
    pub log: &'a TransformationLog,
    pub diagnostics: &'a DiagnosticsReport,
    pub fitted: &'a FittedState,
}

impl<'a> FittedStateExport<'a> {
    pub fn new(
        outcome: &'a CleaningOutcome,
        config: &'a PipelineConfig,
        input_file: &Path,
        output_file: &Path,
    ) -> Self {
        Self {
            metadata: RunMetadata {
                timestamp: Utc::now().to_rfc3339(),
                tidewash_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: input_file.display().to_string(),
                output_file: output_file.display().to_string(),
                rows: outcome.table.height(),
                columns: outcome
                    .table
                    .get_column_names()
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            },
            configuration: config,
            log: &outcome.log,
            diagnostics: &outcome.diagnostics,
            fitted: &outcome.fitted,
        }
    }
}

/// Write the fitted state of a run to a JSON file
pub fn export_fitted_state(export: &FittedStateExport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(export)
        .context("Failed to serialize fitted state to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write fitted state to {}", output_path.display()))?;

    Ok(())
}
