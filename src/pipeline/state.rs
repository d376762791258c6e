//! Pipeline stages and the one-way state machine they drive

use std::fmt;

use serde::Serialize;

/// A unit of work performed by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validation,
    Diagnostics,
    TypeNormalization,
    Deduplication,
    Imputation,
    OutlierSuppression,
    Scaling,
    Encoding,
    Binning,
}

impl Stage {
    /// State the pipeline reaches once this stage succeeds. Read-only stages
    /// leave the state unchanged.
    pub fn completes(self) -> Option<PipelineState> {
        match self {
            Stage::Validation | Stage::Diagnostics => None,
            Stage::TypeNormalization => Some(PipelineState::TypeNormalized),
            Stage::Deduplication => Some(PipelineState::Deduplicated),
            Stage::Imputation => Some(PipelineState::Imputed),
            Stage::OutlierSuppression => Some(PipelineState::OutlierHandled),
            Stage::Scaling => Some(PipelineState::Scaled),
            Stage::Encoding => Some(PipelineState::Encoded),
            Stage::Binning => Some(PipelineState::Binned),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validation => "Configuration Validation",
            Stage::Diagnostics => "Diagnostics",
            Stage::TypeNormalization => "Type Normalization",
            Stage::Deduplication => "Deduplication",
            Stage::Imputation => "Imputation",
            Stage::OutlierSuppression => "Outlier Suppression",
            Stage::Scaling => "Scaling",
            Stage::Encoding => "Encoding",
            Stage::Binning => "Binning",
        };
        write!(f, "{}", name)
    }
}

/// Pipeline lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineState {
    Loaded,
    TypeNormalized,
    Deduplicated,
    Imputed,
    OutlierHandled,
    Scaled,
    Encoded,
    Binned,
    Complete,
}

impl PipelineState {
    /// Whether `next` is a legal successor. `Binned` is optional, so
    /// `Encoded` may go straight to `Complete`.
    pub fn can_advance_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Loaded, TypeNormalized)
                | (TypeNormalized, Deduplicated)
                | (Deduplicated, Imputed)
                | (Imputed, OutlierHandled)
                | (OutlierHandled, Scaled)
                | (Scaled, Encoded)
                | (Encoded, Binned)
                | (Encoded, Complete)
                | (Binned, Complete)
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Loaded => "loaded",
            PipelineState::TypeNormalized => "type-normalized",
            PipelineState::Deduplicated => "deduplicated",
            PipelineState::Imputed => "imputed",
            PipelineState::OutlierHandled => "outlier-handled",
            PipelineState::Scaled => "scaled",
            PipelineState::Encoded => "encoded",
            PipelineState::Binned => "binned",
            PipelineState::Complete => "complete",
        };
        write!(f, "{}", name)
    }
}
