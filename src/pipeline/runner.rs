//! Pipeline driver
//!
//! Owns the table and moves it through the stages in their fixed order,
//! advancing the state machine after each one. The first failure halts the
//! run; nothing is rolled back and no partial table is returned.

use polars::prelude::*;
use serde::Serialize;

use super::binning::{bin_column, preserve_column, QuantileBins};
use super::config::{OutlierPolicy, PipelineConfig, TypePolicy};
use super::dedup::remove_duplicates;
use super::diagnostics::{describe, DiagnosticsReport};
use super::encoding::{encode_categoricals, EncodingMap};
use super::error::{CleaningError, PipelineError};
use super::impute::{impute_missing, ColumnFill};
use super::normalize::{normalize_types, ColumnCoercion};
use super::outliers::{suppress_outliers, OutlierBounds};
use super::scaling::{standardize, ColumnScaler};
use super::state::{PipelineState, Stage};
use super::table::{column_kind, column_names, ColumnKind, ColumnRoles};

/// One line of the transformation log
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub stage: Stage,
    pub rows_before: usize,
    pub rows_after: usize,
    /// Columns the stage changed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    pub message: String,
}

/// Ordered record of what every stage did
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransformationLog {
    pub entries: Vec<LogEntry>,
}

impl TransformationLog {
    pub fn entry(&self, stage: Stage) -> Option<&LogEntry> {
        self.entries.iter().find(|e| e.stage == stage)
    }
}

/// Fitted state of every stage, scoped to one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct FittedState {
    pub coercions: Vec<ColumnCoercion>,
    pub duplicates_removed: usize,
    pub imputation: Vec<ColumnFill>,
    pub outlier_bounds: Vec<OutlierBounds>,
    pub scalers: Vec<ColumnScaler>,
    pub encoders: Vec<EncodingMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binning: Option<QuantileBins>,
}

/// Everything a successful run produces
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub table: DataFrame,
    pub fitted: FittedState,
    pub log: TransformationLog,
    pub diagnostics: DiagnosticsReport,
    pub state: PipelineState,
}

/// Receives progress notifications from the driver
pub trait StageObserver {
    fn stage_started(&mut self, _stage: Stage) {}
    fn stage_finished(&mut self, _entry: &LogEntry) {}
    fn diagnostics(&mut self, _report: &DiagnosticsReport) {}
}

/// Observer that ignores everything
#[derive(Debug, Default)]
pub struct SilentObserver;

impl StageObserver for SilentObserver {}

struct StageOutput<T> {
    table: DataFrame,
    fitted: T,
    columns: Vec<String>,
    message: String,
}

struct Driver<'a> {
    observer: &'a mut dyn StageObserver,
    state: PipelineState,
    log: TransformationLog,
}

impl Driver<'_> {
    fn fail(&self, stage: Stage, error: CleaningError) -> PipelineError {
        PipelineError::new(stage, self.state, error)
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        self.state = next;
    }

    fn run_stage<T>(
        &mut self,
        stage: Stage,
        table: DataFrame,
        work: impl FnOnce(DataFrame) -> Result<StageOutput<T>, CleaningError>,
    ) -> Result<(DataFrame, T), PipelineError> {
        self.observer.stage_started(stage);
        let rows_before = table.height();

        let output = work(table).map_err(|e| self.fail(stage, e))?;

        if let Some(next) = stage.completes() {
            self.advance(next);
        }

        let entry = LogEntry {
            stage,
            rows_before,
            rows_after: output.table.height(),
            columns: output.columns,
            message: output.message,
        };
        self.observer.stage_finished(&entry);
        self.log.entries.push(entry);

        Ok((output.table, output.fitted))
    }
}

/// Check that every column the configuration names exists and that the
/// derived binning columns do not collide with existing ones.
pub fn validate_config(df: &DataFrame, config: &PipelineConfig) -> Result<(), CleaningError> {
    let names = column_names(df);

    let referenced = std::iter::once(&config.target_column)
        .chain(config.exclusion_columns.iter())
        .chain(config.categorical_columns.iter())
        .chain(config.bin_target_column.iter());

    let mut unknown: Vec<String> = Vec::new();
    for column in referenced {
        if !names.contains(column) && !unknown.contains(column) {
            unknown.push(column.clone());
        }
    }
    if !unknown.is_empty() {
        return Err(CleaningError::configuration(unknown, "not found in dataset"));
    }

    if config.type_policy == TypePolicy::CoerceAllNumeric && !config.categorical_columns.is_empty() {
        return Err(CleaningError::configuration(
            config.categorical_columns.clone(),
            "categorical overrides require the 'declared' type policy",
        ));
    }

    let derived: Vec<String> = config
        .preserved_column()
        .into_iter()
        .chain(config.bin_label_column())
        .filter(|c| names.contains(c))
        .collect();
    if !derived.is_empty() {
        return Err(CleaningError::configuration(
            derived,
            "binning output column already exists in dataset",
        ));
    }

    Ok(())
}

fn plural(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}

/// Run the full cleaning pipeline over an in-memory table
pub fn run_pipeline(
    table: DataFrame,
    config: &PipelineConfig,
    observer: &mut dyn StageObserver,
) -> Result<CleaningOutcome, PipelineError> {
    let mut driver = Driver {
        observer,
        state: PipelineState::Loaded,
        log: TransformationLog::default(),
    };
    let mut fitted = FittedState::default();

    let (table, ()) = driver.run_stage(Stage::Validation, table, |table| {
        validate_config(&table, config)?;
        Ok(StageOutput {
            table,
            fitted: (),
            columns: Vec::new(),
            message: "Configuration references valid columns".to_string(),
        })
    })?;

    let (table, diagnostics) = driver.run_stage(Stage::Diagnostics, table, |table| {
        let report = describe(&table)?;
        let message = format!(
            "{} × {}, {} missing",
            plural(report.rows, "row"),
            plural(report.columns, "column"),
            plural(report.total_missing(), "value")
        );
        Ok(StageOutput {
            table,
            fitted: report,
            columns: Vec::new(),
            message,
        })
    })?;
    driver.observer.diagnostics(&diagnostics);

    let (table, coercions) = driver.run_stage(Stage::TypeNormalization, table, |table| {
        let (table, coercions) = normalize_types(table, config)?;

        if let Some(bin) = &config.bin_target_column {
            if column_kind(table.column(bin)?) != ColumnKind::Numeric {
                return Err(CleaningError::configuration(
                    vec![bin.clone()],
                    "bin column must be numeric after type normalization",
                ));
            }
        }

        let lost: usize = coercions.iter().map(|c| c.coerced_to_missing).sum();
        let categorical = coercions.iter().filter(|c| c.kind == ColumnKind::Categorical).count();
        let message = format!(
            "{} numeric, {} categorical; {} became missing",
            plural(coercions.len() - categorical, "column"),
            plural(categorical, "column"),
            plural(lost, "value")
        );
        Ok(StageOutput {
            table,
            columns: coercions
                .iter()
                .filter(|c| c.coerced_to_missing > 0)
                .map(|c| c.column.clone())
                .collect(),
            fitted: coercions,
            message,
        })
    })?;
    fitted.coercions = coercions;

    let (table, removed) = driver.run_stage(Stage::Deduplication, table, |table| {
        let (table, removed) = remove_duplicates(table)?;
        Ok(StageOutput {
            table,
            fitted: removed,
            columns: Vec::new(),
            message: format!("Removed {}", plural(removed, "duplicate row")),
        })
    })?;
    fitted.duplicates_removed = removed;

    let (table, fills) = driver.run_stage(Stage::Imputation, table, |table| {
        let (table, fills) = impute_missing(table)?;
        let touched: Vec<String> = fills
            .iter()
            .filter(|f| f.filled > 0)
            .map(|f| f.column.clone())
            .collect();
        let filled: usize = fills.iter().map(|f| f.filled).sum();
        Ok(StageOutput {
            table,
            message: format!(
                "Filled {} across {}",
                plural(filled, "missing value"),
                plural(touched.len(), "column")
            ),
            columns: touched,
            fitted: fills,
        })
    })?;
    fitted.imputation = fills;

    let (table, bounds) = driver.run_stage(Stage::OutlierSuppression, table, |table| {
        let roles = ColumnRoles::resolve(&table, config);
        let (table, bounds) = suppress_outliers(table, &roles.scalable, config.outlier_policy)?;
        let touched: Vec<String> = bounds
            .iter()
            .filter(|b| b.affected > 0)
            .map(|b| b.column.clone())
            .collect();
        let affected: usize = bounds.iter().map(|b| b.affected).sum();
        let action = match config.outlier_policy {
            OutlierPolicy::Cap => format!("Capped {}", plural(affected, "value")),
            OutlierPolicy::Filter => format!("Dropped {}", plural(affected, "row")),
        };
        Ok(StageOutput {
            table,
            message: format!("{} in {}", action, plural(touched.len(), "column")),
            columns: touched,
            fitted: bounds,
        })
    })?;
    fitted.outlier_bounds = bounds;

    let (table, scalers) = driver.run_stage(Stage::Scaling, table, |table| {
        let table = match (&config.bin_target_column, config.preserved_column()) {
            (Some(source), Some(preserved)) => preserve_column(table, source, &preserved)?,
            _ => table,
        };
        let roles = ColumnRoles::resolve(&table, config);
        let (table, scalers) = standardize(table, &roles.scalable, config.zero_variance)?;
        let skipped: Vec<&str> = scalers
            .iter()
            .filter(|s| s.skipped)
            .map(|s| s.column.as_str())
            .collect();
        let mut message = format!(
            "Standardized {}",
            plural(scalers.len() - skipped.len(), "column")
        );
        if !skipped.is_empty() {
            message.push_str(&format!("; left zero-variance unscaled: {}", skipped.join(", ")));
        }
        Ok(StageOutput {
            table,
            columns: scalers
                .iter()
                .filter(|s| !s.skipped)
                .map(|s| s.column.clone())
                .collect(),
            fitted: scalers,
            message,
        })
    })?;
    fitted.scalers = scalers;

    let (table, encoders) = driver.run_stage(Stage::Encoding, table, |table| {
        let roles = ColumnRoles::resolve(&table, config);
        let (table, encoders) = encode_categoricals(table, &roles.categorical)?;
        Ok(StageOutput {
            table,
            message: format!("Encoded {}", plural(encoders.len(), "categorical column")),
            columns: roles.categorical,
            fitted: encoders,
        })
    })?;
    fitted.encoders = encoders;

    let mut table = table;
    if let (Some(preserved), Some(label)) = (config.preserved_column(), config.bin_label_column()) {
        let (binned, bins) = driver.run_stage(Stage::Binning, table, |table| {
            let (table, bins) = bin_column(table, &preserved, &label)?;
            let message = format!(
                "Binned '{}' into low/medium/high ({}/{}/{})",
                preserved, bins.counts[0], bins.counts[1], bins.counts[2]
            );
            Ok(StageOutput {
                table,
                fitted: bins,
                columns: vec![label.clone()],
                message,
            })
        })?;
        table = binned;
        fitted.binning = Some(bins);
    }

    driver.advance(PipelineState::Complete);

    Ok(CleaningOutcome {
        table,
        fitted,
        log: driver.log,
        diagnostics,
        state: driver.state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df! {
            "ph" => [Some(7.0f64), Some(6.5), None, Some(8.0), Some(7.0), Some(7.2)],
            "hardness" => [200.0f64, 180.0, 210.0, 190.0, 200.0, 205.0],
            "is_safe" => [1i64, 0, 1, 0, 1, 1],
        }
        .unwrap()
    }

    #[test]
    fn test_run_reaches_complete_and_logs_every_stage() {
        let config = PipelineConfig::new("is_safe");

        let outcome = run_pipeline(sample(), &config, &mut SilentObserver).unwrap();

        assert_eq!(outcome.state, PipelineState::Complete);
        let stages: Vec<Stage> = outcome.log.entries.iter().map(|e| e.stage).collect();
        assert_eq!(
            stages,
            vec![
                Stage::Validation,
                Stage::Diagnostics,
                Stage::TypeNormalization,
                Stage::Deduplication,
                Stage::Imputation,
                Stage::OutlierSuppression,
                Stage::Scaling,
                Stage::Encoding,
            ]
        );
    }

    #[test]
    fn test_unknown_columns_are_reported_together() {
        let config = PipelineConfig::new("missing_target").with_exclusions(["nope"]);

        let err = run_pipeline(sample(), &config, &mut SilentObserver).unwrap_err();

        assert_eq!(err.stage, Stage::Validation);
        assert_eq!(err.state, PipelineState::Loaded);
        assert_eq!(err.columns(), vec!["missing_target", "nope"]);
    }

    #[test]
    fn test_categorical_overrides_need_declared_policy() {
        let config = PipelineConfig::new("is_safe").with_categorical_columns(["ph"]);

        let err = run_pipeline(sample(), &config, &mut SilentObserver).unwrap_err();

        assert!(matches!(err.source, CleaningError::Configuration { .. }));
    }

    #[test]
    fn test_failure_surfaces_stage_and_last_state() {
        let df = df! {
            "constant" => [1.0f64, 1.0, 1.0, 1.0],
            "x" => [1.0f64, 2.0, 3.0, 4.0],
            "t" => [0i64, 1, 0, 1],
        }
        .unwrap();

        let err = run_pipeline(df, &PipelineConfig::new("t"), &mut SilentObserver).unwrap_err();

        assert_eq!(err.stage, Stage::Scaling);
        assert_eq!(err.state, PipelineState::OutlierHandled);
        assert_eq!(err.columns(), vec!["constant"]);
    }

    #[test]
    fn test_binning_adds_preserved_and_label_columns() {
        let config = PipelineConfig::new("is_safe").with_bin_column("hardness");

        let outcome = run_pipeline(sample(), &config, &mut SilentObserver).unwrap();

        let names = column_names(&outcome.table);
        assert!(names.contains(&"hardness_original".to_string()));
        assert!(names.contains(&"hardness_bin".to_string()));
        assert!(outcome.fitted.binning.is_some());
        assert!(outcome.log.entry(Stage::Binning).is_some());
    }

    #[test]
    fn test_existing_derived_column_is_rejected() {
        let df = df! {
            "h" => [1.0f64, 2.0, 3.0],
            "h_bin" => ["a", "b", "c"],
            "t" => [0i64, 1, 0],
        }
        .unwrap();
        let config = PipelineConfig::new("t").with_bin_column("h");

        let err = validate_config(&df, &config).unwrap_err();

        assert_eq!(err.columns(), vec!["h_bin"]);
    }

    #[derive(Default)]
    struct Recorder {
        started: Vec<Stage>,
        finished: usize,
        saw_diagnostics: bool,
    }

    impl StageObserver for Recorder {
        fn stage_started(&mut self, stage: Stage) {
            self.started.push(stage);
        }
        fn stage_finished(&mut self, _entry: &LogEntry) {
            self.finished += 1;
        }
        fn diagnostics(&mut self, _report: &DiagnosticsReport) {
            self.saw_diagnostics = true;
        }
    }

    #[test]
    fn test_observer_sees_each_stage() {
        let mut recorder = Recorder::default();

        run_pipeline(sample(), &PipelineConfig::new("is_safe"), &mut recorder).unwrap();

        assert_eq!(recorder.started.len(), 8);
        assert_eq!(recorder.finished, 8);
        assert!(recorder.saw_diagnostics);
    }
}
