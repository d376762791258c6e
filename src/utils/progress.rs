//! Progress helpers using indicatif, and the console stage observer

use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::{DiagnosticsReport, LogEntry, Stage, StageObserver};

use super::styling::{print_count, print_step_header, print_success};

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Finish a progress bar with a success message
pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✅ {}", message));
}

/// Renders pipeline progress: a step header and spinner per stage, then the
/// stage's log line.
pub struct ConsoleObserver {
    step: u8,
    spinner: Option<ProgressBar>,
}

impl ConsoleObserver {
    /// `first_step` is the number of the first pipeline stage header
    pub fn new(first_step: u8) -> Self {
        Self {
            step: first_step,
            spinner: None,
        }
    }

    /// Next free step number, for headers printed after the pipeline
    pub fn next_step(&self) -> u8 {
        self.step
    }
}

impl StageObserver for ConsoleObserver {
    fn stage_started(&mut self, stage: Stage) {
        print_step_header(self.step, &stage.to_string());
        self.step += 1;
        self.spinner = Some(create_spinner(&format!("Running {}...", stage)));
    }

    fn stage_finished(&mut self, entry: &LogEntry) {
        if let Some(pb) = self.spinner.take() {
            finish_with_success(&pb, &entry.message);
        }
        if entry.rows_before != entry.rows_after {
            print_count(
                "rows remain",
                entry.rows_after,
                Some(&format!("(was {})", entry.rows_before)),
            );
        }
        if !entry.columns.is_empty() {
            print_success(&format!("Columns: {}", entry.columns.join(", ")));
        }
    }

    fn diagnostics(&mut self, report: &DiagnosticsReport) {
        crate::report::display_diagnostics(report);
    }
}

impl Drop for ConsoleObserver {
    fn drop(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.abandon();
        }
    }
}
