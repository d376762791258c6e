//! Cleaning summary report generation

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{CleaningOutcome, OutlierPolicy, Stage};

/// Summary of what a cleaning run changed
#[derive(Debug, Default)]
pub struct CleaningSummary {
    pub initial_rows: usize,
    pub initial_columns: usize,
    pub final_rows: usize,
    pub final_columns: usize,
    pub duplicates_removed: usize,
    pub values_imputed: usize,
    pub coerced_to_missing: usize,
    pub outlier_policy: OutlierPolicy,
    pub outliers_affected: usize,
    pub scaled_columns: Vec<String>,
    pub unscaled_columns: Vec<String>,
    pub encoded_columns: Vec<String>,
    pub bin_counts: Option<[usize; 3]>,
}

impl CleaningSummary {
    pub fn from_outcome(outcome: &CleaningOutcome, outlier_policy: OutlierPolicy) -> Self {
        let fitted = &outcome.fitted;
        let (scaled, unscaled): (Vec<_>, Vec<_>) = fitted.scalers.iter().partition(|s| !s.skipped);

        Self {
            initial_rows: outcome.diagnostics.rows,
            initial_columns: outcome.diagnostics.columns,
            final_rows: outcome.table.height(),
            final_columns: outcome.table.width(),
            duplicates_removed: fitted.duplicates_removed,
            values_imputed: fitted.imputation.iter().map(|f| f.filled).sum(),
            coerced_to_missing: fitted.coercions.iter().map(|c| c.coerced_to_missing).sum(),
            outlier_policy,
            outliers_affected: fitted.outlier_bounds.iter().map(|b| b.affected).sum(),
            scaled_columns: scaled.iter().map(|s| s.column.clone()).collect(),
            unscaled_columns: unscaled.iter().map(|s| s.column.clone()).collect(),
            encoded_columns: fitted.encoders.iter().map(|e| e.column.clone()).collect(),
            bin_counts: fitted.binning.as_ref().map(|b| b.counts),
        }
    }

    fn count_cell(count: usize) -> Cell {
        Cell::new(count).fg(if count == 0 { Color::White } else { Color::Yellow })
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("CLEANING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Input Shape"),
            Cell::new(format!("{} × {}", self.initial_rows, self.initial_columns)),
        ]);
        table.add_row(vec![
            Cell::new("🔤 Coerced to Missing"),
            Self::count_cell(self.coerced_to_missing),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Duplicates Removed"),
            Self::count_cell(self.duplicates_removed),
        ]);
        table.add_row(vec![
            Cell::new("🩹 Values Imputed"),
            Self::count_cell(self.values_imputed),
        ]);
        let outlier_label = match self.outlier_policy {
            OutlierPolicy::Cap => "✂️  Values Capped",
            OutlierPolicy::Filter => "✂️  Rows Filtered",
        };
        table.add_row(vec![
            Cell::new(outlier_label),
            Self::count_cell(self.outliers_affected),
        ]);
        table.add_row(vec![
            Cell::new("📏 Columns Scaled"),
            Cell::new(self.scaled_columns.len()),
        ]);
        table.add_row(vec![
            Cell::new("🏷️  Columns Encoded"),
            Cell::new(self.encoded_columns.len()),
        ]);
        if let Some([low, medium, high]) = self.bin_counts {
            table.add_row(vec![
                Cell::new("🪣 Bins (low/medium/high)"),
                Cell::new(format!("{}/{}/{}", low, medium, high)),
            ]);
        }
        table.add_row(vec![
            Cell::new("✅ Output Shape"),
            Cell::new(format!("{} × {}", self.final_rows, self.final_columns))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.unscaled_columns.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Left Unscaled (zero variance)").yellow(),
                style(format!("({})", self.unscaled_columns.len())).dim()
            );
            for column in &self.unscaled_columns {
                println!("        {} {}", style("•").dim(), column);
            }
        }
    }
}

/// Print the transformation log as a table
pub fn display_log(outcome: &CleaningOutcome) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Stage").add_attribute(Attribute::Bold),
        Cell::new("Rows").add_attribute(Attribute::Bold),
        Cell::new("Result").add_attribute(Attribute::Bold),
    ]);

    for entry in &outcome.log.entries {
        let rows = if entry.rows_before == entry.rows_after {
            Cell::new(entry.rows_after)
        } else {
            Cell::new(format!("{} → {}", entry.rows_before, entry.rows_after)).fg(Color::Yellow)
        };
        let stage = if entry.stage == Stage::Binning {
            Cell::new(entry.stage).fg(Color::Cyan)
        } else {
            Cell::new(entry.stage)
        };
        table.add_row(vec![stage, rows, Cell::new(&entry.message)]);
    }

    println!();
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}
