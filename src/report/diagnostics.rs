//! Console rendering of the pre-cleaning diagnostics

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{ColumnKind, DiagnosticsReport};

fn stat_cell(value: Option<f64>) -> Cell {
    match value {
        Some(v) => Cell::new(format!("{:.4}", v)),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}

/// Print shape, missing counts and the per-column summary
pub fn display_diagnostics(report: &DiagnosticsReport) {
    println!(
        "      Shape: {} rows × {} columns, {} missing value(s)",
        style(report.rows).yellow().bold(),
        style(report.columns).yellow().bold(),
        style(report.total_missing()).yellow().bold()
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Missing").add_attribute(Attribute::Bold),
        Cell::new("Distinct").add_attribute(Attribute::Bold),
        Cell::new("Mean").add_attribute(Attribute::Bold),
        Cell::new("Std").add_attribute(Attribute::Bold),
        Cell::new("Min").add_attribute(Attribute::Bold),
        Cell::new("Median").add_attribute(Attribute::Bold),
        Cell::new("Max").add_attribute(Attribute::Bold),
    ]);

    for summary in &report.summaries {
        let missing = if summary.missing > 0 {
            Cell::new(summary.missing).fg(Color::Red)
        } else {
            Cell::new(summary.missing)
        };
        let kind = match summary.kind {
            ColumnKind::Numeric => Cell::new(&summary.dtype).fg(Color::Cyan),
            ColumnKind::Categorical => Cell::new(&summary.dtype).fg(Color::Magenta),
        };
        table.add_row(vec![
            Cell::new(&summary.name),
            kind,
            missing,
            Cell::new(summary.distinct),
            stat_cell(summary.mean),
            stat_cell(summary.std),
            stat_cell(summary.min),
            stat_cell(summary.median),
            stat_cell(summary.max),
        ]);
    }

    println!();
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}
