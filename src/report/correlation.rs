//! Correlation summary of the cleaned feature columns

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

/// Largest matrix rendered in full; wider tables only list the top pairs
const MAX_MATRIX_COLUMNS: usize = 10;

/// A pair of features and their Pearson correlation
#[derive(Debug, Clone, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Pearson correlation matrix of the numeric feature columns
#[derive(Debug, Clone, Default, Serialize)]
pub struct CorrelationReport {
    pub columns: Vec<String>,
    /// Row-major, symmetric; `None` where a column has zero variance
    pub matrix: Vec<Vec<Option<f64>>>,
    /// All pairs sorted by absolute correlation, descending
    pub pairs: Vec<CorrelatedPair>,
}

impl CorrelationReport {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.matrix[i][j]
    }
}

/// Compute correlations between numeric columns not listed in `skip`.
/// Pairs are evaluated in parallel.
pub fn correlation_report(df: &DataFrame, skip: &[String]) -> Result<CorrelationReport> {
    let float_columns: Vec<(String, Column)> = df
        .get_columns()
        .iter()
        .filter(|col| {
            col.dtype().is_primitive_numeric() && !skip.iter().any(|s| s == col.name().as_str())
        })
        .map(|col| Ok((col.name().to_string(), col.cast(&DataType::Float64)?)))
        .collect::<PolarsResult<_>>()?;

    let n = float_columns.len();
    let mut report = CorrelationReport {
        columns: float_columns.iter().map(|(name, _)| name.clone()).collect(),
        matrix: vec![vec![None; n]; n],
        pairs: Vec::new(),
    };

    // Upper triangle
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let computed: Vec<(usize, usize, Option<f64>)> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let corr = pearson_correlation(&float_columns[i].1, &float_columns[j].1);
            (i, j, corr)
        })
        .collect();

    for i in 0..n {
        if pearson_correlation(&float_columns[i].1, &float_columns[i].1).is_some() {
            report.matrix[i][i] = Some(1.0);
        }
    }

    for (i, j, corr) in computed {
        report.matrix[i][j] = corr;
        report.matrix[j][i] = corr;
        if let Some(c) = corr {
            report.pairs.push(CorrelatedPair {
                feature1: report.columns[i].clone(),
                feature2: report.columns[j].clone(),
                correlation: c,
            });
        }
    }

    report.pairs.sort_by(|a, b| {
        b.correlation
            .abs()
            .partial_cmp(&a.correlation.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(report)
}

/// Pearson correlation by Welford's single-pass algorithm over rows where
/// both values are present.
fn pearson_correlation(s1: &Column, s2: &Column) -> Option<f64> {
    let ca1 = s1.f64().ok()?;
    let ca2 = s2.f64().ok()?;
    if ca1.len() != ca2.len() {
        return None;
    }

    let mut count = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in ca1.iter().zip(ca2.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            count += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / count;
            mean_y += dy / count;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if count < 2.0 || var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    Some((cov_xy / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

fn correlation_cell(value: Option<f64>) -> Cell {
    match value {
        Some(c) => {
            let color = match c.abs() {
                a if a >= 0.7 => Color::Red,
                a if a >= 0.4 => Color::Yellow,
                _ => Color::Green,
            };
            Cell::new(format!("{:+.2}", c))
                .fg(color)
                .set_alignment(CellAlignment::Right)
        }
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}

/// Print the matrix (when narrow enough) and the strongest pairs
pub fn display_correlation(report: &CorrelationReport, top: usize) {
    println!();
    println!(
        "    {} {}",
        style("🔗").cyan(),
        style("FEATURE CORRELATION").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());

    if report.columns.len() < 2 {
        println!("      {}", style("Fewer than two numeric features; nothing to correlate").dim());
        return;
    }

    if report.columns.len() <= MAX_MATRIX_COLUMNS {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        let mut header = vec![Cell::new("")];
        header.extend(
            report
                .columns
                .iter()
                .map(|c| Cell::new(c).add_attribute(Attribute::Bold)),
        );
        table.set_header(header);

        for (name, row) in report.columns.iter().zip(&report.matrix) {
            let mut cells = vec![Cell::new(name).add_attribute(Attribute::Bold)];
            cells.extend(row.iter().map(|v| correlation_cell(*v)));
            table.add_row(cells);
        }

        println!();
        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }

    if !report.pairs.is_empty() {
        println!();
        println!("      {}", style("Strongest pairs:").yellow());
        for pair in report.pairs.iter().take(top) {
            println!(
                "        {} {} ↔ {}  {}",
                style("•").dim(),
                pair.feature1,
                pair.feature2,
                style(format!("{:+.3}", pair.correlation)).bold()
            );
        }
    }
}
