//! Tidewash: Tabular Data Cleaning CLI Tool
//!
//! A command-line tool that cleans a raw delimited file into a
//! model-ready table and writes it next to the input.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use console::style;
use polars::prelude::*;

use tidewash::cli::Cli;
use tidewash::pipeline::{load_dataset, run_pipeline, LoadStats};
use tidewash::report::{
    correlation_report, display_correlation, display_log, export_fitted_state, CleaningSummary,
    FittedStateExport,
};
use tidewash::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_failure, print_info, print_step_header, print_success, ConsoleObserver,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.to_config().map_err(anyhow::Error::msg)?;
    let output_dir = cli.output_dir();

    // Print styled banner
    print_banner(env!("CARGO_PKG_VERSION"));

    // Print configuration card
    print_config(&cli.input, &output_dir, &config);

    // Step 1: Load dataset
    let started = Instant::now();
    print_step_header(1, "Load Dataset");
    let spinner = create_spinner("Reading input file...");
    let df = load_dataset(&cli.input, &cli.load_options())?;
    finish_with_success(&spinner, "Dataset loaded");

    let stats = LoadStats::of(&df);
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", stats.rows);
    println!("      Columns: {}", stats.columns);
    println!("      Estimated memory: {:.2} MB", stats.memory_mb);

    // Steps 2..: the cleaning stages
    let mut observer = ConsoleObserver::new(2);
    let outcome = match run_pipeline(df, &config, &mut observer) {
        Ok(outcome) => outcome,
        Err(e) => {
            print_failure(&e.to_string());
            return Err(e.into());
        }
    };
    let mut step = observer.next_step();
    drop(observer);
    display_log(&outcome);

    // Save output
    print_step_header(step, "Save Results");
    step += 1;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let output_path = cli.output_file(&timestamp);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let spinner = create_spinner("Writing output file...");
    let mut table = outcome.table.clone();
    save_dataset(&mut table, &output_path)?;
    finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));

    if cli.export_fitted {
        let fitted_path = cli.fitted_path(&timestamp);
        let export = FittedStateExport::new(&outcome, &config, &cli.input, &output_path);
        export_fitted_state(&export, &fitted_path)?;
        print_success(&format!("Fitted state written to {}", fitted_path.display()));
    }

    // Correlation summary of the cleaned features
    if !cli.no_correlation {
        print_step_header(step, "Correlation Summary");
        let mut skip = vec![config.target_column.clone()];
        skip.extend(config.exclusion_columns.iter().cloned());
        skip.extend(config.preserved_column());

        let spinner = create_spinner("Calculating correlations...");
        let report = correlation_report(&outcome.table, &skip)?;
        finish_with_success(
            &spinner,
            &format!("Correlated {} feature column(s)", report.columns.len()),
        );
        display_correlation(&report, 5);
    }

    // Display summary
    CleaningSummary::from_outcome(&outcome, config.outlier_policy).display();
    print_info(&format!(
        "Finished in {:.2}s",
        started.elapsed().as_secs_f64()
    ));

    // Final completion message
    print_completion();

    Ok(())
}

/// Save the cleaned table as CSV
fn save_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}
