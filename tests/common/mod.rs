//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Rows in the water-quality fixture, duplicates included
pub const WATER_ROWS: usize = 100;
/// Exact-duplicate rows appended to the fixture
pub const WATER_DUPLICATES: usize = 5;
/// Rows with a missing `ph`
pub const WATER_MISSING_PH: [usize; 3] = [20, 40, 60];

/// Create the water-quality fixture: `ph`, `hardness` and the binary target
/// `is_safe`. 95 unique rows followed by exact copies of rows 10..15. Three
/// unique rows have no `ph`. A few hardness values are far out of range.
pub fn create_water_quality_dataframe() -> DataFrame {
    let mut rng = StdRng::seed_from_u64(42);
    let unique = WATER_ROWS - WATER_DUPLICATES;

    let mut ph: Vec<Option<f64>> = (0..unique).map(|_| Some(rng.gen_range(5.5..9.0))).collect();
    let mut hardness: Vec<f64> = (0..unique).map(|_| rng.gen_range(120.0..260.0)).collect();
    let mut is_safe: Vec<i64> = (0..unique).map(|_| rng.gen_range(0..2)).collect();

    hardness[3] = 900.0;
    hardness[77] = 5.0;
    for row in WATER_MISSING_PH {
        ph[row] = None;
    }

    for row in 10..10 + WATER_DUPLICATES {
        ph.push(ph[row]);
        hardness.push(hardness[row]);
        is_safe.push(is_safe[row]);
    }

    df! {
        "ph" => ph,
        "hardness" => hardness,
        "is_safe" => is_safe,
    }
    .unwrap()
}

/// Create a table mixing numeric, text and numeric-looking text columns
pub fn create_mixed_dataframe() -> DataFrame {
    df! {
        "amount" => [10.0f64, 12.0, 11.0, 13.0, 12.5, 11.5, 10.5, 12.0],
        "reading" => ["1.5", "2.0", "n/a", "2.5", " 3.0 ", "2.2", "1.8", "2.1"],
        "city" => [Some("paris"), Some("rome"), Some("paris"), None, Some("oslo"), Some("rome"), Some("paris"), Some("oslo")],
        "label" => ["yes", "no", "yes", "no", "yes", "no", "yes", "no"],
    }
    .unwrap()
}

/// Create a larger random DataFrame for performance tests
pub fn create_large_test_dataframe(rows: usize, cols: usize) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(7);

    let mut columns: Vec<Column> = Vec::with_capacity(cols + 1);

    let target: Vec<i64> = (0..rows).map(|_| rng.gen_range(0..2)).collect();
    columns.push(Column::new("target".into(), target));

    for i in 0..cols {
        let values: Vec<Option<f64>> = (0..rows)
            .map(|_| {
                if rng.gen_bool(0.02) {
                    None
                } else {
                    Some(rng.gen::<f64>() * 100.0)
                }
            })
            .collect();
        columns.push(Column::new(format!("feature_{}", i).into(), values));
    }

    DataFrame::new(columns).unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    create_temp_file(df, "test_data.csv", b',')
}

/// Create a temporary directory holding `df` written with `separator`
pub fn create_temp_file(df: &mut DataFrame, name: &str, separator: u8) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);

    let mut file = std::fs::File::create(&path).unwrap();
    CsvWriter::new(&mut file)
        .with_separator(separator)
        .finish(df)
        .unwrap();

    (temp_dir, path)
}

/// Create a temporary directory with a file holding raw text
pub fn create_temp_text(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

/// Present values of a float column
pub fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Population mean and standard deviation of the present values
pub fn moments(values: &[Option<f64>]) -> (f64, f64) {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let var = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}
