//! Unit tests for dataset loader

use polars::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;
use tidewash::pipeline::{
    get_column_names, load_dataset, normalize_types, CleaningError, LoadOptions, LoadStats,
    PipelineConfig,
};

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,2,3").unwrap();
    writeln!(file, "4,5,6").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, &LoadOptions::default()).unwrap();
    let stats = LoadStats::of(&df);

    assert_eq!(stats.rows, 2, "Should have 2 data rows");
    assert_eq!(stats.columns, 3, "Should have 3 columns");
    assert_eq!(df.get_column_names(), &["a", "b", "c"]);
    assert!(stats.memory_mb >= 0.0, "Memory estimate should be non-negative");
}

#[test]
fn test_load_tab_separated_file() {
    let mut df = create_water_quality_dataframe();
    let (_temp_dir, path) = create_temp_file(&mut df, "water.tsv", b'\t');

    let options = LoadOptions {
        separator: b'\t',
        ..LoadOptions::default()
    };
    let loaded = load_dataset(&path, &options).unwrap();

    assert_eq!(loaded.shape(), (WATER_ROWS, 3));
    assert_eq!(loaded.column("ph").unwrap().null_count(), WATER_MISSING_PH.len());
}

#[test]
fn test_get_column_names_csv() {
    let (_temp_dir, path) = create_temp_text("header.csv", "col_a,col_b,col_c\n1,2,3\n");

    let columns = get_column_names(&path, &LoadOptions::default()).unwrap();

    assert_eq!(columns, vec!["col_a", "col_b", "col_c"]);
}

#[test]
fn test_missing_file_is_source_error() {
    let path = PathBuf::from("/definitely/not/here.csv");

    let err = load_dataset(&path, &LoadOptions::default()).unwrap_err();

    match err {
        CleaningError::SourceRead { path: p, message } => {
            assert_eq!(p, path);
            assert!(message.contains("does not exist"));
        }
        other => panic!("Expected SourceRead, got {:?}", other),
    }
}

#[test]
fn test_unsupported_extension() {
    let (_temp_dir, path) = create_temp_text("data.parquet", "not really parquet");

    let err = load_dataset(&path, &LoadOptions::default()).unwrap_err();

    assert!(matches!(err, CleaningError::SourceRead { .. }));
    assert!(err.to_string().contains("Unsupported file format"));
}

#[test]
fn test_schema_inference_keeps_text_columns() {
    let (_temp_dir, path) = create_temp_text(
        "mixed.csv",
        "amount,city\n1.5,paris\n2.5,rome\n3.5,oslo\n",
    );

    let df = load_dataset(&path, &LoadOptions::default()).unwrap();

    assert_eq!(df.column("amount").unwrap().dtype(), &DataType::Float64);
    assert_eq!(df.column("city").unwrap().dtype(), &DataType::String);
}

#[test]
fn test_bad_cell_past_inference_window_loads() {
    let mut contents = String::from("ph,hardness,is_safe\n");
    for i in 0..10_050 {
        let ph = if i == 10_020 {
            "#NUM!".to_string()
        } else {
            format!("{:.1}", 6.0 + (i % 20) as f64 * 0.1)
        };
        contents.push_str(&format!("{},{},{}\n", ph, 150 + i % 90, i % 2));
    }
    let (_temp_dir, path) = create_temp_text("late_error.csv", &contents);

    let df = load_dataset(&path, &LoadOptions::default()).unwrap();

    assert_eq!(df.height(), 10_050);
    assert_eq!(df.column("ph").unwrap().dtype(), &DataType::String);
    assert_eq!(df.column("hardness").unwrap().dtype(), &DataType::Int64);

    let (normalized, coercions) = normalize_types(df, &PipelineConfig::new("is_safe")).unwrap();
    let ph = coercions.iter().find(|c| c.column == "ph").unwrap();
    assert_eq!(ph.coerced_to_missing, 1);
    assert_eq!(normalized.column("ph").unwrap().null_count(), 1);
}
