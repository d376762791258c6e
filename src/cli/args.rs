//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::pipeline::{
    LoadOptions, OutlierPolicy, PipelineConfig, TypePolicy, ZeroVariancePolicy,
};

/// Tidewash - Clean a raw tabular dataset into a model-ready table
#[derive(Parser, Debug)]
#[command(name = "tidewash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV, TSV or TXT with a header row)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Target column name (imputed and encoded, never capped, filtered or scaled)
    #[arg(short, long)]
    pub target: String,

    /// Output directory for the cleaned table.
    /// Defaults to '<input_stem>_preprocessed' next to the input file.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Columns excluded from outlier handling and scaling (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Outlier policy: "cap" (clamp into IQR fences, default) or "filter" (drop rows)
    #[arg(long, default_value = "cap")]
    pub outlier_policy: String,

    /// Type policy: "numeric" (coerce every column, default) or "declared"
    /// (text columns stay categorical)
    #[arg(long, default_value = "numeric")]
    pub type_policy: String,

    /// Columns forced to categorical (comma-separated). Requires --type-policy declared.
    #[arg(long, value_delimiter = ',')]
    pub categorical: Vec<String>,

    /// Numeric column to bin into low/medium/high on its original scale.
    /// Adds '<col>_original' and '<col>_bin' to the output.
    #[arg(long)]
    pub bin_column: Option<String>,

    /// Zero-variance handling at scaling: "fail" (default) or "skip"
    #[arg(long, default_value = "fail")]
    pub zero_variance: String,

    /// Field separator of the input file (single ASCII character; use '\t' for tabs)
    #[arg(long, default_value = ",", value_parser = validate_separator)]
    pub separator: u8,

    /// Number of rows to use for schema inference.
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Also write the fitted state and transformation log as JSON
    #[arg(long, default_value = "false")]
    pub export_fitted: bool,

    /// Skip the correlation summary of the cleaned features
    #[arg(long, default_value = "false")]
    pub no_correlation: bool,
}

impl Cli {
    /// Output directory, derived from the input if not explicitly provided.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            let parent = self.input.parent().unwrap_or_else(|| Path::new("."));
            parent.join(format!("{}_preprocessed", self.input_stem()))
        })
    }

    pub fn input_stem(&self) -> &str {
        self.input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output")
    }

    /// Path of the cleaned CSV for a run started at `timestamp`
    pub fn output_file(&self, timestamp: &str) -> PathBuf {
        self.output_dir()
            .join(format!("{}_preprocessed_{}.csv", self.input_stem(), timestamp))
    }

    /// Path of the fitted-state JSON for a run started at `timestamp`
    pub fn fitted_path(&self, timestamp: &str) -> PathBuf {
        self.output_dir()
            .join(format!("{}_fitted_{}.json", self.input_stem(), timestamp))
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            separator: self.separator,
            infer_schema_length: self.infer_schema_length,
        }
    }

    /// Parse the string policy options into a pipeline configuration
    pub fn to_config(&self) -> Result<PipelineConfig, String> {
        let outlier_policy: OutlierPolicy = self.outlier_policy.parse()?;
        let type_policy: TypePolicy = self.type_policy.parse()?;
        let zero_variance: ZeroVariancePolicy = self.zero_variance.parse()?;

        let mut config = PipelineConfig::new(self.target.trim())
            .with_exclusions(trimmed(&self.exclude))
            .with_outlier_policy(outlier_policy)
            .with_type_policy(type_policy)
            .with_categorical_columns(trimmed(&self.categorical))
            .with_zero_variance(zero_variance);

        if let Some(column) = &self.bin_column {
            config = config.with_bin_column(column.trim());
        }

        Ok(config)
    }
}

fn trimmed(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Validator for the separator parameter
fn validate_separator(s: &str) -> Result<u8, String> {
    let separator = match s {
        "\\t" | "tab" => "\t",
        other => other,
    };

    match separator.as_bytes() {
        [byte] if byte.is_ascii() && *byte != b'"' && *byte != b'\n' => Ok(*byte),
        _ => Err(format!(
            "separator must be a single ASCII character, got '{}'",
            s
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_separator() {
        assert_eq!(validate_separator(",").unwrap(), b',');
        assert_eq!(validate_separator("\\t").unwrap(), b'\t');
        assert_eq!(validate_separator("tab").unwrap(), b'\t');
        assert!(validate_separator(";;").is_err());
        assert!(validate_separator("\"").is_err());
        assert!(validate_separator("").is_err());
    }

    #[test]
    fn test_trimmed_drops_empty_entries() {
        let values = vec![" a ".to_string(), "".to_string(), "b".to_string()];
        assert_eq!(trimmed(&values), vec!["a", "b"]);
    }
}
