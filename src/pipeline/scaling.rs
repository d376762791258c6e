//! Standardization of numeric feature columns to zero mean and unit variance
//!
//! Statistics are population moments (ddof = 0). The fitted parameters are
//! returned so the identical transform can be applied to new rows.

use polars::prelude::*;
use serde::Serialize;

use super::config::ZeroVariancePolicy;
use super::error::CleaningError;
use super::stats::{is_degenerate, mean_std};
use super::table::{numeric_values, put_numeric};

/// Fitted standardization for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnScaler {
    pub column: String,
    pub mean: f64,
    pub std: f64,
    /// Zero-variance column left in original units
    pub skipped: bool,
}

impl ColumnScaler {
    pub fn transform(&self, value: f64) -> f64 {
        if self.skipped {
            value
        } else {
            (value - self.mean) / self.std
        }
    }

    pub fn inverse_transform(&self, value: f64) -> f64 {
        if self.skipped {
            value
        } else {
            value * self.std + self.mean
        }
    }
}

/// Learn mean and standard deviation for each listed column
pub fn fit_scaler(
    df: &DataFrame,
    columns: &[String],
    policy: ZeroVariancePolicy,
) -> Result<Vec<ColumnScaler>, CleaningError> {
    let mut scalers = Vec::with_capacity(columns.len());

    for column in columns {
        let values = numeric_values(df, column)?;
        let Some((mean, std)) = mean_std(&values) else {
            continue;
        };

        let skipped = if is_degenerate(mean, std) {
            match policy {
                ZeroVariancePolicy::Fail => {
                    return Err(CleaningError::DegenerateColumn {
                        column: column.clone(),
                        std,
                    })
                }
                ZeroVariancePolicy::LeaveUnscaled => true,
            }
        } else {
            false
        };

        scalers.push(ColumnScaler {
            column: column.clone(),
            mean,
            std,
            skipped,
        });
    }

    Ok(scalers)
}

/// Apply fitted scalers to a table
pub fn apply_scaler(mut df: DataFrame, scalers: &[ColumnScaler]) -> Result<DataFrame, CleaningError> {
    for scaler in scalers.iter().filter(|s| !s.skipped) {
        let values = numeric_values(&df, &scaler.column)?
            .into_iter()
            .map(|v| v.map(|x| scaler.transform(x)))
            .collect();
        put_numeric(&mut df, &scaler.column, values)?;
    }
    Ok(df)
}

/// Fit on the current table and standardize it
pub fn standardize(
    df: DataFrame,
    columns: &[String],
    policy: ZeroVariancePolicy,
) -> Result<(DataFrame, Vec<ColumnScaler>), CleaningError> {
    let scalers = fit_scaler(&df, columns, policy)?;
    let df = apply_scaler(df, &scalers)?;
    Ok((df, scalers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardized_moments() {
        let df = df! {
            "x" => [2.0f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0],
        }
        .unwrap();

        let (df, scalers) = standardize(df, &["x".to_string()], ZeroVariancePolicy::Fail).unwrap();

        assert!((scalers[0].mean - 5.0).abs() < 1e-12);
        assert!((scalers[0].std - 2.0).abs() < 1e-12);
        let (mean, std) = mean_std(&numeric_values(&df, "x").unwrap()).unwrap();
        assert!(mean.abs() < 1e-9);
        assert!((std - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_column_fails_by_default() {
        let df = df! {
            "c" => [3.0f64, 3.0, 3.0],
        }
        .unwrap();

        let err = standardize(df, &["c".to_string()], ZeroVariancePolicy::Fail).unwrap_err();

        assert!(matches!(err, CleaningError::DegenerateColumn { ref column, .. } if column == "c"));
    }

    #[test]
    fn test_constant_column_left_unscaled_when_configured() {
        let df = df! {
            "c" => [3.0f64, 3.0, 3.0],
        }
        .unwrap();

        let (df, scalers) =
            standardize(df, &["c".to_string()], ZeroVariancePolicy::LeaveUnscaled).unwrap();

        assert!(scalers[0].skipped);
        assert_eq!(
            numeric_values(&df, "c").unwrap(),
            vec![Some(3.0), Some(3.0), Some(3.0)]
        );
    }

    #[test]
    fn test_tiny_scale_column_is_standardized() {
        let df = df! {
            "tiny" => [1e-20f64, 3e-20],
        }
        .unwrap();

        let (df, scalers) =
            standardize(df, &["tiny".to_string()], ZeroVariancePolicy::Fail).unwrap();

        assert!(!scalers[0].skipped);
        let values = numeric_values(&df, "tiny").unwrap();
        assert!((values[0].unwrap() + 1.0).abs() < 1e-9);
        assert!((values[1].unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_inverse_transform_recovers_value() {
        let scaler = ColumnScaler {
            column: "x".to_string(),
            mean: 10.0,
            std: 2.5,
            skipped: false,
        };
        let scaled = scaler.transform(15.0);
        assert_eq!(scaled, 2.0);
        assert!((scaler.inverse_transform(scaled) - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_to_new_rows_uses_fitted_state() {
        let train = df! { "x" => [1.0f64, 2.0, 3.0] }.unwrap();
        let fresh = df! { "x" => [2.0f64, 10.0] }.unwrap();

        let scalers = fit_scaler(&train, &["x".to_string()], ZeroVariancePolicy::Fail).unwrap();
        let scaled = apply_scaler(fresh, &scalers).unwrap();

        let values = numeric_values(&scaled, "x").unwrap();
        assert!(values[0].unwrap().abs() < 1e-12);
        assert!(values[1].unwrap() > 0.0);
    }
}
