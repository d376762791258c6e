//! Pipeline configuration and policy choices
//!
//! Each policy is chosen once for a run. They parse from the lowercase names
//! used on the command line and serialize with the same names.

use serde::{Deserialize, Serialize};

/// How out-of-range values are enforced by the outlier suppressor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierPolicy {
    /// Clamp values into the IQR fences; row count is preserved
    #[default]
    Cap,
    /// Drop rows outside the fences, column by column
    Filter,
}

impl std::fmt::Display for OutlierPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutlierPolicy::Cap => write!(f, "cap"),
            OutlierPolicy::Filter => write!(f, "filter"),
        }
    }
}

impl std::str::FromStr for OutlierPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cap" | "clip" => Ok(OutlierPolicy::Cap),
            "filter" | "drop" => Ok(OutlierPolicy::Filter),
            _ => Err(format!("Unknown outlier policy: '{}'. Use 'cap' or 'filter'.", s)),
        }
    }
}

/// How column kinds are decided by the type normalizer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypePolicy {
    /// Every column is coerced to numeric; unparseable cells become missing
    #[default]
    CoerceAllNumeric,
    /// Numeric columns stay numeric, text columns stay categorical
    DeclaredKinds,
}

impl std::fmt::Display for TypePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypePolicy::CoerceAllNumeric => write!(f, "numeric"),
            TypePolicy::DeclaredKinds => write!(f, "declared"),
        }
    }
}

impl std::str::FromStr for TypePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "numeric" | "coerce_all_numeric" => Ok(TypePolicy::CoerceAllNumeric),
            "declared" | "declared_kinds" => Ok(TypePolicy::DeclaredKinds),
            _ => Err(format!("Unknown type policy: '{}'. Use 'numeric' or 'declared'.", s)),
        }
    }
}

/// What the scaler does with a zero-variance column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroVariancePolicy {
    /// Abort with a degenerate-column error
    #[default]
    Fail,
    /// Leave the column in its original units and record it as skipped
    LeaveUnscaled,
}

impl std::fmt::Display for ZeroVariancePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZeroVariancePolicy::Fail => write!(f, "fail"),
            ZeroVariancePolicy::LeaveUnscaled => write!(f, "skip"),
        }
    }
}

impl std::str::FromStr for ZeroVariancePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(ZeroVariancePolicy::Fail),
            "skip" | "leave_unscaled" => Ok(ZeroVariancePolicy::LeaveUnscaled),
            _ => Err(format!("Unknown zero-variance policy: '{}'. Use 'fail' or 'skip'.", s)),
        }
    }
}

/// Options recognized by the pipeline driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Target column; never capped, filtered or scaled
    pub target_column: String,
    /// Columns that must not be altered by outlier handling or scaling
    #[serde(default)]
    pub exclusion_columns: Vec<String>,
    #[serde(default)]
    pub outlier_policy: OutlierPolicy,
    #[serde(default)]
    pub type_policy: TypePolicy,
    /// Numeric column to bin into low/medium/high, if any
    #[serde(default)]
    pub bin_target_column: Option<String>,
    /// Columns forced to categorical under `TypePolicy::DeclaredKinds`
    #[serde(default)]
    pub categorical_columns: Vec<String>,
    #[serde(default)]
    pub zero_variance: ZeroVariancePolicy,
}

impl PipelineConfig {
    pub fn new(target_column: impl Into<String>) -> Self {
        Self {
            target_column: target_column.into(),
            exclusion_columns: Vec::new(),
            outlier_policy: OutlierPolicy::default(),
            type_policy: TypePolicy::default(),
            bin_target_column: None,
            categorical_columns: Vec::new(),
            zero_variance: ZeroVariancePolicy::default(),
        }
    }

    pub fn with_exclusions<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for column in columns {
            let column = column.into();
            if !self.exclusion_columns.contains(&column) {
                self.exclusion_columns.push(column);
            }
        }
        self
    }

    pub fn with_outlier_policy(mut self, policy: OutlierPolicy) -> Self {
        self.outlier_policy = policy;
        self
    }

    pub fn with_type_policy(mut self, policy: TypePolicy) -> Self {
        self.type_policy = policy;
        self
    }

    pub fn with_bin_column(mut self, column: impl Into<String>) -> Self {
        self.bin_target_column = Some(column.into());
        self
    }

    pub fn with_categorical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_zero_variance(mut self, policy: ZeroVariancePolicy) -> Self {
        self.zero_variance = policy;
        self
    }

    /// True for the target and every configured exclusion
    pub fn is_protected(&self, column: &str) -> bool {
        column == self.target_column || self.exclusion_columns.iter().any(|c| c == column)
    }

    /// Name of the preserved original-scale copy of the bin column
    pub fn preserved_column(&self) -> Option<String> {
        self.bin_target_column
            .as_ref()
            .map(|c| format!("{}_original", c))
    }

    /// Name of the bucket label column
    pub fn bin_label_column(&self) -> Option<String> {
        self.bin_target_column.as_ref().map(|c| format!("{}_bin", c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outlier_policy_from_str() {
        assert_eq!("cap".parse::<OutlierPolicy>().unwrap(), OutlierPolicy::Cap);
        assert_eq!("FILTER".parse::<OutlierPolicy>().unwrap(), OutlierPolicy::Filter);
        assert!("winsorize".parse::<OutlierPolicy>().is_err());
    }

    #[test]
    fn test_type_policy_display_round_trips() {
        for policy in [TypePolicy::CoerceAllNumeric, TypePolicy::DeclaredKinds] {
            assert_eq!(policy.to_string().parse::<TypePolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_zero_variance_from_str() {
        assert_eq!(
            "skip".parse::<ZeroVariancePolicy>().unwrap(),
            ZeroVariancePolicy::LeaveUnscaled
        );
        assert!("ignore".parse::<ZeroVariancePolicy>().is_err());
    }

    #[test]
    fn test_protected_columns() {
        let config = PipelineConfig::new("is_safe").with_exclusions(["count"]);
        assert!(config.is_protected("is_safe"));
        assert!(config.is_protected("count"));
        assert!(!config.is_protected("ph"));
    }

    #[test]
    fn test_exclusions_are_deduplicated() {
        let config = PipelineConfig::new("t").with_exclusions(["a", "b", "a"]);
        assert_eq!(config.exclusion_columns, vec!["a", "b"]);
    }

    #[test]
    fn test_derived_bin_column_names() {
        let config = PipelineConfig::new("t").with_bin_column("hardness");
        assert_eq!(config.preserved_column().as_deref(), Some("hardness_original"));
        assert_eq!(config.bin_label_column().as_deref(), Some("hardness_bin"));
        assert_eq!(PipelineConfig::new("t").preserved_column(), None);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"target_column": "is_safe", "outlier_policy": "filter"}"#)
                .unwrap();
        assert_eq!(config.outlier_policy, OutlierPolicy::Filter);
        assert_eq!(config.type_policy, TypePolicy::CoerceAllNumeric);
        assert!(config.exclusion_columns.is_empty());
    }
}
