//! Configuration and constants for the engine and CLI.
//!
//! Constants cover the report schema and the default field aliases accepted
//! on input rows. An optional TOML file can override the aliases, restrict
//! the analysed cohort range and tune the terminal summary.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Payback percentage at which spend counts as recovered (inclusive)
pub const PAYBACK_THRESHOLD_PCT: f64 = 100.0;

/// Default number of timeline rows printed by the terminal summary
pub const DEFAULT_SUMMARY_ROWS: usize = 24;

// Field names accepted on raw rows (export tools disagree on casing and naming)
pub const COHORT_KEY_FIELD_NAMES: &[&str] = &["cohort_key", "cohortKey", "cohort", "cohort_month"];
pub const MONTH_OFFSET_FIELD_NAMES: &[&str] = &[
    "month_offset",
    "monthOffset",
    "month",
    "months_since_acquisition",
];
pub const DEPOSIT_FIELD_NAMES: &[&str] = &["deposit_amount", "depositAmount", "deposits"];
pub const NET_REVENUE_FIELD_NAMES: &[&str] = &["net_revenue", "netRevenue", "ngr", "NGR"];
pub const SPEND_FIELD_NAMES: &[&str] = &[
    "acquisition_spend",
    "acquisitionSpend",
    "marketing_spend",
    "spend",
];

// Keys under which an input document may wrap its row array
pub const ROW_CONTAINER_NAMES: &[&str] = &["records", "rows", "data", "items"];

fn to_owned_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Accepted aliases per record field, tried in order
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldMap {
    pub cohort_key: Vec<String>,
    pub month_offset: Vec<String>,
    pub deposit_amount: Vec<String>,
    pub net_revenue: Vec<String>,
    pub acquisition_spend: Vec<String>,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            cohort_key: to_owned_names(COHORT_KEY_FIELD_NAMES),
            month_offset: to_owned_names(MONTH_OFFSET_FIELD_NAMES),
            deposit_amount: to_owned_names(DEPOSIT_FIELD_NAMES),
            net_revenue: to_owned_names(NET_REVENUE_FIELD_NAMES),
            acquisition_spend: to_owned_names(SPEND_FIELD_NAMES),
        }
    }
}

impl FieldMap {
    fn validate(&self) -> Result<(), ConfigError> {
        let lists = [
            ("cohort_key", &self.cohort_key),
            ("month_offset", &self.month_offset),
            ("deposit_amount", &self.deposit_amount),
            ("net_revenue", &self.net_revenue),
            ("acquisition_spend", &self.acquisition_spend),
        ];

        for (field, aliases) in lists {
            if aliases.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "fields.{} must list at least one name",
                    field
                )));
            }
        }

        Ok(())
    }
}

/// Inclusive cohort key range, compared lexicographically
///
/// Cohort keys sort chronologically by construction ("2023-01" < "2023-02"),
/// so a lexicographic range doubles as a date range.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CohortRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl CohortRange {
    pub fn new(from: Option<String>, to: Option<String>) -> Self {
        Self { from, to }
    }

    /// True when neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Check whether a cohort key falls inside the range
    pub fn contains(&self, cohort_key: &str) -> bool {
        let after_start = self.from.as_deref().map_or(true, |from| cohort_key >= from);
        let before_end = self.to.as_deref().map_or(true, |to| cohort_key <= to);
        after_start && before_end
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let (Some(from), Some(to)) = (&self.from, &self.to) {
            if from > to {
                return Err(ConfigError::Invalid(format!(
                    "cohort range is empty: from '{}' is after to '{}'",
                    from, to
                )));
            }
        }
        Ok(())
    }
}

/// Terminal summary settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Maximum timeline rows printed by the summary
    pub summary_rows: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            summary_rows: DEFAULT_SUMMARY_ROWS,
        }
    }
}

/// Complete configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub fields: FieldMap,
    pub filter: CohortRange,
    pub output: OutputSettings,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fields.validate()?;
        self.filter.validate()?;

        if self.output.summary_rows == 0 {
            return Err(ConfigError::Invalid(
                "output.summary_rows must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Load configuration from a TOML file
///
/// Missing sections fall back to their defaults.
///
/// # Errors
/// * `ConfigError::ReadFailed` - If file cannot be read
/// * `ConfigError::TomlParseFailed` - If TOML is invalid
/// * `ConfigError::Invalid` - If values are inconsistent
///
/// # Example
/// ```ignore
/// let config = load_config("payback.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: AnalysisConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
