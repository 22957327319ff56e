//! Typed record schema produced by the normalizer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One cohort's metrics for a single month offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Acquisition period token (e.g. "2023-01"), sorts chronologically
    pub cohort_key: String,

    /// Months elapsed since acquisition, 0 = acquisition month
    pub month_offset: u32,

    /// Deposits attributable to the cohort in this month (never negative)
    pub deposit_amount: f64,

    /// Net gaming revenue for this month, may be negative
    pub net_revenue: f64,

    /// Marketing spend for the cohort, only meaningful at offset 0.
    /// `None` means no spend was recorded, which is not the same as zero.
    pub acquisition_spend: Option<f64>,
}

impl MetricRecord {
    pub fn new(
        cohort_key: impl Into<String>,
        month_offset: u32,
        deposit_amount: f64,
        net_revenue: f64,
        acquisition_spend: Option<f64>,
    ) -> Self {
        Self {
            cohort_key: cohort_key.into(),
            month_offset,
            deposit_amount,
            net_revenue,
            acquisition_spend,
        }
    }
}

/// Reason a raw row was dropped during normalization
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowIssue {
    #[error("row is not a JSON object")]
    NotAnObject,

    #[error("missing cohort key")]
    MissingCohortKey,

    #[error("missing month offset")]
    MissingMonthOffset,

    #[error("month offset is not a non-negative integer: {0}")]
    InvalidMonthOffset(String),

    #[error("negative deposit amount: {0}")]
    NegativeDeposit(f64),
}

/// A dropped row and where it sat in the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedRow {
    /// Zero-based position in the input sequence
    pub index: usize,
    pub reason: RowIssue,
}
