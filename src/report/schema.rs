//! Output schema definitions for payback results.
//!
//! `PaybackAnalysis` is the pure engine output. `PaybackReport` wraps it with
//! a schema version and generation timestamp for the JSON files we write to disk.

use crate::parser::schema::DroppedRow;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cumulative position of one cohort at one month offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPaybackPoint {
    pub month_offset: u32,

    /// Sum of deposits for all present offsets up to and including this one
    pub cumulative_deposits: f64,

    /// Sum of net revenue for all present offsets up to and including this one
    pub cumulative_net_revenue: f64,

    /// `cumulative_deposits / acquisition_spend * 100`
    pub deposit_payback_pct: f64,

    /// `cumulative_net_revenue / acquisition_spend * 100`
    pub revenue_payback_pct: f64,
}

/// Payback curve and summary figures for one analyzable cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortPaybackResult {
    pub cohort_key: String,
    pub acquisition_spend: f64,

    /// Points in ascending `month_offset` order, up to the cohort's latest offset
    pub points: Vec<MonthlyPaybackPoint>,

    /// First offset where deposits reach 100% of spend
    pub deposit_payback_month: Option<u32>,

    /// First offset where net revenue reaches 100% of spend
    pub revenue_payback_month: Option<u32>,

    /// Net revenue over spend minus one, at the latest observed offset
    pub current_roi: f64,
}

impl CohortPaybackResult {
    /// Latest offset the cohort has data for (its maturity)
    pub fn latest_offset(&self) -> Option<u32> {
        self.points.last().map(|p| p.month_offset)
    }
}

/// Cross-cohort average at one month offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub month_offset: u32,
    pub avg_deposit_payback_pct: f64,
    pub avg_revenue_payback_pct: f64,

    /// Number of cohorts that reached this offset and were averaged
    pub cohort_count: usize,
}

/// Why a cohort produced no payback result
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    #[error("no acquisition spend recorded at month offset 0")]
    MissingSpend,

    #[error("acquisition spend is not positive: {0}")]
    NonPositiveSpend(f64),
}

/// A cohort left out of payback analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedCohort {
    pub cohort_key: String,
    pub reason: SkipReason,
}

/// A (cohort, offset) pair that appeared more than once in the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateOffset {
    pub cohort_key: String,
    pub month_offset: u32,
}

/// Data quality notes collected while analyzing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Rows handed to the engine
    pub rows_received: usize,

    /// Rows that survived normalization and the cohort range
    pub rows_accepted: usize,

    /// Valid rows whose cohort fell outside the requested range
    #[serde(default)]
    pub rows_out_of_range: usize,

    pub dropped_rows: Vec<DroppedRow>,

    /// Overwritten duplicates, later rows win
    pub duplicate_offsets: Vec<DuplicateOffset>,

    pub skipped_cohorts: Vec<SkippedCohort>,
}

/// Complete engine output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaybackAnalysis {
    /// Analyzable cohorts, ascending by `cohort_key`
    pub cohorts: Vec<CohortPaybackResult>,

    /// Averaged timeline, ascending by `month_offset`
    pub timeline: Vec<TimelinePoint>,

    pub diagnostics: Diagnostics,
}

impl PaybackAnalysis {
    /// Location of the first NaN or infinite value, if any
    ///
    /// JSON has no encoding for these, serde_json would write `null` and the
    /// report could not be read back.
    pub fn first_non_finite(&self) -> Option<String> {
        for cohort in &self.cohorts {
            let key = &cohort.cohort_key;
            if !cohort.acquisition_spend.is_finite() {
                return Some(format!("cohort {} acquisition_spend", key));
            }
            if !cohort.current_roi.is_finite() {
                return Some(format!("cohort {} current_roi", key));
            }
            for point in &cohort.points {
                let fields = [
                    ("cumulative_deposits", point.cumulative_deposits),
                    ("cumulative_net_revenue", point.cumulative_net_revenue),
                    ("deposit_payback_pct", point.deposit_payback_pct),
                    ("revenue_payback_pct", point.revenue_payback_pct),
                ];
                if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
                    return Some(format!("cohort {} month {} {}", key, point.month_offset, name));
                }
            }
        }

        self.timeline
            .iter()
            .find(|t| !t.avg_deposit_payback_pct.is_finite() || !t.avg_revenue_payback_pct.is_finite())
            .map(|t| format!("timeline month {}", t.month_offset))
    }
}

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaybackReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    #[serde(flatten)]
    pub analysis: PaybackAnalysis,
}
