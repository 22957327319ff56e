//! Cumulative aggregation of deposits and net revenue per cohort.
//!
//! Every analyzable cohort gets one point per global month offset, from 0 up
//! to its own latest observed offset. Offsets the cohort has no record for
//! contribute nothing (no interpolation), they simply carry the running total
//! forward. That keeps all cohorts aligned on the same offsets for the
//! timeline averager.

use super::grouper::{CohortIndex, CohortSeries};
use crate::report::schema::{MonthlyPaybackPoint, SkipReason, SkippedCohort};
use log::debug;

/// Payback curve of one cohort before threshold detection
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeSeries {
    pub cohort_key: String,
    pub acquisition_spend: f64,
    pub points: Vec<MonthlyPaybackPoint>,
}

/// Check whether a cohort has spend we can divide by
///
/// **Public** - shared by aggregation and diagnostics
///
/// # Errors
/// * `SkipReason::MissingSpend` - No spend on the offset-0 record (or no offset-0 record)
/// * `SkipReason::NonPositiveSpend` - Spend recorded but zero or negative
pub fn usable_spend(series: &CohortSeries) -> Result<f64, SkipReason> {
    match series.acquisition_spend() {
        None => Err(SkipReason::MissingSpend),
        Some(spend) if spend > 0.0 && spend.is_finite() => Ok(spend),
        Some(spend) => Err(SkipReason::NonPositiveSpend(spend)),
    }
}

/// Percentage of spend recovered by a cumulative amount
pub fn payback_pct(cumulative: f64, spend: f64) -> f64 {
    cumulative / spend * 100.0
}

/// Build the cumulative series for a single cohort
///
/// **Public** - per-cohort step, safe to run for cohorts independently
///
/// # Arguments
/// * `series` - The cohort's months
/// * `global_offsets` - Sorted offsets observed across all cohorts
///
/// # Errors
/// Returns the `SkipReason` when the cohort has no usable spend
pub fn build_cumulative_series(
    series: &CohortSeries,
    global_offsets: &[u32],
) -> Result<CumulativeSeries, SkipReason> {
    let spend = usable_spend(series)?;

    // Usable spend lives on the offset-0 month, so the cohort has at least one month
    let latest = series.max_offset().unwrap_or(0);

    let mut cumulative_deposits = 0.0;
    let mut cumulative_net_revenue = 0.0;

    let points = global_offsets
        .iter()
        .copied()
        .take_while(|offset| *offset <= latest)
        .map(|offset| {
            if let Some(month) = series.months.get(&offset) {
                cumulative_deposits += month.deposit_amount;
                cumulative_net_revenue += month.net_revenue;
            }

            MonthlyPaybackPoint {
                month_offset: offset,
                cumulative_deposits,
                cumulative_net_revenue,
                deposit_payback_pct: payback_pct(cumulative_deposits, spend),
                revenue_payback_pct: payback_pct(cumulative_net_revenue, spend),
            }
        })
        .collect();

    Ok(CumulativeSeries {
        cohort_key: series.cohort_key.clone(),
        acquisition_spend: spend,
        points,
    })
}

/// Build cumulative series for every cohort in the index
///
/// **Public** - main entry point for aggregation
///
/// # Returns
/// Analyzable series in ascending cohort order, and the cohorts that were
/// skipped for lack of usable spend
pub fn build_all_series(index: &CohortIndex) -> (Vec<CumulativeSeries>, Vec<SkippedCohort>) {
    let global_offsets = index.global_offsets();
    let mut analyzed = Vec::with_capacity(index.len());
    let mut skipped = Vec::new();

    for series in index.iter() {
        match build_cumulative_series(series, &global_offsets) {
            Ok(cumulative) => analyzed.push(cumulative),
            Err(reason) => {
                debug!("Skipping cohort {}: {}", series.cohort_key, reason);
                skipped.push(SkippedCohort {
                    cohort_key: series.cohort_key.clone(),
                    reason,
                });
            }
        }
    }

    debug!(
        "Aggregated {} cohorts over {} offsets ({} skipped)",
        analyzed.len(),
        global_offsets.len(),
        skipped.len()
    );

    (analyzed, skipped)
}
