//! Payback month detection and current ROI.

use super::cumulative::CumulativeSeries;
use crate::report::schema::MonthlyPaybackPoint;
use crate::utils::config::PAYBACK_THRESHOLD_PCT;

/// Threshold findings for one cohort
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaybackSummary {
    pub deposit_payback_month: Option<u32>,
    pub revenue_payback_month: Option<u32>,
    pub current_roi: f64,
}

/// First offset whose percentage reaches the payback threshold
///
/// **Public** - applied separately to deposits and net revenue
///
/// # Arguments
/// * `points` - Points in ascending offset order
/// * `pct` - Selects the percentage to test from each point
///
/// # Returns
/// The earliest qualifying offset, or `None` when the observed range never
/// reaches 100% (future payback is never assumed)
pub fn first_crossing<F>(points: &[MonthlyPaybackPoint], pct: F) -> Option<u32>
where
    F: Fn(&MonthlyPaybackPoint) -> f64,
{
    points
        .iter()
        .find(|point| pct(point) >= PAYBACK_THRESHOLD_PCT)
        .map(|point| point.month_offset)
}

/// Net revenue over spend, minus one, at the latest point
pub fn current_roi(points: &[MonthlyPaybackPoint], acquisition_spend: f64) -> f64 {
    // Analyzable cohorts always have an offset-0 point
    let net_revenue = points.last().map_or(0.0, |p| p.cumulative_net_revenue);
    net_revenue / acquisition_spend - 1.0
}

/// Detect payback months and ROI for a cohort
///
/// **Public** - main entry point for detection
pub fn detect_payback(series: &CumulativeSeries) -> PaybackSummary {
    PaybackSummary {
        deposit_payback_month: first_crossing(&series.points, |p| p.deposit_payback_pct),
        revenue_payback_month: first_crossing(&series.points, |p| p.revenue_payback_pct),
        current_roi: current_roi(&series.points, series.acquisition_spend),
    }
}
