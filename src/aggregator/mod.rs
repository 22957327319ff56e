//! Aggregation of normalized records into payback curves.
//!
//! This module transforms records into:
//! - Cohorts indexed by month offset (grouper)
//! - Cumulative deposit/revenue series with payback percentages (cumulative)
//! - Payback months and current ROI (payback)
//! - A cross-cohort averaged timeline (timeline)

pub mod cumulative;
pub mod grouper;
pub mod payback;
pub mod timeline;

// Re-export main types and functions
pub use cumulative::{build_all_series, build_cumulative_series, usable_spend, CumulativeSeries};
pub use grouper::{group_by_cohort, CohortIndex, CohortSeries, MonthlyMetrics};
pub use payback::{current_roi, detect_payback, first_crossing, PaybackSummary};
pub use timeline::average_timeline;
