//! Cross-cohort averaged payback timeline.
//!
//! Each offset averages only the cohorts that have a point there. Young
//! cohorts that have not reached an offset are left out rather than counted
//! as zero, otherwise later offsets would be dragged down as newer cohorts
//! drop out of the sample.

use super::cumulative::CumulativeSeries;
use crate::report::schema::TimelinePoint;
use log::debug;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy)]
struct OffsetAccumulator {
    deposit_pct_sum: f64,
    revenue_pct_sum: f64,
    count: usize,
}

impl OffsetAccumulator {
    fn to_point(self, month_offset: u32) -> TimelinePoint {
        // No contributing cohorts: emit zeros so the x-axis stays contiguous
        if self.count == 0 {
            return TimelinePoint {
                month_offset,
                avg_deposit_payback_pct: 0.0,
                avg_revenue_payback_pct: 0.0,
                cohort_count: 0,
            };
        }

        let count = self.count as f64;
        TimelinePoint {
            month_offset,
            avg_deposit_payback_pct: self.deposit_pct_sum / count,
            avg_revenue_payback_pct: self.revenue_pct_sum / count,
            cohort_count: self.count,
        }
    }
}

/// Average payback percentages per offset across cohorts
///
/// **Public** - main entry point for the timeline
///
/// # Arguments
/// * `series` - Analyzed cohorts, in ascending cohort order
/// * `global_offsets` - Every offset observed in the input
///
/// # Returns
/// One point per global offset, in ascending order
pub fn average_timeline(series: &[CumulativeSeries], global_offsets: &[u32]) -> Vec<TimelinePoint> {
    let mut accumulators: BTreeMap<u32, OffsetAccumulator> = global_offsets
        .iter()
        .map(|offset| (*offset, OffsetAccumulator::default()))
        .collect();

    for cohort in series {
        for point in &cohort.points {
            let acc = accumulators.entry(point.month_offset).or_default();
            acc.deposit_pct_sum += point.deposit_payback_pct;
            acc.revenue_pct_sum += point.revenue_payback_pct;
            acc.count += 1;
        }
    }

    debug!(
        "Averaged {} cohorts into {} timeline points",
        series.len(),
        accumulators.len()
    );

    accumulators
        .into_iter()
        .map(|(offset, acc)| acc.to_point(offset))
        .collect()
}
