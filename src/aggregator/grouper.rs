//! Cohort grouping.
//!
//! Partitions normalized records by cohort key and indexes each cohort by
//! month offset. Both levels use `BTreeMap` so iteration is already in
//! ascending key/offset order.
//!
//! Duplicate `(cohort, offset)` pairs resolve last-write-wins. Duplicates
//! should not happen upstream, so summing them would only hide a data bug;
//! each overwrite is reported instead.

use crate::parser::schema::MetricRecord;
use crate::report::schema::DuplicateOffset;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

/// Metrics for one cohort at one offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyMetrics {
    pub deposit_amount: f64,
    pub net_revenue: f64,
    pub acquisition_spend: Option<f64>,
}

impl From<&MetricRecord> for MonthlyMetrics {
    fn from(record: &MetricRecord) -> Self {
        Self {
            deposit_amount: record.deposit_amount,
            net_revenue: record.net_revenue,
            acquisition_spend: record.acquisition_spend,
        }
    }
}

/// All months of a single cohort
#[derive(Debug, Clone, PartialEq)]
pub struct CohortSeries {
    pub cohort_key: String,
    pub months: BTreeMap<u32, MonthlyMetrics>,
}

impl CohortSeries {
    pub fn new(cohort_key: impl Into<String>) -> Self {
        Self {
            cohort_key: cohort_key.into(),
            months: BTreeMap::new(),
        }
    }

    /// Spend recorded on the offset-0 month, spend on later months is ignored
    pub fn acquisition_spend(&self) -> Option<f64> {
        self.months.get(&0).and_then(|m| m.acquisition_spend)
    }

    /// Latest offset observed for this cohort
    pub fn max_offset(&self) -> Option<u32> {
        self.months.keys().next_back().copied()
    }
}

/// Cohorts keyed and ordered by cohort key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CohortIndex {
    pub cohorts: BTreeMap<String, CohortSeries>,

    /// Overwritten duplicates, in the order they were encountered
    pub duplicates: Vec<DuplicateOffset>,
}

impl CohortIndex {
    pub fn len(&self) -> usize {
        self.cohorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }

    /// Iterate cohorts in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = &CohortSeries> {
        self.cohorts.values()
    }

    /// Sorted set of offsets observed across every cohort
    ///
    /// Includes cohorts that cannot be analyzed, so every analyzed series is
    /// aligned on the same x-axis.
    pub fn global_offsets(&self) -> Vec<u32> {
        self.cohorts
            .values()
            .flat_map(|series| series.months.keys().copied())
            .collect::<BTreeSet<u32>>()
            .into_iter()
            .collect()
    }
}

/// Group records by cohort key and month offset
///
/// **Public** - main entry point for grouping
///
/// # Arguments
/// * `records` - Normalized records, in input order
///
/// # Returns
/// Ordered cohort index; later records replace earlier ones at the same offset
pub fn group_by_cohort(records: &[MetricRecord]) -> CohortIndex {
    let mut index = CohortIndex::default();

    for record in records {
        let series = index
            .cohorts
            .entry(record.cohort_key.clone())
            .or_insert_with(|| CohortSeries::new(record.cohort_key.clone()));

        let previous = series
            .months
            .insert(record.month_offset, MonthlyMetrics::from(record));

        if previous.is_some() {
            warn!(
                "Duplicate record for cohort {} at month {}, keeping the later row",
                record.cohort_key, record.month_offset
            );
            index.duplicates.push(DuplicateOffset {
                cohort_key: record.cohort_key.clone(),
                month_offset: record.month_offset,
            });
        }
    }

    debug!(
        "Grouped {} records into {} cohorts",
        records.len(),
        index.len()
    );

    index
}
