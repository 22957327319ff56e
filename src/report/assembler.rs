//! Result assembly: runs the pipeline and packages its output.
//!
//! raw rows -> normalizer -> grouper -> cumulative -> payback -> results
//!                                          \-> timeline
//!
//! The whole chain is a pure function of its input. Nothing here can fail;
//! malformed rows and cohorts without spend end up in `Diagnostics`.

use super::schema::{CohortPaybackResult, Diagnostics, PaybackAnalysis, PaybackReport};
use crate::aggregator::{average_timeline, build_all_series, detect_payback, group_by_cohort};
use crate::aggregator::CumulativeSeries;
use crate::parser::normalizer::{normalize_rows_with, NormalizedRecords};
use crate::parser::schema::MetricRecord;
use crate::utils::config::{FieldMap, SCHEMA_VERSION};
use log::debug;
use serde_json::Value;

/// Analyze raw rows with the default field aliases
///
/// **Public** - main entry point of the engine
///
/// # Example
/// ```ignore
/// let rows = parse_rows(r#"[{"cohort_key": "2023-01", "month_offset": 0}]"#)?;
/// let analysis = analyze(&rows);
/// ```
pub fn analyze(rows: &[Value]) -> PaybackAnalysis {
    analyze_with(rows, &FieldMap::default())
}

/// Analyze raw rows with a custom field map
pub fn analyze_with(rows: &[Value], fields: &FieldMap) -> PaybackAnalysis {
    let normalized = normalize_rows_with(rows, fields);
    analyze_normalized(normalized, rows.len())
}

/// Analyze records that are already typed
///
/// **Public** - for callers that build `MetricRecord`s themselves
pub fn analyze_records(records: &[MetricRecord]) -> PaybackAnalysis {
    let normalized = NormalizedRecords {
        records: records.to_vec(),
        dropped: Vec::new(),
    };
    analyze_normalized(normalized, records.len())
}

/// Run grouping, aggregation, detection and averaging on normalized records
///
/// **Public** - lets callers filter records between normalization and analysis
///
/// # Arguments
/// * `normalized` - Output of the normalizer, possibly filtered
/// * `rows_received` - Number of raw rows originally handed in (for diagnostics)
pub fn analyze_normalized(normalized: NormalizedRecords, rows_received: usize) -> PaybackAnalysis {
    let NormalizedRecords { records, dropped } = normalized;

    let index = group_by_cohort(&records);
    let global_offsets = index.global_offsets();
    let (series, skipped_cohorts) = build_all_series(&index);

    let timeline = average_timeline(&series, &global_offsets);
    let cohorts: Vec<CohortPaybackResult> = series.into_iter().map(assemble_cohort).collect();

    debug!(
        "Assembled {} cohort results and {} timeline points",
        cohorts.len(),
        timeline.len()
    );

    PaybackAnalysis {
        cohorts,
        timeline,
        diagnostics: Diagnostics {
            rows_received,
            rows_accepted: records.len(),
            rows_out_of_range: 0,
            dropped_rows: dropped,
            duplicate_offsets: index.duplicates,
            skipped_cohorts,
        },
    }
}

/// Attach payback findings to a cohort's curve
///
/// **Private** - internal conversion
fn assemble_cohort(series: CumulativeSeries) -> CohortPaybackResult {
    let summary = detect_payback(&series);

    CohortPaybackResult {
        cohort_key: series.cohort_key,
        acquisition_spend: series.acquisition_spend,
        points: series.points,
        deposit_payback_month: summary.deposit_payback_month,
        revenue_payback_month: summary.revenue_payback_month,
        current_roi: summary.current_roi,
    }
}

/// Wrap an analysis in a versioned, timestamped report
///
/// **Public** - used by commands to create final output
pub fn to_report(analysis: PaybackAnalysis) -> PaybackReport {
    use chrono::Utc;

    PaybackReport {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        analysis,
    }
}
