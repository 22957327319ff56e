//! End-to-end tests for the payback engine.

use cohort_payback::parser::MetricRecord;
use cohort_payback::report::{analyze, analyze_records, PaybackAnalysis, SkipReason};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

// ============================================================================
// SHARED TEST HELPERS
// ============================================================================

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn january_rows() -> Vec<Value> {
    vec![
        json!({ "cohort_key": "2023-01", "month_offset": 0, "deposit_amount": 3000, "net_revenue": 2000, "acquisition_spend": 10000 }),
        json!({ "cohort_key": "2023-01", "month_offset": 1, "deposit_amount": 4000, "net_revenue": 3000 }),
        json!({ "cohort_key": "2023-01", "month_offset": 2, "deposit_amount": 3500, "net_revenue": 3500 }),
    ]
}

fn two_cohort_rows() -> Vec<Value> {
    let mut rows = january_rows();
    rows.push(json!({ "cohort_key": "2023-02", "month_offset": 0, "deposit_amount": 900, "net_revenue": 400 }));
    rows.push(json!({ "cohort_key": "2023-02", "month_offset": 1, "deposit_amount": 800, "net_revenue": 300 }));
    rows
}

/// Deterministic pseudo-random records for property checks
fn generated_records(cohorts: u32, max_age: u32) -> Vec<MetricRecord> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 10_000) as f64
    };

    let mut records = Vec::new();
    for c in 0..cohorts {
        let key = format!("2022-{:02}", c + 1);
        let age = max_age.saturating_sub(c);
        for month in 0..=age {
            // Leave occasional gaps after the acquisition month
            if month > 0 && (month + c) % 4 == 0 {
                continue;
            }
            let spend = (month == 0).then(|| 5_000.0 + next());
            let net = next() - 3_000.0;
            records.push(MetricRecord::new(key.clone(), month, next(), net, spend));
        }
    }
    records
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn single_cohort_payback_and_roi() {
    let analysis = analyze(&january_rows());

    assert_eq!(analysis.cohorts.len(), 1);
    let cohort = &analysis.cohorts[0];
    assert_eq!(cohort.cohort_key, "2023-01");
    assert_eq!(cohort.acquisition_spend, 10000.0);

    let deposits: Vec<f64> = cohort.points.iter().map(|p| p.cumulative_deposits).collect();
    let revenue: Vec<f64> = cohort.points.iter().map(|p| p.cumulative_net_revenue).collect();
    assert_eq!(deposits, vec![3000.0, 7000.0, 10500.0]);
    assert_eq!(revenue, vec![2000.0, 5000.0, 8500.0]);

    for (point, expected) in cohort.points.iter().zip([30.0, 70.0, 105.0]) {
        assert_close(point.deposit_payback_pct, expected);
    }
    for (point, expected) in cohort.points.iter().zip([20.0, 50.0, 85.0]) {
        assert_close(point.revenue_payback_pct, expected);
    }

    assert_eq!(cohort.deposit_payback_month, Some(2));
    assert_eq!(cohort.revenue_payback_month, None);
    assert_close(cohort.current_roi, -0.15);
}

#[test]
fn cohort_without_spend_is_skipped_without_affecting_others() {
    let alone = analyze(&january_rows());
    let together = analyze(&two_cohort_rows());

    assert_eq!(together.cohorts, alone.cohorts);
    assert_eq!(together.diagnostics.skipped_cohorts.len(), 1);
    assert_eq!(together.diagnostics.skipped_cohorts[0].cohort_key, "2023-02");
    assert_eq!(
        together.diagnostics.skipped_cohorts[0].reason,
        SkipReason::MissingSpend
    );
}

#[test]
fn timeline_excludes_cohorts_without_data() {
    let analysis = analyze(&two_cohort_rows());

    let offsets: Vec<u32> = analysis.timeline.iter().map(|t| t.month_offset).collect();
    assert_eq!(offsets, vec![0, 1, 2]);

    let month_two = &analysis.timeline[2];
    assert_close(month_two.avg_deposit_payback_pct, 105.0);
    assert_close(month_two.avg_revenue_payback_pct, 85.0);
    assert_eq!(month_two.cohort_count, 1);
}

#[test]
fn empty_input_yields_empty_output() {
    let analysis = analyze(&[]);

    assert!(analysis.cohorts.is_empty());
    assert!(analysis.timeline.is_empty());
    assert_eq!(analysis.diagnostics.rows_received, 0);
}

#[test]
fn duplicate_offset_later_row_wins() {
    let mut rows = january_rows();
    rows.push(json!({ "cohort_key": "2023-01", "month_offset": 1, "deposit_amount": 1000, "net_revenue": 500 }));

    let analysis = analyze(&rows);
    let cohort = &analysis.cohorts[0];

    assert_eq!(cohort.points[1].cumulative_deposits, 4000.0);
    assert_eq!(cohort.points[2].cumulative_deposits, 7500.0);
    assert_eq!(cohort.points[2].cumulative_net_revenue, 6000.0);
    assert_eq!(cohort.deposit_payback_month, None);
    assert_eq!(analysis.diagnostics.duplicate_offsets.len(), 1);
}

#[test]
fn duplicate_offset_zero_without_spend_drops_earlier_spend() {
    let rows = vec![
        json!({ "cohort_key": "2023-01", "month_offset": 0, "deposit_amount": 300, "acquisition_spend": 1000 }),
        json!({ "cohort_key": "2023-01", "month_offset": 0, "deposit_amount": 400 }),
    ];

    let analysis = analyze(&rows);

    assert!(analysis.cohorts.is_empty());
    assert_eq!(analysis.diagnostics.skipped_cohorts.len(), 1);
    assert_eq!(
        analysis.diagnostics.skipped_cohorts[0].reason,
        SkipReason::MissingSpend
    );
    assert_eq!(analysis.diagnostics.duplicate_offsets.len(), 1);
}

#[test]
fn duplicate_offset_zero_with_spend_replaces_spendless_row() {
    let rows = vec![
        json!({ "cohort_key": "2023-01", "month_offset": 0, "deposit_amount": 400 }),
        json!({ "cohort_key": "2023-01", "month_offset": 0, "deposit_amount": 300, "acquisition_spend": 1000 }),
    ];

    let analysis = analyze(&rows);

    assert_eq!(analysis.cohorts.len(), 1);
    let cohort = &analysis.cohorts[0];
    assert_eq!(cohort.acquisition_spend, 1000.0);
    assert_eq!(cohort.points[0].cumulative_deposits, 300.0);
    assert!(analysis.diagnostics.skipped_cohorts.is_empty());
}

#[test]
fn zero_and_negative_spend_are_excluded() {
    let rows = vec![
        json!({ "cohort_key": "2023-05", "month_offset": 0, "deposit_amount": 10, "acquisition_spend": 0 }),
        json!({ "cohort_key": "2023-06", "month_offset": 0, "deposit_amount": 10, "acquisition_spend": -50 }),
    ];

    let analysis = analyze(&rows);

    assert!(analysis.cohorts.is_empty());
    let reasons: Vec<SkipReason> = analysis
        .diagnostics
        .skipped_cohorts
        .iter()
        .map(|s| s.reason.clone())
        .collect();
    assert_eq!(
        reasons,
        vec![
            SkipReason::NonPositiveSpend(0.0),
            SkipReason::NonPositiveSpend(-50.0)
        ]
    );
    // Offsets still appear on the timeline, with nothing to average
    assert_eq!(analysis.timeline.len(), 1);
    assert_eq!(analysis.timeline[0].cohort_count, 0);
    assert_eq!(analysis.timeline[0].avg_deposit_payback_pct, 0.0);
}

#[test]
fn malformed_rows_are_dropped_not_fatal() {
    let mut rows = january_rows();
    rows.push(json!({ "month_offset": 3, "deposit_amount": 99999 }));
    rows.push(json!({ "cohort_key": "2023-01", "month_offset": "soon", "deposit_amount": 99999 }));
    rows.push(json!(null));

    let analysis = analyze(&rows);

    assert_eq!(analysis.cohorts, analyze(&january_rows()).cohorts);
    let dropped: Vec<usize> = analysis.diagnostics.dropped_rows.iter().map(|d| d.index).collect();
    assert_eq!(dropped, vec![3, 4, 5]);
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn cumulative_deposits_never_decrease() {
    let analysis = analyze_records(&generated_records(8, 12));

    assert!(!analysis.cohorts.is_empty());
    for cohort in &analysis.cohorts {
        for pair in cohort.points.windows(2) {
            assert!(pair[1].cumulative_deposits >= pair[0].cumulative_deposits);
        }
    }
}

#[test]
fn payback_month_is_minimal_crossing() {
    let analysis = analyze_records(&generated_records(8, 12));

    for cohort in &analysis.cohorts {
        match cohort.deposit_payback_month {
            Some(month) => {
                for point in &cohort.points {
                    if point.month_offset < month {
                        assert!(point.deposit_payback_pct < 100.0);
                    } else if point.month_offset == month {
                        assert!(point.deposit_payback_pct >= 100.0);
                    }
                }
            }
            None => assert!(cohort.points.iter().all(|p| p.deposit_payback_pct < 100.0)),
        }

        match cohort.revenue_payback_month {
            Some(month) => {
                let first = cohort
                    .points
                    .iter()
                    .find(|p| p.revenue_payback_pct >= 100.0)
                    .map(|p| p.month_offset);
                assert_eq!(first, Some(month));
            }
            None => assert!(cohort.points.iter().all(|p| p.revenue_payback_pct < 100.0)),
        }
    }
}

#[test]
fn roi_matches_latest_point_exactly() {
    let analysis = analyze_records(&generated_records(8, 12));

    for cohort in &analysis.cohorts {
        let last = cohort.points.last().unwrap();
        assert_eq!(
            cohort.current_roi,
            last.cumulative_net_revenue / cohort.acquisition_spend - 1.0
        );
    }
}

#[test]
fn timeline_counts_only_cohorts_old_enough() {
    let records = generated_records(8, 12);
    let analysis = analyze_records(&records);

    for point in &analysis.timeline {
        let expected = analysis
            .cohorts
            .iter()
            .filter(|c| c.latest_offset().is_some_and(|latest| latest >= point.month_offset))
            .count();
        assert_eq!(point.cohort_count, expected);
    }
}

#[test]
fn output_is_ordered() {
    let mut records = generated_records(6, 9);
    records.reverse();
    let analysis = analyze_records(&records);

    let keys: Vec<&str> = analysis.cohorts.iter().map(|c| c.cohort_key.as_str()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    for cohort in &analysis.cohorts {
        assert!(cohort.points.windows(2).all(|w| w[0].month_offset < w[1].month_offset));
    }
    assert!(analysis
        .timeline
        .windows(2)
        .all(|w| w[0].month_offset < w[1].month_offset));
}

#[test]
fn analysis_is_idempotent() {
    let records = generated_records(8, 12);

    let first: PaybackAnalysis = analyze_records(&records);
    let second: PaybackAnalysis = analyze_records(&records);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
