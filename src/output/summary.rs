//! Terminal rendering for payback analyses.
//!
//! Presentation only: values are rounded to one decimal here, the
//! analysis itself keeps full precision.

use crate::report::schema::{CohortPaybackResult, PaybackAnalysis, TimelinePoint};
use colored::*;

const RULE: &str = "---------------------------------------------------------------------------";

/// Render a human-readable summary of an analysis for the terminal
///
/// # Arguments
/// * `analysis` - Engine output to render
/// * `max_timeline_rows` - Timeline rows to show before truncating
pub fn render_terminal_summary(analysis: &PaybackAnalysis, max_timeline_rows: usize) -> String {
    let mut out = String::new();

    out.push_str(&render_header(analysis));
    out.push_str(&render_cohorts(&analysis.cohorts));
    out.push_str(&render_timeline(&analysis.timeline, max_timeline_rows));
    out.push_str(&render_diagnostics(analysis));

    out
}

fn render_header(analysis: &PaybackAnalysis) -> String {
    let mut out = String::new();
    out.push_str("\n📊 ");
    out.push_str(&"Cohort Payback Summary".bold().to_string());
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "Cohorts analyzed: {}   Timeline months: {}\n",
        analysis.cohorts.len(),
        analysis.timeline.len()
    ));
    out.push_str(RULE);
    out.push_str("\n\n");
    out
}

fn render_cohorts(cohorts: &[CohortPaybackResult]) -> String {
    if cohorts.is_empty() {
        return "No cohorts with acquisition spend to analyze.\n\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "  {:<12} {:>14} {:>7} {:>10} {:>10} {:>10}\n",
        "Cohort", "Spend", "Age", "Dep. PB", "NGR PB", "ROI"
    ));

    for cohort in cohorts {
        let age = cohort
            .latest_offset()
            .map_or_else(|| "-".to_string(), |m| format!("M{}", m));

        let roi_text = format!("{:>+9.1}%", cohort.current_roi * 100.0);
        let roi = if cohort.current_roi >= 0.0 {
            roi_text.green()
        } else {
            roi_text.red()
        };

        out.push_str(&format!(
            "  {:<12} {:>14.2} {:>7} {:>10} {:>10} {}\n",
            cohort.cohort_key,
            cohort.acquisition_spend,
            age,
            format_month(cohort.deposit_payback_month),
            format_month(cohort.revenue_payback_month),
            roi
        ));
    }

    out.push('\n');
    out
}

fn render_timeline(timeline: &[TimelinePoint], max_rows: usize) -> String {
    if timeline.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&"Average payback by month".bold().to_string());
    out.push('\n');
    out.push_str(&format!(
        "  {:>6} {:>12} {:>12} {:>8}\n",
        "Month", "Deposits %", "NGR %", "Cohorts"
    ));

    for point in timeline.iter().take(max_rows) {
        let revenue_text = format!("{:>12.1}", point.avg_revenue_payback_pct);
        let revenue = if point.cohort_count > 0 && point.avg_revenue_payback_pct >= 100.0 {
            revenue_text.green()
        } else {
            revenue_text.normal()
        };

        out.push_str(&format!(
            "  {:>6} {:>12.1} {} {:>8}\n",
            format!("M{}", point.month_offset),
            point.avg_deposit_payback_pct,
            revenue,
            point.cohort_count
        ));
    }

    if timeline.len() > max_rows {
        out.push_str(&format!(
            "   (Showing first {} of {} months)\n",
            max_rows,
            timeline.len()
        ));
    }

    out.push('\n');
    out
}

fn render_diagnostics(analysis: &PaybackAnalysis) -> String {
    let diagnostics = &analysis.diagnostics;
    let mut out = String::new();

    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "Rows: {} received, {} accepted",
        diagnostics.rows_received, diagnostics.rows_accepted
    ));
    if diagnostics.rows_out_of_range > 0 {
        out.push_str(&format!(
            ", {} outside cohort range",
            diagnostics.rows_out_of_range
        ));
    }
    out.push('\n');

    let issues = diagnostics.dropped_rows.len()
        + diagnostics.duplicate_offsets.len()
        + diagnostics.skipped_cohorts.len();

    if issues == 0 {
        out.push_str(&"✅ No data quality issues".green().to_string());
        out.push('\n');
        return out;
    }

    if !diagnostics.dropped_rows.is_empty() {
        out.push_str(
            &format!("⚠️  {} malformed rows dropped", diagnostics.dropped_rows.len())
                .yellow()
                .to_string(),
        );
        out.push('\n');
    }

    if !diagnostics.duplicate_offsets.is_empty() {
        out.push_str(
            &format!(
                "⚠️  {} duplicate cohort months overwritten",
                diagnostics.duplicate_offsets.len()
            )
            .yellow()
            .to_string(),
        );
        out.push('\n');
    }

    for skipped in &diagnostics.skipped_cohorts {
        out.push_str(&format!("   skipped {}: {}\n", skipped.cohort_key, skipped.reason));
    }

    out
}

fn format_month(month: Option<u32>) -> String {
    month.map_or_else(|| "-".to_string(), |m| format!("M{}", m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::schema::{Diagnostics, SkipReason, SkippedCohort};

    fn sample_analysis() -> PaybackAnalysis {
        PaybackAnalysis {
            cohorts: vec![CohortPaybackResult {
                cohort_key: "2023-01".to_string(),
                acquisition_spend: 10000.0,
                points: Vec::new(),
                deposit_payback_month: Some(2),
                revenue_payback_month: None,
                current_roi: -0.15,
            }],
            timeline: (0..5)
                .map(|m| TimelinePoint {
                    month_offset: m,
                    avg_deposit_payback_pct: 10.0 * m as f64,
                    avg_revenue_payback_pct: 5.0 * m as f64,
                    cohort_count: 1,
                })
                .collect(),
            diagnostics: Diagnostics {
                rows_received: 4,
                rows_accepted: 4,
                skipped_cohorts: vec![SkippedCohort {
                    cohort_key: "2023-02".to_string(),
                    reason: SkipReason::MissingSpend,
                }],
                ..Diagnostics::default()
            },
        }
    }

    #[test]
    fn test_summary_lists_cohorts_and_skips() {
        let text = render_terminal_summary(&sample_analysis(), 10);

        assert!(text.contains("2023-01"));
        assert!(text.contains("M2"));
        assert!(text.contains("skipped 2023-02"));
        assert!(text.contains("Rows: 4 received, 4 accepted"));
    }

    #[test]
    fn test_summary_truncates_timeline() {
        let text = render_terminal_summary(&sample_analysis(), 3);
        assert!(text.contains("(Showing first 3 of 5 months)"));
    }

    #[test]
    fn test_summary_empty_analysis() {
        let text = render_terminal_summary(&PaybackAnalysis::default(), 10);
        assert!(text.contains("No cohorts with acquisition spend"));
    }

    #[test]
    fn test_format_month() {
        assert_eq!(format_month(Some(3)), "M3");
        assert_eq!(format_month(None), "-");
    }
}
