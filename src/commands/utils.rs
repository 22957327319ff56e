use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a payback report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;
    let analysis = &report.analysis;

    if report.version != SCHEMA_VERSION {
        println!(
            "⚠️  Schema version {} differs from current {}",
            report.version, SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Cohorts: {}", analysis.cohorts.len());
    println!("  Timeline Points: {}", analysis.timeline.len());
    println!("  Skipped Cohorts: {}", analysis.diagnostics.skipped_cohorts.len());
    println!("  Dropped Rows: {}", analysis.diagnostics.dropped_rows.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Cohort Payback Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string              - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string         - ISO 8601 timestamp");
        println!("  cohorts: array               - Cohorts with acquisition spend");
        println!("    cohort_key: string         - Acquisition period");
        println!("    acquisition_spend: number  - Marketing spend");
        println!("    points: array              - Cumulative curve by month offset");
        println!("      month_offset: number");
        println!("      cumulative_deposits: number");
        println!("      cumulative_net_revenue: number");
        println!("      deposit_payback_pct: number");
        println!("      revenue_payback_pct: number");
        println!("    deposit_payback_month: number?  - First month deposits >= 100% of spend");
        println!("    revenue_payback_month: number?  - First month NGR >= 100% of spend");
        println!("    current_roi: number        - NGR / spend - 1 at latest month");
        println!("  timeline: array              - Cross-cohort averages");
        println!("    month_offset: number");
        println!("    avg_deposit_payback_pct: number");
        println!("    avg_revenue_payback_pct: number");
        println!("    cohort_count: number       - Cohorts averaged at this month");
        println!("  diagnostics: object          - Dropped rows, duplicates, skipped cohorts");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Cohort Payback v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Cohort payback curves, payback months and ROI for acquisition cohorts.");
}
