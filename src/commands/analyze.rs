//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Resolves configuration (file + CLI overrides)
//! 2. Reads input rows
//! 3. Normalizes rows and applies the cohort range
//! 4. Runs the payback engine
//! 5. Writes the JSON report
//! 6. Prints a terminal summary (optional)

use super::models::AnalyzeArgs;
use crate::output::{render_terminal_summary, report_to_string, write_report};
use crate::parser::{normalize_rows_with, read_rows, NormalizedRecords};
use crate::report::{analyze_normalized, to_report, PaybackReport};
use crate::utils::config::{load_config, AnalysisConfig, CohortRange};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The report that was written, so callers can inspect it
///
/// # Errors
/// * Config file read/parse failures
/// * Input read/parse failures
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<PaybackReport> {
    let start_time = Instant::now();

    info!("Starting payback analysis for: {}", args.input.display());

    // Step 1: Configuration
    info!("Step 1/5: Resolving configuration...");
    let config = resolve_config(&args)?;

    // Step 2: Read rows
    info!("Step 2/5: Reading input rows...");
    let rows = read_rows(&args.input)
        .with_context(|| format!("Failed to read rows from {}", args.input.display()))?;
    debug!("Read {} raw rows", rows.len());

    // Step 3: Normalize and filter
    info!("Step 3/5: Normalizing rows...");
    let normalized = normalize_rows_with(&rows, &config.fields);
    let (normalized, out_of_range) = apply_cohort_range(normalized, &config.filter);

    // Step 4: Analyze
    info!("Step 4/5: Computing payback curves...");
    let mut analysis = analyze_normalized(normalized, rows.len());
    analysis.diagnostics.rows_out_of_range = out_of_range;
    info!(
        "Analyzed {} cohorts ({} skipped without spend)",
        analysis.cohorts.len(),
        analysis.diagnostics.skipped_cohorts.len()
    );

    // Step 5: Write outputs
    info!("Step 5/5: Writing output...");
    let report = to_report(analysis);

    match &args.output {
        Some(path) => {
            write_report(&report, path).context("Failed to write payback report JSON")?;
            info!("✓ Report written to: {}", path.display());
        }
        None => {
            let json = report_to_string(&report).context("Failed to serialize payback report")?;
            println!("{}", json);
        }
    }

    if args.print_summary {
        println!(
            "{}",
            render_terminal_summary(&report.analysis, config.output.summary_rows)
        );
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Load the config file (if any) and layer CLI overrides on top
///
/// **Public** - exposed for testing
pub fn resolve_config(args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if args.from.is_some() {
        config.filter.from = args.from.clone();
    }
    if args.to.is_some() {
        config.filter.to = args.to.clone();
    }
    if let Some(rows) = args.summary_rows {
        config.output.summary_rows = rows;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Keep only records whose cohort falls inside the range
///
/// Returns the kept records and how many were filtered out.
///
/// **Private** - stands in for the upstream date-range filter
fn apply_cohort_range(
    normalized: NormalizedRecords,
    range: &CohortRange,
) -> (NormalizedRecords, usize) {
    if range.is_unbounded() {
        return (normalized, 0);
    }

    let NormalizedRecords { records, dropped } = normalized;
    let before = records.len();
    let records: Vec<_> = records
        .into_iter()
        .filter(|record| range.contains(&record.cohort_key))
        .collect();

    info!(
        "Cohort range kept {} of {} records",
        records.len(),
        before
    );

    let removed = before - records.len();
    (NormalizedRecords { records, dropped }, removed)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    if let Some(output) = &args.output {
        if output == &args.input {
            anyhow::bail!("Output path must differ from the input path");
        }
    }

    if let (Some(from), Some(to)) = (&args.from, &args.to) {
        if from > to {
            anyhow::bail!("--from ({}) must not be after --to ({})", from, to);
        }
    }

    if args.summary_rows == Some(0) {
        anyhow::bail!("summary_rows must be greater than 0");
    }

    Ok(())
}
