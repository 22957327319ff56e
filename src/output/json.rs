//! JSON report output writer.
//!
//! Writes PaybackReport structs to JSON files with proper formatting.
//! Numbers are written at full precision; rounding is left to renderers.

use super::validate_path;
use crate::report::schema::PaybackReport;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `report` - Report data to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
/// * `OutputError::NonFiniteValue` - Analysis overflowed, JSON cannot hold it
///
/// # Example
/// ```ignore
/// let report = to_report(analyze(&rows));
/// write_report(&report, "artifacts/payback.json")?;
/// ```
pub fn write_report(report: &PaybackReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_path(output_path)?;
    ensure_finite(report)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report).map_err(OutputError::SerializationFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Report written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize a report to a pretty JSON string
///
/// **Public** - used when printing to stdout instead of a file
pub fn report_to_string(report: &PaybackReport) -> Result<String, OutputError> {
    ensure_finite(report)?;
    serde_json::to_string_pretty(report).map_err(OutputError::SerializationFailed)
}

/// Refuse to serialize NaN or infinity, which JSON would turn into `null`
///
/// **Private** - shared by both writers
fn ensure_finite(report: &PaybackReport) -> Result<(), OutputError> {
    match report.analysis.first_non_finite() {
        Some(location) => Err(OutputError::NonFiniteValue(location)),
        None => Ok(()),
    }
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a report from a JSON file
///
/// **Public** - used by the validate command and tests
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<PaybackReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;

    let report: PaybackReport =
        serde_json::from_reader(BufReader::new(file)).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report loaded: version {}, {} cohorts",
        report.version,
        report.analysis.cohorts.len()
    );

    Ok(report)
}
