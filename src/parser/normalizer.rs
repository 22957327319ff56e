//! Record normalizer: untyped rows in, typed `MetricRecord`s out.
//!
//! Rows come from whatever the upstream query layer exported, so field
//! names and numeric encodings vary. Each field is looked up through its
//! alias list and coerced explicitly:
//! - `cohort_key` and `month_offset` are mandatory, rows without them are dropped
//! - `deposit_amount` and `net_revenue` default to 0 when absent
//! - `acquisition_spend` stays `None` when absent, it is never defaulted
//!
//! Dropping a row is not an error. Every drop is returned alongside the
//! accepted records so callers can report data quality.

use super::schema::{DroppedRow, MetricRecord, RowIssue};
use crate::utils::config::FieldMap;
use log::{debug, warn};
use serde_json::{Map, Value};

/// Output of a normalization pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecords {
    /// Accepted records, in input order
    pub records: Vec<MetricRecord>,

    /// Rows that were dropped, in input order
    pub dropped: Vec<DroppedRow>,
}

/// Normalize rows using the default field aliases
///
/// **Public** - main entry point for normalization
pub fn normalize_rows(rows: &[Value]) -> NormalizedRecords {
    normalize_rows_with(rows, &FieldMap::default())
}

/// Normalize rows using a custom field map
///
/// **Public** - used when a config file overrides field names
///
/// # Arguments
/// * `rows` - Raw rows, expected to be JSON objects
/// * `fields` - Accepted names per record field
///
/// # Returns
/// Accepted records plus the dropped rows with their reasons
pub fn normalize_rows_with(rows: &[Value], fields: &FieldMap) -> NormalizedRecords {
    debug!("Normalizing {} raw rows", rows.len());

    let mut records = Vec::with_capacity(rows.len());
    let mut dropped = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        match normalize_row(row, fields) {
            Ok(record) => records.push(record),
            Err(reason) => {
                debug!("Dropping row {}: {}", index, reason);
                dropped.push(DroppedRow { index, reason });
            }
        }
    }

    if !dropped.is_empty() {
        warn!("Dropped {} of {} rows as malformed", dropped.len(), rows.len());
    }

    NormalizedRecords { records, dropped }
}

/// Normalize a single row
///
/// **Public** - exposed for callers validating rows one at a time
///
/// # Errors
/// Returns the `RowIssue` explaining why the row cannot become a record
pub fn normalize_row(row: &Value, fields: &FieldMap) -> Result<MetricRecord, RowIssue> {
    let obj = row.as_object().ok_or(RowIssue::NotAnObject)?;

    let cohort_key = lookup(obj, &fields.cohort_key)
        .and_then(parse_cohort_key)
        .ok_or(RowIssue::MissingCohortKey)?;

    let offset_value = lookup(obj, &fields.month_offset).ok_or(RowIssue::MissingMonthOffset)?;
    let month_offset = parse_month_offset(offset_value)?;

    let deposit_amount = optional_amount(obj, &fields.deposit_amount).unwrap_or(0.0);
    if deposit_amount < 0.0 {
        return Err(RowIssue::NegativeDeposit(deposit_amount));
    }

    let net_revenue = optional_amount(obj, &fields.net_revenue).unwrap_or(0.0);
    let acquisition_spend = optional_amount(obj, &fields.acquisition_spend);

    Ok(MetricRecord {
        cohort_key,
        month_offset,
        deposit_amount,
        net_revenue,
        acquisition_spend,
    })
}

/// Find the first alias present with a non-null value
///
/// **Private** - internal helper
fn lookup<'a>(obj: &'a Map<String, Value>, names: &[String]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| obj.get(name.as_str()).filter(|value| !value.is_null()))
}

/// Accept non-blank strings and bare numbers as cohort keys
///
/// **Private** - internal helper
fn parse_cohort_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a month offset from an integer, an integral float or a numeric string
///
/// **Private** - internal helper
fn parse_month_offset(value: &Value) -> Result<u32, RowIssue> {
    let invalid = || RowIssue::InvalidMonthOffset(value.to_string());

    match value {
        Value::Number(n) => {
            if let Some(whole) = n.as_u64() {
                u32::try_from(whole).map_err(|_| invalid())
            } else {
                match n.as_f64() {
                    Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => {
                        Ok(f as u32)
                    }
                    _ => Err(invalid()),
                }
            }
        }
        Value::String(s) => s.trim().parse::<u32>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Read an optional monetary field
///
/// Present but unusable values are logged and treated as absent.
///
/// **Private** - internal helper
fn optional_amount(obj: &Map<String, Value>, names: &[String]) -> Option<f64> {
    let value = lookup(obj, names)?;

    let parsed = parse_amount(value);
    if parsed.is_none() {
        warn!(
            "Field '{}' has non-numeric value {}, treating as absent",
            names.first().map(String::as_str).unwrap_or("?"),
            value
        );
    }
    parsed
}

/// Parse a finite number from a JSON number or numeric string
///
/// **Private** - internal utility
fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    amount.is_finite().then_some(amount)
}
