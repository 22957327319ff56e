//! Row document loading.
//!
//! Exports from the analytics query layer arrive either as a bare JSON
//! array of rows or as an object wrapping that array under a container key
//! (`records`, `rows`, ...). Both are flattened to a plain row list here;
//! row-level validation is left to the normalizer.

use crate::utils::config::ROW_CONTAINER_NAMES;
use crate::utils::error::ParseError;
use log::debug;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Extract the row array from a parsed document
///
/// **Public** - used by `parse_rows` and `read_rows`
///
/// # Errors
/// * `ParseError::InvalidFormat` - Document is neither an array nor a known wrapper
pub fn rows_from_value(document: Value) -> Result<Vec<Value>, ParseError> {
    match document {
        Value::Array(rows) => Ok(rows),

        Value::Object(mut obj) => {
            for key in ROW_CONTAINER_NAMES {
                if let Some(Value::Array(rows)) = obj.remove(*key) {
                    debug!("Found {} rows under '{}'", rows.len(), key);
                    return Ok(rows);
                }
            }

            Err(ParseError::InvalidFormat(format!(
                "Object input must hold a row array under one of: {}",
                ROW_CONTAINER_NAMES.join(", ")
            )))
        }

        _ => Err(ParseError::InvalidFormat(
            "Input must be a JSON array or object".to_string(),
        )),
    }
}

/// Parse rows from a JSON string
pub fn parse_rows(json: &str) -> Result<Vec<Value>, ParseError> {
    let document: Value = serde_json::from_str(json)?;
    rows_from_value(document)
}

/// Read rows from a JSON file
///
/// **Public** - entry point for the analyze command
///
/// # Errors
/// * `ParseError::ReadFailed` - File cannot be opened
/// * `ParseError::JsonError` - File is not valid JSON
/// * `ParseError::InvalidFormat` - JSON has no row array
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<Value>, ParseError> {
    let path = path.as_ref();
    debug!("Reading rows from: {}", path.display());

    let file = File::open(path)?;
    let document: Value = serde_json::from_reader(BufReader::new(file))?;
    rows_from_value(document)
}
