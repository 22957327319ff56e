//! Input loading, normalization and record schema.
//!
//! This module handles:
//! - Reading row documents (JSON arrays or wrapped arrays)
//! - Coercing untyped rows into `MetricRecord`
//! - Recording why malformed rows were dropped

pub mod input;
pub mod normalizer;
pub mod schema;

// Re-export main types
pub use input::{parse_rows, read_rows, rows_from_value};
pub use normalizer::{normalize_row, normalize_rows, normalize_rows_with, NormalizedRecords};
pub use schema::{DroppedRow, MetricRecord, RowIssue};
