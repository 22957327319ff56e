//! Payback result schema and assembly.

pub mod assembler;
pub mod schema;

pub use assembler::{analyze, analyze_normalized, analyze_records, analyze_with, to_report};
pub use schema::{
    CohortPaybackResult, Diagnostics, DuplicateOffset, MonthlyPaybackPoint, PaybackAnalysis,
    PaybackReport, SkipReason, SkippedCohort, TimelinePoint,
};
