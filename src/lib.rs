//! Cohort Payback
//!
//! Turns per-cohort monthly deposit and net-revenue records into payback
//! curves, payback months, current ROI and a cross-cohort averaged timeline.
//!
//! The engine is a pure function of its input: `report::analyze` takes raw
//! rows and returns a `PaybackAnalysis` without I/O or shared state, so
//! independent invocations can run in parallel. The `commands` and `output`
//! modules wrap it for the `cohort-payback` CLI.
//!
//! ```ignore
//! use cohort_payback::parser::parse_rows;
//! use cohort_payback::report::analyze;
//!
//! let rows = parse_rows(&std::fs::read_to_string("cohorts.json")?)?;
//! let analysis = analyze(&rows);
//! for cohort in &analysis.cohorts {
//!     println!("{} ROI {:.2}", cohort.cohort_key, cohort.current_roi);
//! }
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod report;
pub mod utils;
