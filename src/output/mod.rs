//! Output module for reporting link check results
//!
//! This module handles:
//! - CSV export of individual results
//! - JSON export of a full crawl report
//! - Human-readable summary statistics

mod export;
pub mod summary;

pub use export::{export_csv, write_csv, write_json, CSV_HEADERS};
pub use summary::{print_summary, render_summary, CheckSummary};
