//! Reporting for load-balancing simulation runs
//!
//! Turns a finished simulation into a [`RunSummary`] and writes it to the
//! console format, the per-run CSV table, the cumulative `simlog.csv`, or
//! JSON.

pub mod error;
pub mod export;
pub mod summary;

pub use error::MetricsError;
pub use export::{append_simlog, export_csv, export_json, RunExporter, SIMLOG_FILE};
pub use summary::{NodeSummary, RunSummary};
