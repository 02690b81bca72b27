//! Export of run summaries
//!
//! Three destinations:
//!
//! - `<model>_<policy>.csv`: one row per node ([`csv::CsvExporter`])
//! - `simlog.csv`: one appended row per run ([`csv::SimLogAppender`])
//! - `<model>_<policy>.json`: the full summary ([`json::JsonExporter`])

pub mod csv;
pub mod json;

use crate::error::MetricsError;
use crate::summary::RunSummary;
use std::path::{Path, PathBuf};

/// Name of the cumulative run log.
pub const SIMLOG_FILE: &str = "simlog.csv";

/// Writes a run summary to some destination.
pub trait RunExporter {
    fn export(&self, run: &RunSummary) -> Result<(), MetricsError>;
}

/// Path of the per-run file with `extension` inside `dir`.
pub fn run_file(dir: &Path, run: &RunSummary, extension: &str) -> PathBuf {
    dir.join(format!("{}.{extension}", run.file_stem()))
}

fn check_dir(dir: &Path) -> Result<(), MetricsError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(MetricsError::Export(format!(
            "output directory {} does not exist",
            dir.display()
        )))
    }
}

/// Write `<model>_<policy>.csv` into `dir`.
pub fn export_csv(run: &RunSummary, dir: impl AsRef<Path>) -> Result<PathBuf, MetricsError> {
    check_dir(dir.as_ref())?;
    let path = run_file(dir.as_ref(), run, "csv");
    csv::CsvExporter::new(&path).export(run)?;
    Ok(path)
}

/// Append the run's row to `simlog.csv` in `dir`.
pub fn append_simlog(run: &RunSummary, dir: impl AsRef<Path>) -> Result<PathBuf, MetricsError> {
    check_dir(dir.as_ref())?;
    let path = dir.as_ref().join(SIMLOG_FILE);
    csv::SimLogAppender::new(&path).export(run)?;
    Ok(path)
}

/// Write `<model>_<policy>.json` into `dir`.
pub fn export_json(
    run: &RunSummary,
    dir: impl AsRef<Path>,
    pretty: bool,
) -> Result<PathBuf, MetricsError> {
    check_dir(dir.as_ref())?;
    let path = run_file(dir.as_ref(), run, "json");
    json::JsonExporter::new(&path, pretty).export(run)?;
    Ok(path)
}
