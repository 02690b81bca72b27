//! CSV export
//!
//! Plain comma-separated text written with `writeln!`. No field ever contains
//! a comma or quote (ids, numbers and policy names only), so values are not
//! escaped.

use crate::error::MetricsError;
use crate::export::RunExporter;
use crate::summary::RunSummary;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Header of the per-run node table.
pub const NODE_HEADER: &str = "sid,avg_x,avg_s,avg_q,avg_d,n_jobs";

/// Per-run node table: one row per node under [`NODE_HEADER`].
#[derive(Debug)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl RunExporter for CsvExporter {
    fn export(&self, run: &RunSummary) -> Result<(), MetricsError> {
        let mut file = BufWriter::new(File::create(&self.path)?);

        writeln!(file, "{NODE_HEADER}")?;
        for node in &run.node_stats {
            writeln!(
                file,
                "{},{},{},{},{},{}",
                node.sid,
                node.utilization,
                node.avg_service_time,
                node.avg_queue_length,
                node.avg_delay,
                node.jobs
            )?;
        }
        file.flush()?;

        debug!(path = %self.path.display(), rows = run.node_stats.len(), "Wrote node table");
        Ok(())
    }
}

/// Appends `policy,jobs,nodes,queue_size,util_0,...,util_n,` to a shared log.
///
/// The trailing comma is part of the row format.
#[derive(Debug)]
pub struct SimLogAppender {
    path: PathBuf,
}

impl SimLogAppender {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn row(run: &RunSummary) -> String {
        let mut row = format!("{},{},{},{}", run.policy, run.jobs, run.nodes, run.queue_size);
        for node in &run.node_stats {
            row.push_str(&format!(",{}", node.utilization));
        }
        row.push(',');
        row
    }
}

impl RunExporter for SimLogAppender {
    fn export(&self, run: &RunSummary) -> Result<(), MetricsError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", Self::row(run))?;
        debug!(path = %self.path.display(), "Appended run to log");
        Ok(())
    }
}

/// Write one line of comma-separated node indices per trace.
pub fn export_distribution(
    path: impl AsRef<Path>,
    traces: &[Vec<usize>],
) -> Result<(), MetricsError> {
    let path = path.as_ref();
    let mut file = BufWriter::new(File::create(path)?);
    for trace in traces {
        let line = trace
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(",");
        writeln!(file, "{line}")?;
    }
    file.flush()?;
    debug!(path = %path.display(), traces = traces.len(), "Wrote selection distribution");
    Ok(())
}
