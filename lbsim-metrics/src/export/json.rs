//! JSON export of a full run summary.

use crate::error::MetricsError;
use crate::export::RunExporter;
use crate::summary::RunSummary;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub struct JsonExporter {
    path: PathBuf,
    pretty: bool,
}

impl JsonExporter {
    /// # Arguments
    /// * `path` - Output file path
    /// * `pretty` - Whether to indent the output
    pub fn new(path: &Path, pretty: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            pretty,
        }
    }
}

impl RunExporter for JsonExporter {
    fn export(&self, run: &RunSummary) -> Result<(), MetricsError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(run)?
        } else {
            serde_json::to_string(run)?
        };

        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;

        debug!(path = %self.path.display(), "Wrote run summary");
        Ok(())
    }
}
