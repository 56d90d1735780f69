//! Timestamped N-Triples dumps of the data a run is about to sync.
//!
//! Dumps are for debugging after the fact; a failed dump never stops a sync.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{GraphError, GraphResult};
use crate::graph::TripleSet;
use crate::graph::ntriples::write_ntriples;

/// Writes `<dir>/<prefix>-<unix-seconds>-in.nt` files.
#[derive(Debug, Clone)]
pub struct AuditLog {
    dir: PathBuf,
}

impl AuditLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path a dump written at `timestamp` would get.
    pub fn path_for(&self, prefix: &str, timestamp: u64) -> PathBuf {
        self.dir.join(format!("{prefix}-{timestamp}-in.nt"))
    }

    /// Dump `triples`, creating the directory when missing.
    pub fn write(&self, prefix: &str, triples: &TripleSet) -> GraphResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|source| GraphError::Io { source })?;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let path = self.path_for(prefix, timestamp);
        let file = std::fs::File::create(&path).map_err(|source| GraphError::Io { source })?;
        write_ntriples(std::io::BufWriter::new(file), triples)?;
        tracing::info!(path = %path.display(), count = triples.len(), "wrote audit dump");
        Ok(path)
    }

    /// Like [`AuditLog::write`], but only logs on failure.
    pub fn write_or_warn(&self, prefix: &str, triples: &TripleSet) -> Option<PathBuf> {
        match self.write(prefix, triples) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(
                    dir = %self.dir.display(),
                    error = %e,
                    "failed to write audit dump, continuing"
                );
                None
            }
        }
    }
}
