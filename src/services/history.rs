use crate::models::VisitHistory;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that can occur reading or writing the visit history
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed history JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON file holding the [`VisitHistory`]
///
/// The file is a flat object of id -> count, pretty printed with sorted
/// keys. Concurrent runs are not coordinated; the last writer wins.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the history, or an empty one if the file does not exist yet
    pub fn load(&self) -> Result<VisitHistory, HistoryError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No history at {}, starting fresh", self.path.display());
                return Ok(VisitHistory::new());
            }
            Err(source) => {
                return Err(HistoryError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let history: VisitHistory =
            serde_json::from_str(&contents).map_err(|source| HistoryError::Json {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(
            "Loaded {} history entries from {}",
            history.len(),
            self.path.display()
        );

        Ok(history)
    }

    /// Replace the history file atomically
    pub fn save(&self, history: &VisitHistory) -> Result<(), HistoryError> {
        let io_err = |source| HistoryError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let json = serde_json::to_string_pretty(history).map_err(|source| HistoryError::Json {
            path: self.path.clone(),
            source,
        })?;

        let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
        file.write_all(json.as_bytes()).map_err(io_err)?;
        file.write_all(b"\n").map_err(io_err)?;
        file.as_file().sync_all().map_err(io_err)?;
        file.persist(&self.path).map_err(|e| io_err(e.error))?;

        tracing::debug!(
            "Saved {} history entries to {}",
            history.len(),
            self.path.display()
        );

        Ok(())
    }
}
