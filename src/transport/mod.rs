use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub mod command;
pub mod session;

/// Failure to obtain a snapshot from the automation transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("failed to read snapshot file {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session I/O error: {0}")]
    SessionIo(String),

    #[error("session protocol error on '{command}': {error}")]
    Protocol { command: String, error: String },

    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("session is closed")]
    Closed,
}

/// Source of raw snapshot text.
///
/// Web transports return an accessibility-tree dump, mobile transports an
/// element list with coordinates; both feed `SnapshotIndex::parse` unchanged.
pub trait SnapshotProvider {
    fn take_snapshot(&mut self) -> Result<String, TransportError>;
}

/// A fixed snapshot, returned on every call.
#[derive(Debug, Clone)]
pub struct StaticSnapshot {
    text: String,
    calls: usize,
}

impl StaticSnapshot {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: 0,
        }
    }

    /// How many snapshots have been taken so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl SnapshotProvider for StaticSnapshot {
    fn take_snapshot(&mut self) -> Result<String, TransportError> {
        self.calls += 1;
        Ok(self.text.clone())
    }
}

/// Re-reads a snapshot file on every call, so an external driver can keep
/// overwriting it between actions.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    path: PathBuf,
}

impl FileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotProvider for FileSnapshot {
    fn take_snapshot(&mut self) -> Result<String, TransportError> {
        std::fs::read_to_string(&self.path).map_err(|source| TransportError::File {
            path: self.path.clone(),
            source,
        })
    }
}
