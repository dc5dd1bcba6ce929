use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::trace::trace::ResolutionTrace;

/// JSONL sink for resolution traces. Each record is serialized and written
/// as one line under the lock, so lines from concurrent resolutions never
/// interleave.
pub struct TraceLogger {
    sink: Option<TraceSink>,
}

struct TraceSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl TraceLogger {
    /// Open `path` for appending, or fail with the underlying I/O error.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            sink: Some(TraceSink {
                path,
                file: Mutex::new(file),
            }),
        })
    }

    /// Like [`TraceLogger::open`], but an unopenable file only warns and
    /// yields a disabled logger.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::open(&path).unwrap_or_else(|e| {
            warn!(path = %path.as_ref().display(), "resolution trace disabled: {}", e);
            Self::disabled()
        })
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn log(&self, record: &ResolutionTrace) {
        let Some(sink) = &self.sink else {
            return;
        };

        let mut line = match serde_json::to_vec(record) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(description = %record.description, "unserializable resolution trace: {}", e);
                return;
            }
        };
        line.push(b'\n');

        let mut file = sink.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = file.write_all(&line) {
            warn!(path = %sink.path.display(), "failed to append resolution trace: {}", e);
        }
    }
}
