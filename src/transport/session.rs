use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::transport::{SnapshotProvider, TransportError};

/// Request sent to the driver over stdin (one JSON line).
#[derive(Debug, Serialize)]
pub struct DriverRequest {
    pub cmd: &'static str,
}

impl DriverRequest {
    pub fn snapshot() -> Self {
        DriverRequest { cmd: "snapshot" }
    }

    pub fn quit() -> Self {
        DriverRequest { cmd: "quit" }
    }
}

/// Response read from the driver's stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct DriverResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A long-lived automation driver that keeps its device or browser open.
///
/// Commands go out as NDJSON on stdin, responses come back on stdout. The
/// driver announces itself with `{"ok":true,"ready":true}` before the first
/// request.
pub struct SessionSnapshot {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    closed: bool,
}

impl SessionSnapshot {
    /// Spawn the driver and wait for its ready signal.
    pub fn launch(program: &str, args: &[String]) -> Result<Self, TransportError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| TransportError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransportError::SessionIo(format!("no stdin for {}", program)))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransportError::SessionIo(format!("no stdout for {}", program)))?;

        let mut session = SessionSnapshot {
            child,
            stdin,
            reader: BufReader::new(stdout),
            closed: false,
        };

        let ready = session.read_response("launch")?;
        if !ready.ok || ready.ready != Some(true) {
            return Err(TransportError::Protocol {
                command: "launch".into(),
                error: "driver did not send a ready signal".into(),
            });
        }

        debug!(program, "snapshot driver ready");
        Ok(session)
    }

    fn send(&mut self, request: &DriverRequest) -> Result<DriverResponse, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }

        let json = serde_json::to_string(request).map_err(|source| TransportError::Json {
            context: "driver request".into(),
            source,
        })?;

        writeln!(self.stdin, "{}", json)
            .and_then(|_| self.stdin.flush())
            .map_err(|e| TransportError::SessionIo(format!("write to driver failed: {}", e)))?;

        self.read_response(request.cmd)
    }

    fn read_response(&mut self, command: &str) -> Result<DriverResponse, TransportError> {
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| TransportError::SessionIo(format!("read from driver failed: {}", e)))?;

        if line.trim().is_empty() {
            return Err(TransportError::SessionIo(format!(
                "empty response to '{}' (driver may have exited)",
                command
            )));
        }

        serde_json::from_str(line.trim()).map_err(|source| TransportError::Json {
            context: format!("driver response to '{}'", command),
            source,
        })
    }

    /// Ask the driver to exit. Best effort: a dead driver is already quit.
    pub fn quit(&mut self) {
        if self.closed {
            return;
        }
        let _ = self.send(&DriverRequest::quit());
        self.closed = true;
        let _ = self.child.wait();
    }
}

impl SnapshotProvider for SessionSnapshot {
    fn take_snapshot(&mut self) -> Result<String, TransportError> {
        let response = self.send(&DriverRequest::snapshot())?;
        if !response.ok {
            return Err(TransportError::Protocol {
                command: "snapshot".into(),
                error: response.error.unwrap_or_else(|| "unknown error".into()),
            });
        }
        response.text.ok_or_else(|| TransportError::Protocol {
            command: "snapshot".into(),
            error: "no text in snapshot response".into(),
        })
    }
}

impl Drop for SessionSnapshot {
    fn drop(&mut self) {
        self.quit();
    }
}
