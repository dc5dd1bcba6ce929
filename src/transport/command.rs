use std::process::Command;

use tracing::{debug, warn};

use crate::transport::{SnapshotProvider, TransportError};

/// Runs a driver command once per snapshot and reads the dump from stdout.
#[derive(Debug, Clone)]
pub struct CommandSnapshot {
    program: String,
    args: Vec<String>,
}

impl CommandSnapshot {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Split a shell-like command line on whitespace (no quoting support).
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(parts.fold(Self::new(program), |cmd, arg| cmd.arg(arg)))
    }
}

impl SnapshotProvider for CommandSnapshot {
    fn take_snapshot(&mut self) -> Result<String, TransportError> {
        debug!(program = %self.program, args = ?self.args, "running snapshot command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| TransportError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(TransportError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }
        if !stderr.trim().is_empty() {
            warn!(program = %self.program, "{}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
