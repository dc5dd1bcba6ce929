use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::engine::model::{ElementDescriptor, ResolutionResult, Strategy};

/// One line of the resolution trace (JSONL).
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionTrace {
    pub timestamp_ms: u128,

    pub description: String,
    pub context: Option<String>,
    pub snapshot_fingerprint: Option<String>,

    pub outcome: &'static str,
    pub strategy: Option<Strategy>,
    pub handle: Option<String>,
    pub score: Option<u32>,
    pub signals: Vec<String>,
    pub attempted: Vec<Strategy>,

    pub transport_error: Option<String>,
}

impl ResolutionTrace {
    pub fn now(descriptor: &ElementDescriptor) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            description: descriptor.description.clone(),
            context: descriptor.context.clone(),
            snapshot_fingerprint: None,
            outcome: "pending",
            strategy: None,
            handle: None,
            score: None,
            signals: vec![],
            attempted: vec![],
            transport_error: None,
        }
    }

    pub fn with_result(mut self, result: &ResolutionResult) -> Self {
        match result {
            ResolutionResult::Found {
                handle,
                strategy,
                score,
                signals,
            } => {
                self.outcome = "found";
                self.strategy = Some(*strategy);
                self.handle = Some(handle.to_string());
                self.score = *score;
                self.signals = signals.clone();
            }
            ResolutionResult::NotFound {
                attempted_strategies,
            } => {
                self.outcome = "not_found";
                self.attempted = attempted_strategies.clone();
            }
        }
        self
    }

    pub fn with_transport_error(mut self, error: impl ToString) -> Self {
        self.outcome = "transport_error";
        self.transport_error = Some(error.to_string());
        self
    }
}
