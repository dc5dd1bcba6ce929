use std::fmt;

use serde::{Deserialize, Serialize};

use crate::snapshot::record::Position;

/// What the action executor asks to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub description: String,
    /// Caller-chosen scope for cached coordinates, e.g. the current screen name.
    #[serde(default)]
    pub context: Option<String>,
}

impl ElementDescriptor {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Stable handle to the resolved element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Identifier(String),
    Position(Position),
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::Identifier(id) => write!(f, "uid={}", id),
            Handle::Position(p) => write!(f, "({}, {})", p.x, p.y),
        }
    }
}

/// Escalation tiers, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Cache,
    Local,
    Remote,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Cache => "cache",
            Strategy::Local => "local",
            Strategy::Remote => "remote",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All-or-nothing outcome of one resolution call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionResult {
    Found {
        handle: Handle,
        strategy: Strategy,
        /// Local score; cache and remote hits carry none.
        score: Option<u32>,
        #[serde(default)]
        signals: Vec<String>,
    },
    NotFound {
        attempted_strategies: Vec<Strategy>,
    },
}

impl ResolutionResult {
    pub fn is_found(&self) -> bool {
        matches!(self, ResolutionResult::Found { .. })
    }

    pub fn handle(&self) -> Option<&Handle> {
        match self {
            ResolutionResult::Found { handle, .. } => Some(handle),
            ResolutionResult::NotFound { .. } => None,
        }
    }

    pub fn strategy(&self) -> Option<Strategy> {
        match self {
            ResolutionResult::Found { strategy, .. } => Some(*strategy),
            ResolutionResult::NotFound { .. } => None,
        }
    }

    pub fn score(&self) -> Option<u32> {
        match self {
            ResolutionResult::Found { score, .. } => *score,
            ResolutionResult::NotFound { .. } => None,
        }
    }
}
