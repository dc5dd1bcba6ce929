use serde::{Deserialize, Serialize};

use crate::matching::description::ActionKind;

/// Tunables of the resolution engine. Every field has a default, so a partial
/// `engine:` section in the config file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Max distance between a cached coordinate and a fresh element.
    #[serde(default = "default_radius")]
    pub cache_radius_px: f64,

    /// Lowest score local resolution accepts (clamped to at least 1).
    #[serde(default = "default_min_score")]
    pub min_score: u32,

    /// Line budgets for the snapshot sent to the language model.
    #[serde(default)]
    pub budgets: SnapshotBudgets,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_radius_px: default_radius(),
            min_score: default_min_score(),
            budgets: SnapshotBudgets::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotBudgets {
    #[serde(default = "default_fill")]
    pub fill: usize,

    #[serde(default = "default_click")]
    pub click: usize,

    #[serde(default = "default_verify")]
    pub verify: usize,

    #[serde(default = "default_other")]
    pub other: usize,
}

impl Default for SnapshotBudgets {
    fn default() -> Self {
        Self {
            fill: default_fill(),
            click: default_click(),
            verify: default_verify(),
            other: default_other(),
        }
    }
}

impl SnapshotBudgets {
    pub fn for_action(&self, action: ActionKind) -> usize {
        match action {
            ActionKind::Fill => self.fill,
            ActionKind::Click => self.click,
            ActionKind::Verify => self.verify,
            ActionKind::Other => self.other,
        }
    }
}

// Serde default helpers
fn default_radius() -> f64 { 30.0 }
fn default_min_score() -> u32 { 1 }
fn default_fill() -> usize { 50 }
fn default_click() -> usize { 60 }
fn default_verify() -> usize { 75 }
fn default_other() -> usize { 100 }
