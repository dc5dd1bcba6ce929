use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

use crate::snapshot::record::{ElementRecord, Position};

pub const DEFAULT_RADIUS_PX: f64 = 30.0;

/// A coordinate remembered for a `(description, context)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheEntry {
    pub position: Position,
    pub last_validated_at_ms: u128,
}

type CacheKey = (String, String);

/// Remembers where previously resolved elements were on screen.
///
/// The cache never validates itself: callers fetch a fresh element list and
/// run [`SpatialCache::validate`] before trusting a hit. Entries are
/// independent; concurrent `put`s on the same key are last-write-wins.
#[derive(Debug, Default)]
pub struct SpatialCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl SpatialCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, description: &str, context: &str) -> Option<Position> {
        self.entry(description, context).map(|e| e.position)
    }

    pub fn entry(&self, description: &str, context: &str) -> Option<CacheEntry> {
        self.lock().get(&key(description, context)).copied()
    }

    pub fn put(&self, description: &str, context: &str, position: Position) {
        self.lock().insert(
            key(description, context),
            CacheEntry {
                position,
                last_validated_at_ms: now_ms(),
            },
        );
    }

    /// Refresh the validation timestamp after a successful proximity check.
    pub fn mark_validated(&self, description: &str, context: &str) {
        if let Some(entry) = self.lock().get_mut(&key(description, context)) {
            entry.last_validated_at_ms = now_ms();
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// True iff some fresh element lies within `radius_px` of `candidate`.
    pub fn validate(candidate: Position, fresh: &[ElementRecord], radius_px: f64) -> bool {
        fresh
            .iter()
            .filter_map(|r| r.position)
            .any(|p| p.distance_to(&candidate) <= radius_px)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("spatial cache lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

fn key(description: &str, context: &str) -> CacheKey {
    (description.to_string(), context.to_string())
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
