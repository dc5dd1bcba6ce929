use serde::Serialize;

use crate::matching::description::Description;
use crate::matching::scorer::{MatchSignal, score_description};
use crate::snapshot::record::ElementRecord;

/// A record together with the score it earned against a description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub record: ElementRecord,
    pub score: u32,
    pub signals: Vec<MatchSignal>,
}

impl MatchCandidate {
    pub fn signal_labels(&self) -> Vec<String> {
        self.signals.iter().map(|s| s.to_string()).collect()
    }
}

/// Pure, synchronous best-match search over one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct LocalResolver {
    min_score: u32,
}

impl Default for LocalResolver {
    fn default() -> Self {
        Self { min_score: 1 }
    }
}

impl LocalResolver {
    /// A zero threshold would let meaningless records win, so it is raised to 1.
    pub fn with_min_score(min_score: u32) -> Self {
        Self {
            min_score: min_score.max(1),
        }
    }

    pub fn min_score(&self) -> u32 {
        self.min_score
    }

    pub fn resolve(&self, records: &[ElementRecord], description: &str) -> Option<MatchCandidate> {
        self.resolve_description(records, &Description::parse(description))
    }

    /// Highest score wins; on a tie the earlier record in snapshot order is kept.
    pub fn resolve_description(
        &self,
        records: &[ElementRecord],
        desc: &Description,
    ) -> Option<MatchCandidate> {
        self.resolve_among(records.iter(), desc)
    }

    /// Same scan over any sequence of records (e.g. only those with a handle).
    pub fn resolve_among<'a>(
        &self,
        records: impl IntoIterator<Item = &'a ElementRecord>,
        desc: &Description,
    ) -> Option<MatchCandidate> {
        let mut best: Option<(&ElementRecord, u32, Vec<MatchSignal>)> = None;

        for record in records {
            let breakdown = score_description(record, desc);
            let beats_best = match &best {
                Some((_, best_score, _)) => breakdown.score > *best_score,
                None => true,
            };
            if beats_best {
                best = Some((record, breakdown.score, breakdown.signals));
            }
        }

        let (record, score, signals) = best?;
        if score < self.min_score {
            return None;
        }

        Some(MatchCandidate {
            record: record.clone(),
            score,
            signals,
        })
    }

    /// Every candidate at or above the threshold, best first, ties in snapshot order.
    pub fn rank(&self, records: &[ElementRecord], description: &str) -> Vec<MatchCandidate> {
        let desc = Description::parse(description);

        let mut candidates: Vec<MatchCandidate> = records
            .iter()
            .filter_map(|record| {
                let breakdown = score_description(record, &desc);
                (breakdown.score >= self.min_score).then(|| MatchCandidate {
                    record: record.clone(),
                    score: breakdown.score,
                    signals: breakdown.signals,
                })
            })
            .collect();

        // sort_by is stable, so equal scores keep their scan order
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates
    }
}
