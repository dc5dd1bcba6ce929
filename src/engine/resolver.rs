use tracing::{debug, info, warn};

use crate::cache::spatial::SpatialCache;
use crate::engine::config::EngineConfig;
use crate::engine::error::ResolveError;
use crate::engine::filter::{reduce_snapshot, render_line};
use crate::engine::model::{ElementDescriptor, Handle, ResolutionResult, Strategy};
use crate::fallback::LanguageModel;
use crate::fallback::prompt::{build_prompt, parse_answer};
use crate::matching::description::Description;
use crate::matching::resolver::LocalResolver;
use crate::snapshot::parser::SnapshotIndex;
use crate::snapshot::record::ElementRecord;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::ResolutionTrace;
use crate::transport::SnapshotProvider;

/// Resolves element descriptions to handles: cache, then local scoring,
/// then the optional language model, then `NotFound`.
///
/// The two I/O steps (snapshot fetch and model call) run one after the
/// other; the model is only asked once local resolution has come up empty.
pub struct ResolutionEngine {
    config: EngineConfig,
    local: LocalResolver,
    cache: SpatialCache,
    fallback: Option<Box<dyn LanguageModel>>,
    tracer: TraceLogger,
}

impl Default for ResolutionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ResolutionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            local: LocalResolver::with_min_score(config.min_score),
            config,
            cache: SpatialCache::new(),
            fallback: None,
            tracer: TraceLogger::disabled(),
        }
    }

    pub fn with_fallback(mut self, model: Box<dyn LanguageModel>) -> Self {
        self.fallback = Some(model);
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn cache(&self) -> &SpatialCache {
        &self.cache
    }

    /// Resolve one descriptor against a fresh snapshot from `provider`.
    ///
    /// Only a failing provider is an error; every other miss is `NotFound`.
    pub fn resolve(
        &self,
        descriptor: &ElementDescriptor,
        provider: &mut dyn SnapshotProvider,
    ) -> Result<ResolutionResult, ResolveError> {
        let mut trace = ResolutionTrace::now(descriptor);

        match self.escalate(descriptor, provider, &mut trace) {
            Ok(result) => {
                match &result {
                    ResolutionResult::Found {
                        handle, strategy, ..
                    } => info!(
                        description = %descriptor.description,
                        %strategy,
                        %handle,
                        "element resolved"
                    ),
                    ResolutionResult::NotFound {
                        attempted_strategies,
                    } => info!(
                        description = %descriptor.description,
                        attempted = ?attempted_strategies,
                        "element not found"
                    ),
                }
                self.tracer.log(&trace.with_result(&result));
                Ok(result)
            }
            Err(e) => {
                warn!("{}", e);
                self.tracer.log(&trace.with_transport_error(&e));
                Err(e)
            }
        }
    }

    fn escalate(
        &self,
        descriptor: &ElementDescriptor,
        provider: &mut dyn SnapshotProvider,
        trace: &mut ResolutionTrace,
    ) -> Result<ResolutionResult, ResolveError> {
        let desc = Description::parse(&descriptor.description);
        let mut attempted = vec![Strategy::Cache];
        let mut fetched: Option<SnapshotIndex> = None;

        // ---- 1. Cache, validated against a fresh element list ----
        if let Some(context) = descriptor.context.as_deref() {
            if let Some(cached) = self.cache.get(&descriptor.description, context) {
                let fresh = self.fetch(descriptor, provider, trace)?;
                if SpatialCache::validate(cached, fresh.records(), self.config.cache_radius_px) {
                    self.cache.mark_validated(&descriptor.description, context);
                    return Ok(ResolutionResult::Found {
                        handle: Handle::Position(cached),
                        strategy: Strategy::Cache,
                        score: None,
                        signals: vec![],
                    });
                }
                debug!(
                    x = cached.x,
                    y = cached.y,
                    "cached coordinate has no element nearby, falling through"
                );
                fetched = Some(fresh);
            }
        }

        // ---- 2. Local scoring, reusing the snapshot fetched above ----
        attempted.push(Strategy::Local);
        let index = match fetched {
            Some(index) => index,
            None => self.fetch(descriptor, provider, trace)?,
        };

        let actionable = index
            .records()
            .iter()
            .filter(|r| r.identifier.is_some() || r.position.is_some());

        let local_match = self
            .local
            .resolve_among(actionable, &desc)
            .and_then(|c| handle_for(&c.record).map(|handle| (c, handle)));

        if let Some((candidate, handle)) = local_match {
            if let (Some(context), Some(position)) =
                (descriptor.context.as_deref(), candidate.record.position)
            {
                self.cache.put(&descriptor.description, context, position);
            }

            return Ok(ResolutionResult::Found {
                handle,
                strategy: Strategy::Local,
                score: Some(candidate.score),
                signals: candidate.signal_labels(),
            });
        }
        debug!(description = %descriptor.description, "no local candidate above threshold");

        // ---- 3. Language model on a reduced snapshot ----
        if let Some(model) = &self.fallback {
            attempted.push(Strategy::Remote);
            if let Some((handle, reasoning)) = self.ask_model(model.as_ref(), &desc, &index) {
                return Ok(ResolutionResult::Found {
                    handle,
                    strategy: Strategy::Remote,
                    score: None,
                    signals: reasoning.into_iter().map(|r| format!("reasoning:{}", r)).collect(),
                });
            }
        }

        // ---- 4. Nothing left ----
        Ok(ResolutionResult::NotFound {
            attempted_strategies: attempted,
        })
    }

    fn fetch(
        &self,
        descriptor: &ElementDescriptor,
        provider: &mut dyn SnapshotProvider,
        trace: &mut ResolutionTrace,
    ) -> Result<SnapshotIndex, ResolveError> {
        let raw = provider
            .take_snapshot()
            .map_err(|source| ResolveError::Transport {
                description: descriptor.description.clone(),
                source,
            })?;

        let index = SnapshotIndex::parse(&raw);
        debug!(records = index.len(), fingerprint = index.fingerprint(), "snapshot parsed");
        trace.snapshot_fingerprint = Some(index.fingerprint().to_string());
        Ok(index)
    }

    fn ask_model(
        &self,
        model: &dyn LanguageModel,
        desc: &Description,
        index: &SnapshotIndex,
    ) -> Option<(Handle, Option<String>)> {
        let lines: Vec<String> = reduce_snapshot(index.records(), desc, &self.config.budgets)
            .into_iter()
            .map(|(i, record)| render_line(i, record))
            .collect();

        debug!(lines = lines.len(), action = ?desc.action, "asking language model");
        let prompt = build_prompt(desc, &lines);

        let Some(raw) = model.complete(&prompt) else {
            debug!("language model gave no answer");
            return None;
        };

        let Some(answer) = parse_answer(&raw) else {
            warn!(response = %raw, "malformed language model answer ignored");
            return None;
        };

        let identifier = answer.identifier.as_deref().unwrap_or_default();
        match handle_for_answer(index, identifier) {
            Some(handle) => Some((handle, answer.reasoning)),
            None => {
                warn!(identifier, "language model named an element not in the snapshot");
                None
            }
        }
    }
}

/// Identifier when the transport gave one, otherwise the coordinate.
fn handle_for(record: &ElementRecord) -> Option<Handle> {
    match (&record.identifier, record.position) {
        (Some(id), _) => Some(Handle::Identifier(id.clone())),
        (None, Some(position)) => Some(Handle::Position(position)),
        (None, None) => None,
    }
}

/// Map a model answer back onto the snapshot: a known uid, or a `ref=<index>`
/// pointing at a record with a coordinate.
fn handle_for_answer(index: &SnapshotIndex, identifier: &str) -> Option<Handle> {
    if let Some(record) = index.find_identifier(identifier) {
        return handle_for(record);
    }

    let reference = identifier.strip_prefix("ref=").unwrap_or(identifier);
    let position = index
        .records()
        .get(reference.trim().parse::<usize>().ok()?)?
        .position?;
    Some(Handle::Position(position))
}
