use crate::cli::config::AppConfig;
use crate::engine::model::{ElementDescriptor, ResolutionResult};
use crate::engine::resolver::ResolutionEngine;
use crate::fallback::LanguageModel;
use crate::fallback::ollama::{DEFAULT_ENDPOINT, DEFAULT_MODEL, OllamaBackend};
use crate::matching::resolver::LocalResolver;
use crate::snapshot::parser::SnapshotIndex;
use crate::snapshot::record::ElementRecord;
use crate::trace::logger::TraceLogger;
use crate::transport::command::CommandSnapshot;
use crate::transport::{FileSnapshot, SnapshotProvider};

// ============================================================================
// inspect subcommand
// ============================================================================

pub fn cmd_inspect(snapshot_path: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(snapshot_path)?;
    let index = SnapshotIndex::parse(&raw);

    if json {
        for record in index.records() {
            println!("{}", serde_json::to_string(record)?);
        }
        return Ok(());
    }

    println!(
        "{} records, {} with coordinates (sha1 {})",
        index.len(),
        index.positions().count(),
        index.fingerprint()
    );
    for (i, record) in index.records().iter().enumerate() {
        println!("  {:>3} {}", i, format_record(record));
    }
    Ok(())
}

// ============================================================================
// score subcommand
// ============================================================================

pub fn cmd_score(
    snapshot_path: &str,
    description: &str,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(snapshot_path)?;
    let index = SnapshotIndex::parse(&raw);
    let ranked = LocalResolver::with_min_score(config.engine.min_score).rank(index.records(), description);

    if ranked.is_empty() {
        println!("No element scored for: {}", description);
        return Ok(());
    }

    for candidate in &ranked {
        println!(
            "{:>4}  {}  [{}]",
            candidate.score,
            format_record(&candidate.record),
            candidate.signal_labels().join(", ")
        );
    }
    Ok(())
}

// ============================================================================
// resolve subcommand
// ============================================================================

/// Resolve one description and return whether an element was found.
pub fn cmd_resolve(
    snapshot_path: Option<&str>,
    snapshot_cmd: Option<&str>,
    descriptor: &ElementDescriptor,
    fallback_name: &str,
    json: bool,
    config: &AppConfig,
    ollama_endpoint: Option<&str>,
    ollama_model: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut provider = build_provider(snapshot_path, snapshot_cmd)?;

    let mut engine = ResolutionEngine::new(config.engine.clone());
    if let Some(model) = build_fallback(fallback_name, ollama_endpoint, ollama_model)? {
        engine = engine.with_fallback(model);
    }
    if let Some(path) = &config.trace.path {
        engine = engine.with_tracer(TraceLogger::new(path));
    }

    let result = engine.resolve(descriptor, provider.as_mut())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_result(descriptor, &result));
    }

    Ok(result.is_found())
}

// ============================================================================
// Helpers
// ============================================================================

/// Build the snapshot provider from either a file path or a command line.
pub fn build_provider(
    snapshot_path: Option<&str>,
    snapshot_cmd: Option<&str>,
) -> Result<Box<dyn SnapshotProvider>, Box<dyn std::error::Error>> {
    match (snapshot_path, snapshot_cmd) {
        (Some(path), _) => Ok(Box::new(FileSnapshot::new(path))),
        (None, Some(line)) => CommandSnapshot::from_command_line(line)
            .map(|cmd| Box::new(cmd) as Box<dyn SnapshotProvider>)
            .ok_or_else(|| "empty --snapshot-cmd".into()),
        (None, None) => Err("either --snapshot or --snapshot-cmd is required".into()),
    }
}

/// Build the language-model fallback based on name.
pub fn build_fallback(
    name: &str,
    ollama_endpoint: Option<&str>,
    ollama_model: Option<&str>,
) -> Result<Option<Box<dyn LanguageModel>>, Box<dyn std::error::Error>> {
    match name {
        "none" => Ok(None),
        "llm" => {
            let endpoint = ollama_endpoint.unwrap_or(DEFAULT_ENDPOINT);
            let model = ollama_model.unwrap_or(DEFAULT_MODEL);
            Ok(Some(Box::new(OllamaBackend::new(endpoint, model))))
        }
        other => Err(format!("unknown fallback '{}' (expected none or llm)", other).into()),
    }
}

pub fn format_record(record: &ElementRecord) -> String {
    let handle = match (&record.identifier, record.position) {
        (Some(id), _) => format!("uid={}", id),
        (None, Some(p)) => format!("({}, {})", p.x, p.y),
        (None, None) => "-".to_string(),
    };
    format!("{:<8} {:<12} \"{}\"", record.role.as_str(), handle, record.text)
}

pub fn format_result(descriptor: &ElementDescriptor, result: &ResolutionResult) -> String {
    match result {
        ResolutionResult::Found {
            handle,
            strategy,
            score,
            signals,
        } => {
            let score = score.map(|s| format!(" score={}", s)).unwrap_or_default();
            let signals = if signals.is_empty() {
                String::new()
            } else {
                format!(" [{}]", signals.join(", "))
            };
            format!("{} via {}{}{}", handle, strategy, score, signals)
        }
        ResolutionResult::NotFound {
            attempted_strategies,
        } => {
            let attempted: Vec<&str> = attempted_strategies.iter().map(|s| s.as_str()).collect();
            format!(
                "element not found for description: {} (tried {})",
                descriptor.description,
                attempted.join(", ")
            )
        }
    }
}
