use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::engine::config::EngineConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "element-resolution",
    version,
    about = "Resolve natural-language element descriptions against UI snapshots"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Ollama API endpoint
    #[arg(long, global = true)]
    pub ollama_endpoint: Option<String>,

    /// Ollama model name
    #[arg(long, global = true)]
    pub ollama_model: Option<String>,

    /// Path to config file (default: element-resolution.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a snapshot and list the element records
    Inspect {
        /// Snapshot text file
        #[arg(long)]
        snapshot: String,

        /// Print records as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Rank every element of a snapshot against a description
    Score {
        /// Snapshot text file
        #[arg(long)]
        snapshot: String,

        /// Element description, e.g. 'el botón "Comprar"'
        #[arg(short, long)]
        description: String,
    },

    /// Resolve a description to an element handle
    Resolve {
        /// Snapshot text file (re-read on every snapshot)
        #[arg(long, conflicts_with = "snapshot_cmd", required_unless_present = "snapshot_cmd")]
        snapshot: Option<String>,

        /// Command printing a snapshot to stdout
        #[arg(long)]
        snapshot_cmd: Option<String>,

        /// Element description
        #[arg(short, long)]
        description: String,

        /// Screen or page name scoping cached coordinates
        #[arg(long)]
        context: Option<String>,

        /// Remote fallback: none or llm
        #[arg(long, default_value = "none")]
        fallback: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `element-resolution.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OllamaConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    /// JSONL file receiving one line per resolution; tracing is off when unset.
    pub path: Option<String>,
}

// ============================================================================
// Config File Loading
// ============================================================================

pub const DEFAULT_CONFIG_PATH: &str = "element-resolution.yaml";

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}
