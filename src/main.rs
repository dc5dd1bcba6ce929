use clap::Parser;
use element_resolution::cli::commands::{cmd_inspect, cmd_resolve, cmd_score};
use element_resolution::cli::config::{Cli, Commands, load_config};
use element_resolution::engine::model::ElementDescriptor;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref());

    // Resolve Ollama settings: CLI > config > defaults
    let ollama_endpoint = cli
        .ollama_endpoint
        .as_deref()
        .or(config.ollama.endpoint.as_deref());
    let ollama_model = cli
        .ollama_model
        .as_deref()
        .or(config.ollama.model.as_deref());

    match cli.command {
        Commands::Inspect { snapshot, json } => cmd_inspect(&snapshot, json)?,
        Commands::Score {
            snapshot,
            description,
        } => cmd_score(&snapshot, &description, &config)?,
        Commands::Resolve {
            snapshot,
            snapshot_cmd,
            description,
            context,
            fallback,
            json,
        } => {
            let mut descriptor = ElementDescriptor::new(description);
            descriptor.context = context;

            let found = cmd_resolve(
                snapshot.as_deref(),
                snapshot_cmd.as_deref(),
                &descriptor,
                &fallback,
                json,
                &config,
                ollama_endpoint,
                ollama_model,
            )?;
            if !found {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// RUST_LOG wins; otherwise -v raises the level from warn.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
