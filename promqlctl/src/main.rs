//! promql CLI
//!
//! Command-line interface for querying a Prometheus server.

use anyhow::Result;
use clap::Parser;
use promqlctl::cli::{
    generate_completion, handle_config, handle_labels, handle_meta, handle_metrics, handle_query,
    handle_series, load_config, shorthand_query, Cli, Commands,
};
use promqlctl::client::PromClient;
use promqlctl::config::CliConfig;
use std::io::Write;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build configuration using priority chain: defaults → file → env → CLI args
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.verbose);
    debug!(host = %config.host, output = %config.output_format().name(), "Configuration loaded");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match &cli.command {
        Some(Commands::Completion { shell }) => {
            generate_completion(&mut out, *shell);
            Ok(())
        }
        Some(Commands::Config { command }) => {
            handle_config(&mut out, command.clone(), &config, cli.config.as_deref())
        }
        _ => run_query_command(&mut out, &cli, &config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Commands that talk to the server
async fn run_query_command<W: Write>(out: &mut W, cli: &Cli, config: &CliConfig) -> Result<()> {
    let client = PromClient::new(config)?;

    match &cli.command {
        Some(Commands::Query { query }) => handle_query(out, &client, config, &cli.time, query).await,
        Some(Commands::Labels { query }) => {
            handle_labels(out, &client, config, &cli.time, query).await
        }
        Some(Commands::Metrics) => handle_metrics(out, &client, config).await,
        Some(Commands::Meta { metric }) => {
            handle_meta(out, &client, config, metric.as_deref()).await
        }
        Some(Commands::Series { matcher }) => {
            handle_series(out, &client, config, &cli.time, matcher).await
        }
        Some(Commands::Config { .. }) | Some(Commands::Completion { .. }) => Ok(()),
        None => handle_query(out, &client, config, &cli.time, shorthand_query(cli)?).await,
    }
}

/// Log to stderr so diagnostics never mix with rendered results
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
