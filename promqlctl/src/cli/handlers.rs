//! Command execution handlers

use anyhow::{anyhow, Result};
use promql_core::{
    write_instant, write_range, InstantResult, LabelsResult, MetaResult, MetricsResult,
    RangeResult, SeriesResult, Timestamp,
};
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::client::PromClient;
use crate::config::{CliConfig, ConfigBuilder};
use crate::format::{format_config, format_success};
use crate::timerange::{before, parse_end, parse_start, parse_time, QueryRange, DEFAULT_SERIES_LOOKBACK};

use super::commands::*;

/// Build the configuration from defaults, config file, environment and
/// command-line flags, in increasing priority
pub fn load_config(cli: &Cli) -> Result<CliConfig> {
    let mut builder = CliConfig::builder()
        .with_config_file(cli.config.as_deref(), !cli.no_config)?
        .with_env_overrides();

    if let Some(ref host) = cli.host {
        builder = builder.with_host(host)?;
    }
    if let Some(ref output) = cli.output {
        builder = builder.with_output(output)?;
    }
    if let Some(ref step) = cli.step {
        builder = builder.with_step(step)?;
    }
    if let Some(timeout) = cli.timeout {
        builder = builder.with_timeout(timeout)?;
    }
    if cli.no_headers {
        builder = builder.with_no_headers(true);
    }
    if cli.verbose {
        builder = builder.with_verbose(true);
    }
    builder = apply_auth_args(builder, &cli.auth);
    builder = apply_tls_args(builder, &cli.tls);

    builder.build()
}

fn apply_auth_args(mut builder: ConfigBuilder, auth: &AuthArgs) -> ConfigBuilder {
    if let Some(ref auth_type) = auth.auth_type {
        builder = builder.with_auth_type(auth_type);
    }
    if let Some(ref credentials) = auth.auth_credentials {
        builder = builder.with_auth_credentials(credentials);
    }
    if let Some(ref path) = auth.auth_credentials_file {
        builder = builder.with_auth_credentials_file(path);
    }
    builder
}

fn apply_tls_args(mut builder: ConfigBuilder, tls: &TlsArgs) -> ConfigBuilder {
    if let Some(ref path) = tls.tls_ca_cert_file {
        builder = builder.with_tls_ca_cert_file(path);
    }
    if let Some(ref path) = tls.tls_cert_file {
        builder = builder.with_tls_cert_file(path);
    }
    if let Some(ref path) = tls.tls_key_file {
        builder = builder.with_tls_key_file(path);
    }
    if tls.tls_insecure_skip_verify {
        builder = builder.with_tls_insecure_skip_verify(true);
    }
    builder
}

/// Handle query command: a range query when `--start` is given, an instant
/// query otherwise
pub async fn handle_query<W: Write>(
    out: &mut W,
    client: &PromClient,
    config: &CliConfig,
    time: &TimeArgs,
    query: &str,
) -> Result<()> {
    let options = config.render_options();

    if let Some(ref start) = time.start {
        let range = QueryRange::parse(
            start,
            time.end.as_deref().unwrap_or("now"),
            &config.step,
            Timestamp::now(),
        )?;
        debug!(?range, query, "Running range query");

        let streams = client.range_query(query, &range).await?;
        write_range(out, &RangeResult::new(streams), &options)?;
    } else {
        let at = time.time.as_deref().map(parse_time).transpose()?;
        debug!(?at, query, "Running instant query");

        let samples = client.instant_query(query, at).await?;
        write_instant(out, &InstantResult::new(samples), &options)?;
    }

    Ok(())
}

/// Handle labels command
pub async fn handle_labels<W: Write>(
    out: &mut W,
    client: &PromClient,
    config: &CliConfig,
    time: &TimeArgs,
    query: &str,
) -> Result<()> {
    let at = time.time.as_deref().map(parse_time).transpose()?;
    let samples = client.instant_query(query, at).await?;

    write_instant(out, &LabelsResult::new(samples), &config.render_options())?;
    Ok(())
}

/// Handle metrics command
pub async fn handle_metrics<W: Write>(
    out: &mut W,
    client: &PromClient,
    config: &CliConfig,
) -> Result<()> {
    let names = client.metric_names().await?;

    write_instant(out, &MetricsResult::new(names), &config.render_options())?;
    Ok(())
}

/// Handle meta command
pub async fn handle_meta<W: Write>(
    out: &mut W,
    client: &PromClient,
    config: &CliConfig,
    metric: Option<&str>,
) -> Result<()> {
    let metadata = client.metadata(metric).await?;

    write_instant(out, &MetaResult::new(metadata), &config.render_options())?;
    Ok(())
}

/// Handle series command.
///
/// The window defaults to the 15 seconds before `--time` (or now).
pub async fn handle_series<W: Write>(
    out: &mut W,
    client: &PromClient,
    config: &CliConfig,
    time: &TimeArgs,
    matcher: &str,
) -> Result<()> {
    let at = match time.time.as_deref() {
        Some(t) => parse_time(t)?,
        None => Timestamp::now(),
    };
    let start = match time.start.as_deref() {
        Some(s) => parse_start(s, at)?,
        None => before(at, DEFAULT_SERIES_LOOKBACK),
    };
    let end = match time.end.as_deref() {
        Some(e) => parse_end(e, at)?,
        None => at,
    };
    debug!(%start, %end, matcher, "Looking up series");

    let series = client.series(matcher, start, end).await?;

    write_instant(out, &SeriesResult::new(series), &config.render_options())?;
    Ok(())
}

/// Handle config command.
///
/// `show` prints the effective configuration; `set` and `reset` edit the
/// config file at `path` (or the default location).
pub fn handle_config<W: Write>(
    out: &mut W,
    command: ConfigCommands,
    current_config: &CliConfig,
    path: Option<&Path>,
) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(CliConfig::config_path);

    match command {
        ConfigCommands::Show => {
            writeln!(out, "{}", format_config(current_config, &path)?)?;
        }
        ConfigCommands::Set { key, value } => {
            let mut config = if path.exists() {
                CliConfig::load_from(&path)?
            } else {
                CliConfig::default()
            };
            config.set(&key, &value)?;
            config.save_to(&path)?;
            writeln!(out, "{}", format_success(&format!("Set {} = {}", key, value)))?;
        }
        ConfigCommands::Reset => {
            CliConfig::default().save_to(&path)?;
            writeln!(out, "{}", format_success("Configuration reset to defaults"))?;
        }
    }

    Ok(())
}

/// The query to run when no subcommand was given
pub fn shorthand_query(cli: &Cli) -> Result<&str> {
    cli.query
        .as_deref()
        .ok_or_else(|| anyhow!("A query is required, run promql --help for usage"))
}

/// Generate shell completion script
pub fn generate_completion<W: Write>(out: &mut W, shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
}
