//! CLI command and subcommand definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Query Prometheus from the command line
#[derive(Parser, Debug)]
#[command(name = "promql")]
#[command(version, about = "Query Prometheus from the command line", long_about = None)]
pub struct Cli {
    /// Query to run; shorthand for `promql query <QUERY>`
    pub query: Option<String>,

    /// Prometheus server URL (overrides config file)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Output format override: json or csv (default: table for instant
    /// results, graph for range results)
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Omit table and CSV headers
    #[arg(long, global = true)]
    pub no_headers: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Range query resolution, e.g. 30s or 1m (default from config: 1m)
    #[arg(long, global = true)]
    pub step: Option<String>,

    /// Config file path (default: <config dir>/promql/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Don't load config file
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub time: TimeArgs,

    #[command(flatten)]
    pub auth: AuthArgs,

    #[command(flatten)]
    pub tls: TlsArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Evaluation time and range selection
#[derive(Args, Debug, Clone, Default)]
pub struct TimeArgs {
    /// Evaluation time for instant queries (RFC 3339 or Unix seconds,
    /// default: now)
    #[arg(long, global = true)]
    pub time: Option<String>,

    /// Range start, as a lookback (e.g. 1h) or RFC 3339 time. Turns a query
    /// into a range query
    #[arg(long, global = true)]
    pub start: Option<String>,

    /// Range end: `now` or an RFC 3339 time
    #[arg(long, global = true)]
    pub end: Option<String>,
}

/// Authorization header settings
#[derive(Args, Debug, Clone, Default)]
pub struct AuthArgs {
    /// Authorization scheme, e.g. Bearer or Basic
    #[arg(long, global = true)]
    pub auth_type: Option<String>,

    /// Authorization credentials
    #[arg(long, global = true)]
    pub auth_credentials: Option<String>,

    /// File to read the authorization credentials from
    #[arg(long, global = true)]
    pub auth_credentials_file: Option<PathBuf>,
}

/// TLS settings
#[derive(Args, Debug, Clone, Default)]
pub struct TlsArgs {
    /// PEM file of additional CA certificates to trust
    #[arg(long, global = true)]
    pub tls_ca_cert_file: Option<PathBuf>,

    /// PEM client certificate
    #[arg(long, global = true)]
    pub tls_cert_file: Option<PathBuf>,

    /// PEM client key
    #[arg(long, global = true)]
    pub tls_key_file: Option<PathBuf>,

    /// Skip server certificate verification
    #[arg(long, global = true)]
    pub tls_insecure_skip_verify: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an instant query, or a range query when --start is given
    Query {
        /// PromQL expression
        query: String,
    },

    /// List the label names present in a query's result
    Labels {
        /// PromQL expression
        query: String,
    },

    /// List all metric names
    Metrics,

    /// Show type, help and unit metadata for metrics
    Meta {
        /// Metric name (default: all metrics)
        metric: Option<String>,
    },

    /// List the series matching a selector
    Series {
        /// Series selector, e.g. 'up{job="node"}'
        #[arg(value_name = "MATCH")]
        matcher: String,
    },

    /// Show or manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value in the config file
    Set {
        /// Configuration key, e.g. host, timeout or auth.type
        key: String,
        /// Configuration value
        value: String,
    },

    /// Reset configuration file to defaults
    Reset,
}
