//! CLI configuration management
//!
//! Handles loading, saving and layering of the CLI configuration.

use crate::timerange::parse_duration;
use anyhow::{anyhow, Context, Result};
use promql_core::{default_config_path, OutputFormat, RenderOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// Prometheus server URL
    pub host: String,

    /// Output format override: empty, `json` or `csv`
    pub output: String,

    /// Default range query resolution
    pub step: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Omit table and CSV headers
    pub no_headers: bool,

    /// Enable debug logging
    pub verbose: bool,

    pub auth: AuthConfig,

    pub tls: TlsConfig,
}

/// `Authorization` header settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Scheme, e.g. `Bearer` or `Basic`
    #[serde(rename = "type")]
    pub auth_type: String,

    pub credentials: String,

    /// File holding the credentials, read on every run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<PathBuf>,
}

impl AuthConfig {
    pub fn is_empty(&self) -> bool {
        self.auth_type.is_empty() && self.credentials.is_empty() && self.credentials_file.is_none()
    }
}

/// TLS settings for HTTPS servers
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TlsConfig {
    /// PEM bundle of additional trusted CAs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert_file: Option<PathBuf>,

    /// PEM client certificate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<PathBuf>,

    /// PEM client key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,

    pub insecure_skip_verify: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:9090".to_string(),
            output: String::new(),
            step: "1m".to_string(),
            timeout: 10,
            no_headers: false,
            verbose: false,
            auth: AuthConfig::default(),
            tls: TlsConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from the default path, or defaults when absent
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from `path`
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize CLI config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> PathBuf {
        default_config_path()
    }

    /// Output format as understood by the renderers
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_name(&self.output)
    }

    /// Rendering parameters for the writers
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new(self.output_format(), self.no_headers)
    }

    /// Set one configuration value by its dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "host" => {
                ConfigBuilder::validate_host(value)?;
                self.host = value.to_string();
            }
            "output" => {
                ConfigBuilder::validate_output(value)?;
                self.output = value.to_string();
            }
            "step" => {
                ConfigBuilder::validate_step(value)?;
                self.step = value.to_string();
            }
            "timeout" => {
                let timeout = value
                    .parse()
                    .map_err(|_| anyhow!("Invalid timeout value. Must be a number"))?;
                ConfigBuilder::validate_timeout(timeout)?;
                self.timeout = timeout;
            }
            "no_headers" => self.no_headers = parse_bool(value),
            "verbose" => self.verbose = parse_bool(value),
            "auth.type" => self.auth.auth_type = value.to_string(),
            "auth.credentials" => self.auth.credentials = value.to_string(),
            "auth.credentials_file" => self.auth.credentials_file = non_empty_path(value),
            "tls.ca_cert_file" => self.tls.ca_cert_file = non_empty_path(value),
            "tls.cert_file" => self.tls.cert_file = non_empty_path(value),
            "tls.key_file" => self.tls.key_file = non_empty_path(value),
            "tls.insecure_skip_verify" => self.tls.insecure_skip_verify = parse_bool(value),
            _ => return Err(anyhow!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
///
/// Each layer overrides the values set by the layers before it, so the
/// `with_*` calls must be made in that order.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    host: Option<String>,
    output: Option<String>,
    step: Option<String>,
    timeout: Option<u64>,
    no_headers: Option<bool>,
    verbose: Option<bool>,
    auth_type: Option<String>,
    auth_credentials: Option<String>,
    auth_credentials_file: Option<PathBuf>,
    tls_ca_cert_file: Option<PathBuf>,
    tls_cert_file: Option<PathBuf>,
    tls_key_file: Option<PathBuf>,
    tls_insecure_skip_verify: Option<bool>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set server URL (with validation)
    pub fn with_host(mut self, host: impl Into<String>) -> Result<Self> {
        let host = host.into();
        Self::validate_host(&host)?;
        self.host = Some(host);
        Ok(self)
    }

    /// Set output format (with validation)
    pub fn with_output(mut self, output: impl Into<String>) -> Result<Self> {
        let output = output.into();
        Self::validate_output(&output)?;
        self.output = Some(output);
        Ok(self)
    }

    /// Set default range step (with validation)
    pub fn with_step(mut self, step: impl Into<String>) -> Result<Self> {
        let step = step.into();
        Self::validate_step(&step)?;
        self.step = Some(step);
        Ok(self)
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Set header suppression flag
    pub fn with_no_headers(mut self, no_headers: bool) -> Self {
        self.no_headers = Some(no_headers);
        self
    }

    /// Set verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn with_auth_type(mut self, auth_type: impl Into<String>) -> Self {
        self.auth_type = Some(auth_type.into());
        self
    }

    pub fn with_auth_credentials(mut self, credentials: impl Into<String>) -> Self {
        self.auth_credentials = Some(credentials.into());
        self
    }

    pub fn with_auth_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.auth_credentials_file = Some(path.into());
        self
    }

    pub fn with_tls_ca_cert_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls_ca_cert_file = Some(path.into());
        self
    }

    pub fn with_tls_cert_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls_cert_file = Some(path.into());
        self
    }

    pub fn with_tls_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls_key_file = Some(path.into());
        self
    }

    pub fn with_tls_insecure_skip_verify(mut self, skip: bool) -> Self {
        self.tls_insecure_skip_verify = Some(skip);
        self
    }

    /// Load configuration from file.
    ///
    /// With an explicit `path` the file must exist. Without one, the default
    /// location is used if a file is present there.
    pub fn with_config_file(self, path: Option<&Path>, load_file: bool) -> Result<Self> {
        if !load_file {
            return Ok(self);
        }

        let config = match path {
            Some(path) => CliConfig::load_from(path)?,
            None => CliConfig::load()?,
        };

        Ok(self.with_file_values(config))
    }

    fn with_file_values(mut self, config: CliConfig) -> Self {
        self.host = Some(config.host);
        self.output = Some(config.output);
        self.step = Some(config.step);
        self.timeout = Some(config.timeout);
        self.no_headers = Some(config.no_headers);
        self.verbose = Some(config.verbose);
        self.auth_type = Some(config.auth.auth_type);
        self.auth_credentials = Some(config.auth.credentials);
        self.auth_credentials_file = config.auth.credentials_file;
        self.tls_ca_cert_file = config.tls.ca_cert_file;
        self.tls_cert_file = config.tls.cert_file;
        self.tls_key_file = config.tls.key_file;
        self.tls_insecure_skip_verify = Some(config.tls.insecure_skip_verify);
        self
    }

    /// Apply environment variable overrides; invalid values are ignored
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(host) = std::env::var("PROMQL_HOST") {
            if Self::validate_host(&host).is_ok() {
                self.host = Some(host);
            }
        }

        if let Ok(output) = std::env::var("PROMQL_OUTPUT") {
            if Self::validate_output(&output).is_ok() {
                self.output = Some(output);
            }
        }

        if let Ok(step) = std::env::var("PROMQL_STEP") {
            if Self::validate_step(&step).is_ok() {
                self.step = Some(step);
            }
        }

        if let Ok(timeout) = std::env::var("PROMQL_TIMEOUT") {
            if let Ok(timeout) = timeout.parse() {
                if Self::validate_timeout(timeout).is_ok() {
                    self.timeout = Some(timeout);
                }
            }
        }

        if let Ok(no_headers) = std::env::var("PROMQL_NO_HEADERS") {
            self.no_headers = Some(parse_bool(&no_headers));
        }

        if let Ok(verbose) = std::env::var("PROMQL_VERBOSE") {
            self.verbose = Some(parse_bool(&verbose));
        }

        if let Ok(auth_type) = std::env::var("PROMQL_AUTH_TYPE") {
            self.auth_type = Some(auth_type);
        }

        if let Ok(credentials) = std::env::var("PROMQL_AUTH_CREDENTIALS") {
            self.auth_credentials = Some(credentials);
        }

        if let Ok(path) = std::env::var("PROMQL_AUTH_CREDENTIALS_FILE") {
            self.auth_credentials_file = non_empty_path(&path);
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = CliConfig::default();

        let host = self.host.unwrap_or(defaults.host);
        let output = self.output.unwrap_or(defaults.output);
        let step = self.step.unwrap_or(defaults.step);
        let timeout = self.timeout.unwrap_or(defaults.timeout);

        let auth = AuthConfig {
            auth_type: self.auth_type.unwrap_or_default(),
            credentials: self.auth_credentials.unwrap_or_default(),
            credentials_file: self.auth_credentials_file,
        };
        let tls = TlsConfig {
            ca_cert_file: self.tls_ca_cert_file,
            cert_file: self.tls_cert_file,
            key_file: self.tls_key_file,
            insecure_skip_verify: self.tls_insecure_skip_verify.unwrap_or_default(),
        };

        // Validate final values
        Self::validate_host(&host)?;
        Self::validate_output(&output)?;
        Self::validate_step(&step)?;
        Self::validate_timeout(timeout)?;
        Self::validate_auth(&auth)?;
        Self::validate_tls(&tls)?;

        Ok(CliConfig {
            host,
            output,
            step,
            timeout,
            no_headers: self.no_headers.unwrap_or(defaults.no_headers),
            verbose: self.verbose.unwrap_or(defaults.verbose),
            auth,
            tls,
        })
    }

    /// Validate URL format
    fn validate_host(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(anyhow!("Host URL cannot be empty"));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(anyhow!("Host URL must start with http:// or https://"));
        }

        Ok(())
    }

    /// Validate output format
    fn validate_output(output: &str) -> Result<()> {
        output
            .parse::<OutputFormat>()
            .map(|_| ())
            .map_err(|e| anyhow!(e))
    }

    /// Validate step duration
    fn validate_step(step: &str) -> Result<()> {
        let duration = parse_duration(step).context("Invalid step")?;
        if duration.is_zero() {
            return Err(anyhow!("Step must be greater than 0"));
        }
        Ok(())
    }

    /// Validate timeout value
    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(anyhow!("Timeout must be greater than 0"));
        }

        if timeout > 300 {
            return Err(anyhow!("Timeout must be less than or equal to 300 seconds"));
        }

        Ok(())
    }

    /// Validate authentication settings
    fn validate_auth(auth: &AuthConfig) -> Result<()> {
        if auth.is_empty() {
            return Ok(());
        }

        if auth.auth_type.is_empty() {
            return Err(anyhow!(
                "Please specify an authentication type, run promql --help for more details"
            ));
        }

        match (auth.credentials.is_empty(), &auth.credentials_file) {
            (false, Some(_)) => Err(anyhow!(
                "Please specify either auth credentials or an auth credentials file, not both"
            )),
            (true, None) => Err(anyhow!(
                "Authentication type '{}' requires credentials or a credentials file",
                auth.auth_type
            )),
            _ => Ok(()),
        }
    }

    /// Validate TLS settings
    fn validate_tls(tls: &TlsConfig) -> Result<()> {
        if tls.cert_file.is_some() != tls.key_file.is_some() {
            return Err(anyhow!(
                "A TLS client certificate and key must be given together"
            ));
        }
        Ok(())
    }
}
