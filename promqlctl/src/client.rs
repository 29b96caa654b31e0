//! HTTP client for the Prometheus query API.

use crate::config::{AuthConfig, CliConfig, TlsConfig};
use crate::timerange::QueryRange;
use anyhow::{anyhow, Context, Result};
use promql_core::api::{
    ApiResponse, LabelValuesResponse, MetadataRequest, MetadataResponse, QueryRequest,
    QueryResponse, RangeQueryRequest, SeriesRequest, SeriesResponse,
};
use promql_core::{LabelSet, QueryValue, Sample, SampleStream, Timestamp, METRIC_NAME_LABEL};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Certificate, Client, ClientBuilder, Identity, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Normalize a server URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// HTTP client for the `/api/v1` endpoints of a Prometheus server.
///
/// Every response is decoded through the API envelope. Warnings attached
/// to a successful response are logged; error responses are turned into
/// errors carrying the server's `errorType` and message. Requests are not
/// retried.
///
/// # Examples
///
/// ```no_run
/// use promqlctl::client::PromClient;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = PromClient::with_timeout("http://localhost:9090", 10)?;
/// let samples = client.instant_query("up", None).await?;
/// println!("{} series are up", samples.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PromClient {
    client: Client,
    base_url: String,
}

impl PromClient {
    /// Create a client with only a request timeout
    pub fn with_timeout(host: &str, timeout_secs: u64) -> Result<Self> {
        let client = Self::client_builder(timeout_secs)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: normalize_url(host),
        })
    }

    /// Create a client from the CLI configuration: host, timeout,
    /// authorization and TLS settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a credentials, certificate or key file cannot be
    /// read or parsed.
    pub fn new(config: &CliConfig) -> Result<Self> {
        let mut builder = Self::client_builder(config.timeout);

        if let Some(header) = authorization_header(&config.auth)? {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, header);
            builder = builder.default_headers(headers);
        }

        builder = apply_tls(builder, &config.tls)?;

        let client = builder.build().context("Failed to create HTTP client")?;

        debug!(host = %config.host, timeout = config.timeout, "Created Prometheus client");

        Ok(Self {
            client,
            base_url: normalize_url(&config.host),
        })
    }

    fn client_builder(timeout_secs: u64) -> ClientBuilder {
        Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("promql/", env!("CARGO_PKG_VERSION")))
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Process an HTTP response and extract the API data.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The HTTP status code indicates failure (4xx or 5xx)
    /// - The response body cannot be read
    /// - The JSON cannot be deserialized
    /// - The API returns an error response
    async fn handle_response<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", endpoint))?;

        if !status.is_success() {
            // Prometheus reports query errors in the envelope with a 4xx/5xx status
            if let Ok(ApiResponse::Error { error_type, error }) =
                serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
            {
                return Err(api_error(endpoint, &error_type, &error));
            }

            let error_msg = match status {
                StatusCode::NOT_FOUND => format!("Endpoint {} not found", endpoint),
                StatusCode::BAD_REQUEST => format!("Bad request to {}: {}", endpoint, text),
                StatusCode::UNAUTHORIZED => format!("Unauthorized access to {}", endpoint),
                StatusCode::FORBIDDEN => format!("Access forbidden to {}", endpoint),
                StatusCode::INTERNAL_SERVER_ERROR => {
                    format!("Server error at {}: {}", endpoint, text)
                }
                StatusCode::SERVICE_UNAVAILABLE => format!("Service unavailable at {}", endpoint),
                _ => format!("HTTP {} error at {}: {}", status, endpoint, text),
            };
            return Err(anyhow!(error_msg));
        }

        let api_response: ApiResponse<T> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON response from {}", endpoint))?;

        match api_response {
            ApiResponse::Success { data, warnings } => {
                for warning in &warnings {
                    warn!(endpoint, "{}", warning);
                }
                Ok(data)
            }
            ApiResponse::Error { error_type, error } => Err(api_error(endpoint, &error_type, &error)),
        }
    }

    /// Send a GET request with URL-encoded parameters
    async fn get<T, Q>(&self, endpoint: &str, params: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = format!("{}/api/v1/{}", self.base_url, endpoint);
        debug!(%url, "Sending request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        Self::handle_response(response, endpoint).await
    }

    /// Evaluate `query` at `time` (server time when `None`)
    pub async fn query(&self, query: &str, time: Option<Timestamp>) -> Result<QueryValue> {
        let params = QueryRequest {
            query: query.to_string(),
            time,
        };
        self.get::<QueryResponse, _>("query", &params).await
    }

    /// Evaluate `query` at one instant, expecting a vector result
    pub async fn instant_query(&self, query: &str, time: Option<Timestamp>) -> Result<Vec<Sample>> {
        match self.query(query, time).await? {
            QueryValue::Vector(samples) => Ok(samples),
            other => Err(anyhow!(
                "Did not receive an instant vector result (got {})",
                other.type_name()
            )),
        }
    }

    /// Evaluate `query` over `range`, expecting a matrix result
    pub async fn range_query(&self, query: &str, range: &QueryRange) -> Result<Vec<SampleStream>> {
        let params = RangeQueryRequest {
            query: query.to_string(),
            start: range.start,
            end: range.end,
            step: range.step.as_secs_f64(),
        };

        match self.get::<QueryResponse, _>("query_range", &params).await? {
            QueryValue::Matrix(streams) => Ok(streams),
            other => Err(anyhow!(
                "Did not receive a range result (got {})",
                other.type_name()
            )),
        }
    }

    /// All values of label `name`
    pub async fn label_values(&self, name: &str) -> Result<Vec<String>> {
        let endpoint = format!("label/{}/values", name);
        self.get::<LabelValuesResponse, _>(&endpoint, &[] as &[(&str, &str)])
            .await
    }

    /// All metric names
    pub async fn metric_names(&self) -> Result<Vec<String>> {
        self.label_values(METRIC_NAME_LABEL).await
    }

    /// Metadata for `metric`, or for every metric when `None`
    pub async fn metadata(&self, metric: Option<&str>) -> Result<MetadataResponse> {
        let params = MetadataRequest {
            metric: metric.filter(|m| !m.is_empty()).map(str::to_string),
        };
        self.get::<MetadataResponse, _>("metadata", &params).await
    }

    /// Label sets of the series matching `matcher` between `start` and `end`
    pub async fn series(
        &self,
        matcher: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<LabelSet>> {
        let params = SeriesRequest {
            matcher: matcher.to_string(),
            start,
            end,
        };
        self.get::<SeriesResponse, _>("series", &params).await
    }
}

fn api_error(endpoint: &str, error_type: &str, error: &str) -> anyhow::Error {
    if error_type.is_empty() {
        anyhow!("Error querying {}: {}", endpoint, error)
    } else {
        anyhow!("Error querying {}: {}: {}", endpoint, error_type, error)
    }
}

/// `Authorization` header value for the configured scheme, if any
fn authorization_header(auth: &AuthConfig) -> Result<Option<HeaderValue>> {
    if auth.auth_type.is_empty() {
        return Ok(None);
    }

    let credentials = match &auth.credentials_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials file {}", path.display()))?
            .trim()
            .to_string(),
        None => auth.credentials.clone(),
    };

    let mut value = HeaderValue::from_str(&format!("{} {}", auth.auth_type, credentials))
        .context("Invalid characters in authorization credentials")?;
    value.set_sensitive(true);
    Ok(Some(value))
}

fn apply_tls(mut builder: ClientBuilder, tls: &TlsConfig) -> Result<ClientBuilder> {
    if let Some(path) = &tls.ca_cert_file {
        let pem = std::fs::read(path)
            .with_context(|| format!("Failed to read CA certificate {}", path.display()))?;
        let cert = Certificate::from_pem(&pem)
            .with_context(|| format!("Failed to parse CA certificate {}", path.display()))?;
        builder = builder.add_root_certificate(cert);
    }

    if let (Some(cert_path), Some(key_path)) = (&tls.cert_file, &tls.key_file) {
        let mut pem = std::fs::read(cert_path).with_context(|| {
            format!("Failed to read client certificate {}", cert_path.display())
        })?;
        pem.push(b'\n');
        pem.extend(
            std::fs::read(key_path)
                .with_context(|| format!("Failed to read client key {}", key_path.display()))?,
        );
        let identity = Identity::from_pem(&pem).context("Failed to parse client certificate")?;
        builder = builder.identity(identity);
    }

    if tls.insecure_skip_verify {
        warn!("TLS certificate verification is disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }

    Ok(builder)
}
