//! Test utilities for CLI testing
//!
//! Provides a mock Prometheus server serving a small fixed dataset.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use promql_core::api::{
    ApiResponse, LabelValuesResponse, MetadataResponse, QueryResponse, SeriesResponse,
};
use promql_core::{LabelSet, Metadata, QueryValue, Sample, SamplePair, SampleStream, Timestamp};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Evaluation time used when a request carries none
pub const MOCK_NOW_SECS: i64 = 1_700_000_000;

/// A request as seen by the mock server
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub path: String,
    pub params: HashMap<String, String>,
    pub authorization: Option<String>,
}

/// Mock server state
#[derive(Debug, Clone, Default)]
pub struct MockServerState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServerState {
    fn record(&self, path: &str, params: &HashMap<String, String>, headers: &HeaderMap) {
        let request = RecordedRequest {
            path: path.to_string(),
            params: params.clone(),
            authorization: headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        };
        self.requests.lock().unwrap().push(request);
    }

    /// Most recent request received
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Mock Prometheus server
#[derive(Debug)]
pub struct MockServer {
    state: MockServerState,
    port: u16,
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServer {
    /// Create a new mock server
    pub fn new() -> Self {
        Self {
            state: MockServerState::default(),
            port: 0, // Will be assigned when server starts
        }
    }

    /// Start the mock server and return the address
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = self.create_router();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let server_url = format!("http://127.0.0.1:{}", self.port);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        // Give the server a moment to start and verify it's running
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
        }

        Ok((self, server_url))
    }

    /// Get the server port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the server state
    pub fn state(&self) -> &MockServerState {
        &self.state
    }

    /// Create the mock server router
    fn create_router(&self) -> Router {
        Router::new()
            .route("/api/v1/query", get(query_handler))
            .route("/api/v1/query_range", get(query_range_handler))
            .route("/api/v1/label/:name/values", get(label_values_handler))
            .route("/api/v1/metadata", get(metadata_handler))
            .route("/api/v1/series", get(series_handler))
            .with_state(self.state.clone())
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

fn labels(pairs: &[(&str, &str)]) -> LabelSet {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

fn parse_secs(params: &HashMap<String, String>, key: &str) -> Option<Timestamp> {
    params
        .get(key)
        .and_then(|v| v.parse::<f64>().ok())
        .map(|secs| Timestamp::from_millis((secs * 1000.0).round() as i64))
}

fn bad_data(message: &str) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error("bad_data", message)),
    )
}

// Handler functions

async fn query_handler(
    State(state): State<MockServerState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<QueryResponse> {
    state.record("/api/v1/query", &params, &headers);

    let time = parse_secs(&params, "time").unwrap_or(Timestamp::from_secs(MOCK_NOW_SECS));
    let query = params.get("query").map(String::as_str).unwrap_or_default();

    match query {
        "up" => Ok(Json(ApiResponse::success(QueryValue::Vector(vec![
            Sample {
                metric: labels(&[("__name__", "up"), ("instance", "localhost:9090"), ("job", "prometheus")]),
                value: 1.0,
                timestamp: time,
            },
            Sample {
                metric: labels(&[("__name__", "up"), ("instance", "localhost:9100"), ("job", "node")]),
                value: 0.0,
                timestamp: time,
            },
        ])))),
        "scalar(1)" => Ok(Json(ApiResponse::success(QueryValue::Scalar(
            SamplePair::new(time, 1.0),
        )))),
        "warn" => Ok(Json(ApiResponse::Success {
            data: QueryValue::Vector(vec![]),
            warnings: vec!["results may be incomplete".to_string()],
        })),
        _ => Err(bad_data("parse error: unexpected end of input")),
    }
}

async fn query_range_handler(
    State(state): State<MockServerState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<QueryResponse> {
    state.record("/api/v1/query_range", &params, &headers);

    let (Some(start), Some(end)) = (parse_secs(&params, "start"), parse_secs(&params, "end"))
    else {
        return Err(bad_data("invalid parameter \"start\""));
    };
    let step_ms = params
        .get("step")
        .and_then(|v| v.parse::<f64>().ok())
        .map(|secs| (secs * 1000.0).round() as i64)
        .filter(|ms| *ms > 0)
        .ok_or_else(|| bad_data("invalid parameter \"step\""))?;

    let values = (start.millis()..=end.millis())
        .step_by(step_ms as usize)
        .enumerate()
        .map(|(i, ms)| SamplePair::new(Timestamp::from_millis(ms), (i % 4) as f64))
        .collect();

    Ok(Json(ApiResponse::success(QueryValue::Matrix(vec![
        SampleStream {
            metric: labels(&[("__name__", "up"), ("job", "prometheus")]),
            values,
        },
    ]))))
}

async fn label_values_handler(
    State(state): State<MockServerState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<LabelValuesResponse> {
    state.record(&format!("/api/v1/label/{}/values", name), &params, &headers);

    match name.as_str() {
        // Repeats can appear when several targets expose a metric
        "__name__" => Ok(Json(ApiResponse::success(vec![
            "node_load1".to_string(),
            "up".to_string(),
            "up".to_string(),
        ]))),
        _ => Ok(Json(ApiResponse::success(vec![]))),
    }
}

async fn metadata_handler(
    State(state): State<MockServerState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<MetadataResponse> {
    state.record("/api/v1/metadata", &params, &headers);

    let mut metadata = BTreeMap::new();
    metadata.insert(
        "up".to_string(),
        vec![Metadata {
            metric_type: "gauge".to_string(),
            help: "Whether the target is up".to_string(),
            unit: String::new(),
        }],
    );
    metadata.insert(
        "node_load1".to_string(),
        vec![Metadata {
            metric_type: "gauge".to_string(),
            help: "1m load average.".to_string(),
            unit: String::new(),
        }],
    );

    if let Some(metric) = params.get("metric") {
        metadata.retain(|name, _| name == metric);
    }

    Ok(Json(ApiResponse::success(metadata)))
}

async fn series_handler(
    State(state): State<MockServerState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<SeriesResponse> {
    state.record("/api/v1/series", &params, &headers);

    match params.get("match[]").map(String::as_str) {
        Some("up") => Ok(Json(ApiResponse::success(vec![
            labels(&[("__name__", "up"), ("instance", "localhost:9090"), ("job", "prometheus")]),
            labels(&[("__name__", "up"), ("instance", "localhost:9100"), ("job", "node")]),
        ]))),
        Some(_) => Ok(Json(ApiResponse::success(vec![]))),
        None => Err(bad_data("no match[] parameter provided")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_startup() {
        let server = MockServer::new();
        let (server, url) = server.start().await.unwrap();

        assert!(server.port() > 0);
        assert!(url.contains(&server.port().to_string()));
        assert_eq!(server.state().request_count(), 0);
    }

    #[tokio::test]
    async fn test_query_endpoint() {
        let (server, url) = MockServer::new().start().await.unwrap();

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/api/v1/query?query=up", url))
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        let json: ApiResponse<QueryResponse> = response.json().await.unwrap();

        match json {
            ApiResponse::Success {
                data: QueryValue::Vector(samples),
                ..
            } => {
                assert_eq!(samples.len(), 2);
                assert_eq!(samples[0].timestamp, Timestamp::from_secs(MOCK_NOW_SECS));
            }
            other => panic!("Expected vector response, got {:?}", other),
        }

        let request = server.state().last_request().unwrap();
        assert_eq!(request.path, "/api/v1/query");
        assert_eq!(request.params["query"], "up");
    }

    #[tokio::test]
    async fn test_query_error_envelope() {
        let (_, url) = MockServer::new().start().await.unwrap();

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/api/v1/query?query=sum(", url))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let json: ApiResponse<serde_json::Value> = response.json().await.unwrap();
        match json {
            ApiResponse::Error { error_type, .. } => assert_eq!(error_type, "bad_data"),
            _ => panic!("Expected error response"),
        }
    }
}
