//! API models for the Prometheus HTTP API
//!
//! Every endpoint wraps its payload in the same envelope; the request
//! structs are encoded as URL query parameters.

use crate::model::{LabelSet, Metadata, QueryValue, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response envelope, tagged by `status`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ApiResponse<T> {
    #[serde(rename = "success")]
    Success {
        data: T,
        /// Non-fatal problems reported alongside the data
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
    #[serde(rename = "error")]
    Error {
        #[serde(rename = "errorType", default)]
        error_type: String,
        error: String,
    },
}

impl<T> ApiResponse<T> {
    /// Create a successful response without warnings
    pub fn success(data: T) -> Self {
        Self::Success {
            data,
            warnings: Vec::new(),
        }
    }

    /// Create an error response
    pub fn error(error_type: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Error {
            error_type: error_type.into(),
            error: error.into(),
        }
    }
}

/// Payload of `/api/v1/query` and `/api/v1/query_range`
pub type QueryResponse = QueryValue;

/// Payload of `/api/v1/label/<name>/values`
pub type LabelValuesResponse = Vec<String>;

/// Payload of `/api/v1/metadata`
pub type MetadataResponse = BTreeMap<String, Vec<Metadata>>;

/// Payload of `/api/v1/series`
pub type SeriesResponse = Vec<LabelSet>;

/// Instant query parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<Timestamp>,
}

/// Range query parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeQueryRequest {
    pub query: String,
    pub start: Timestamp,
    pub end: Timestamp,
    /// Resolution in seconds
    pub step: f64,
}

/// Series lookup parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRequest {
    #[serde(rename = "match[]")]
    pub matcher: String,
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Metadata lookup parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetadataRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let json = r#"{"status":"success","data":["up","node_load1"]}"#;
        let response: ApiResponse<LabelValuesResponse> = serde_json::from_str(json).unwrap();
        match response {
            ApiResponse::Success { data, warnings } => {
                assert_eq!(data, vec!["up", "node_load1"]);
                assert!(warnings.is_empty());
            }
            ApiResponse::Error { .. } => panic!("Expected success"),
        }
    }

    #[test]
    fn test_api_response_warnings() {
        let json = r#"{"status":"success","data":[],"warnings":["partial response"]}"#;
        let response: ApiResponse<SeriesResponse> = serde_json::from_str(json).unwrap();
        match response {
            ApiResponse::Success { warnings, .. } => assert_eq!(warnings, ["partial response"]),
            ApiResponse::Error { .. } => panic!("Expected success"),
        }
    }

    #[test]
    fn test_api_response_error() {
        let json = r#"{"status":"error","errorType":"bad_data","error":"parse error at char 4"}"#;
        let response: ApiResponse<QueryResponse> = serde_json::from_str(json).unwrap();
        match response {
            ApiResponse::Error { error_type, error } => {
                assert_eq!(error_type, "bad_data");
                assert_eq!(error, "parse error at char 4");
            }
            ApiResponse::Success { .. } => panic!("Expected error"),
        }
    }

    #[test]
    fn test_query_response_vector() {
        let json = r#"{
            "status": "success",
            "data": {
                "resultType": "vector",
                "result": [{"metric": {"__name__": "up", "job": "node"}, "value": [1700000000.5, "1"]}]
            }
        }"#;
        let response: ApiResponse<QueryResponse> = serde_json::from_str(json).unwrap();
        let ApiResponse::Success { data, .. } = response else {
            panic!("Expected success");
        };
        let QueryValue::Vector(samples) = data else {
            panic!("Expected vector");
        };
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].metric.get("job"), Some("node"));
        assert_eq!(samples[0].timestamp, Timestamp::from_millis(1_700_000_000_500));
    }

    #[test]
    fn test_metadata_response() {
        let json = r#"{
            "status": "success",
            "data": {"up": [{"type": "gauge", "help": "Target is up", "unit": ""}]}
        }"#;
        let response: ApiResponse<MetadataResponse> = serde_json::from_str(json).unwrap();
        let ApiResponse::Success { data, .. } = response else {
            panic!("Expected success");
        };
        assert_eq!(data["up"][0].metric_type, "gauge");
        assert_eq!(data["up"][0].help, "Target is up");
    }

    #[test]
    fn test_success_serialization_omits_empty_warnings() {
        let json = serde_json::to_string(&ApiResponse::success(vec!["a".to_string()])).unwrap();
        assert_eq!(json, r#"{"status":"success","data":["a"]}"#);
    }
}
