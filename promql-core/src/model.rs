//! Query result models
//!
//! These mirror the shapes returned by the Prometheus HTTP API and keep its
//! JSON encoding: timestamps are numbers of seconds and sample values are
//! strings, so a decoded result can be re-encoded without loss.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Label holding the metric name
pub const METRIC_NAME_LABEL: &str = "__name__";

/// Set of label name/value pairs identifying a series.
///
/// Keys are unique and kept in ascending order, so iteration and display are
/// stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(BTreeMap<String, String>);

impl LabelSet {
    /// Create an empty label set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Value of a label, if present
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Label names in ascending order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Name/value pairs in ascending name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LabelSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Prometheus notation: `name{a="x", b="y"}`
impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.get(METRIC_NAME_LABEL);
        let labels: Vec<String> = self
            .iter()
            .filter(|(k, _)| *k != METRIC_NAME_LABEL)
            .map(|(k, v)| format!("{}={:?}", k, v))
            .collect();

        match (name, labels.is_empty()) {
            (Some(name), true) => write!(f, "{}", name),
            (None, true) => write!(f, "{{}}"),
            (name, false) => write!(f, "{}{{{}}}", name.unwrap_or(""), labels.join(", ")),
        }
    }
}

/// Millisecond-precision point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn from_secs(secs: i64) -> Self {
        Self(secs * 1000)
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    pub fn millis(&self) -> i64 {
        self.0
    }

    /// The timestamp in the local time zone
    pub fn to_local(&self) -> DateTime<Local> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
            .unwrap_or_default()
            .with_timezone(&Local)
    }

    /// RFC 3339 with second precision, e.g. `2024-05-01T13:04:05+02:00`
    pub fn rfc3339(&self) -> String {
        self.to_local().to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Short human-readable stamp, e.g. `May  1 13:04:05`
    pub fn stamp(&self) -> String {
        self.to_local().format("%b %e %H:%M:%S").to_string()
    }
}

/// Seconds since the epoch, without a fractional part when whole
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.rem_euclid(1000) == 0 {
            write!(f, "{}", self.0.div_euclid(1000))
        } else {
            write!(f, "{}", self.0 as f64 / 1000.0)
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.rem_euclid(1000) == 0 {
            serializer.serialize_i64(self.0.div_euclid(1000))
        } else {
            serializer.serialize_f64(self.0 as f64 / 1000.0)
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Ok(Self((secs * 1000.0).round() as i64))
    }
}

/// Canonical string form of a sample value.
///
/// Shortest decimal representation without an exponent, or `NaN`, `+Inf`,
/// `-Inf` for non-finite values.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

/// Parse a sample value in the API's string encoding
pub fn parse_value(s: &str) -> Result<f64, std::num::ParseFloatError> {
    match s {
        "NaN" => Ok(f64::NAN),
        "+Inf" | "Inf" => Ok(f64::INFINITY),
        "-Inf" => Ok(f64::NEG_INFINITY),
        _ => s.parse(),
    }
}

/// One (timestamp, value) point of a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePair {
    pub timestamp: Timestamp,
    pub value: f64,
}

impl SamplePair {
    pub fn new(timestamp: Timestamp, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl Serialize for SamplePair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.timestamp)?;
        tuple.serialize_element(&format_value(self.value))?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for SamplePair {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (timestamp, value): (Timestamp, String) = Deserialize::deserialize(deserializer)?;
        let value = parse_value(&value)
            .map_err(|_| de::Error::custom(format!("invalid sample value: {:?}", value)))?;
        Ok(Self { timestamp, value })
    }
}

/// A single series value captured at one evaluation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SampleRepr", into = "SampleRepr")]
pub struct Sample {
    pub metric: LabelSet,
    pub value: f64,
    pub timestamp: Timestamp,
}

#[derive(Serialize, Deserialize)]
struct SampleRepr {
    metric: LabelSet,
    value: SamplePair,
}

impl From<SampleRepr> for Sample {
    fn from(repr: SampleRepr) -> Self {
        Self {
            metric: repr.metric,
            value: repr.value.value,
            timestamp: repr.value.timestamp,
        }
    }
}

impl From<Sample> for SampleRepr {
    fn from(sample: Sample) -> Self {
        Self {
            metric: sample.metric,
            value: SamplePair::new(sample.timestamp, sample.value),
        }
    }
}

/// A series with its value history, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleStream {
    pub metric: LabelSet,
    #[serde(default)]
    pub values: Vec<SamplePair>,
}

/// A string result: (evaluation time, value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringSample(pub Timestamp, pub String);

/// Metadata record for one metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "type")]
    pub metric_type: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub unit: String,
}

/// Result of a query, tagged by the API's `resultType`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resultType", content = "result", rename_all = "lowercase")]
pub enum QueryValue {
    Scalar(SamplePair),
    Vector(Vec<Sample>),
    Matrix(Vec<SampleStream>),
    String(StringSample),
}

impl QueryValue {
    /// The API's name for this result type
    pub fn type_name(&self) -> &'static str {
        match self {
            QueryValue::Scalar(_) => "scalar",
            QueryValue::Vector(_) => "vector",
            QueryValue::Matrix(_) => "matrix",
            QueryValue::String(_) => "string",
        }
    }
}
