//! Query time parsing
//!
//! Evaluation times accept RFC 3339 or Unix seconds; range starts also
//! accept a lookback duration, range ends also accept `now`. Durations use
//! the Prometheus syntax: one or more `<number><unit>` pairs, e.g. `90s`,
//! `1h30m`, `2d`, `1w`, `1y`, `500ms`.

use anyhow::{anyhow, Context, Result};
use chrono::DateTime;
use promql_core::Timestamp;
use std::time::Duration;

/// Lookback window of the series command when no start is given
pub const DEFAULT_SERIES_LOOKBACK: Duration = Duration::from_secs(15);

/// A Prometheus year; humantime's `y` is a Julian year
const YEAR: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Parse a Prometheus duration such as `1h30m`.
///
/// A leading `<n>y` counts 365-day years; the remainder goes through
/// humantime, which also accepts long unit names such as `5min`.
pub fn parse_duration(s: &str) -> Result<Duration> {
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(anyhow!("Duration cannot be empty"));
    }
    if s.contains(char::is_whitespace) {
        return Err(anyhow!("Invalid duration '{}': unexpected whitespace", s));
    }

    let (years, rest) = match s.split_once('y') {
        Some((n, rest))
            if !n.is_empty()
                && n.bytes().all(|b| b.is_ascii_digit())
                && !rest.starts_with(|c: char| c.is_ascii_alphabetic()) =>
        {
            let n: u32 = n
                .parse()
                .with_context(|| format!("Invalid duration '{}'", s))?;
            let years = YEAR
                .checked_mul(n)
                .ok_or_else(|| anyhow!("Duration '{}' is too large", s))?;
            (years, rest)
        }
        _ => (Duration::ZERO, s),
    };

    let rest = if rest.is_empty() {
        Duration::ZERO
    } else {
        humantime::parse_duration(rest).with_context(|| format!("Invalid duration '{}'", s))?
    };

    years
        .checked_add(rest)
        .ok_or_else(|| anyhow!("Duration '{}' is too large", s))
}

/// Parse an evaluation time: RFC 3339 or (fractional) Unix seconds
pub fn parse_time(s: &str) -> Result<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Timestamp::from_millis(dt.timestamp_millis()));
    }
    match s.parse::<f64>() {
        Ok(secs) if secs.is_finite() => Ok(Timestamp::from_millis((secs * 1000.0).round() as i64)),
        _ => Err(anyhow!(
            "Invalid time '{}': expected RFC 3339 or Unix seconds",
            s
        )),
    }
}

/// Parse a range start: an absolute time, or a lookback from `now`
pub fn parse_start(s: &str, now: Timestamp) -> Result<Timestamp> {
    if let Ok(ts) = parse_time(s) {
        return Ok(ts);
    }
    let lookback = parse_duration(s)
        .with_context(|| format!("Unable to parse range start '{}'", s))?;
    Ok(before(now, lookback))
}

/// Parse a range end: `now` or an absolute time
pub fn parse_end(s: &str, now: Timestamp) -> Result<Timestamp> {
    if s.is_empty() || s == "now" {
        return Ok(now);
    }
    parse_time(s).with_context(|| format!("Unable to parse range end '{}'", s))
}

/// `ts` moved back by `by`
pub fn before(ts: Timestamp, by: Duration) -> Timestamp {
    let millis = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
    Timestamp::from_millis(ts.millis().saturating_sub(millis))
}

/// Start, end and resolution of a range query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryRange {
    pub start: Timestamp,
    pub end: Timestamp,
    pub step: Duration,
}

impl QueryRange {
    /// Resolve user-supplied range flags against `now`
    pub fn parse(start: &str, end: &str, step: &str, now: Timestamp) -> Result<Self> {
        let start = parse_start(start, now)?;
        let end = parse_end(end, now)?;
        let step = parse_duration(step).context("Unable to parse step duration")?;

        if step.is_zero() {
            return Err(anyhow!("Step must be greater than 0"));
        }
        if end < start {
            return Err(anyhow!("Range end must not be before range start"));
        }

        Ok(Self { start, end, step })
    }
}
