//! Range query results

use super::{records_csv, GraphRender, Records, Render};
use crate::error::{RenderError, Result};
use crate::labels::label_names;
use crate::model::{format_value, SampleStream};
use crate::plot::{self, PlotConfig};
use crate::term::TermDimensions;
use tracing::debug;

/// Columns taken by the plot's axis glyph, label padding and a spare column
/// so lines never touch the terminal edge
const GRAPH_DECORATION: usize = 4;

/// Fraction of the terminal height used by one plot
const GRAPH_HEIGHT_DIVISOR: usize = 5;

/// Columns taken by the header box borders and inner padding
const BOX_DECORATION: usize = 4;

/// Series returned by a range query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeResult(Vec<SampleStream>);

impl RangeResult {
    pub fn new(streams: Vec<SampleStream>) -> Self {
        Self(streams)
    }

    pub fn streams(&self) -> &[SampleStream] {
        &self.0
    }

    fn columns(&self) -> Vec<String> {
        label_names(self.0.iter().map(|s| &s.metric))
    }
}

impl From<Vec<SampleStream>> for RangeResult {
    fn from(streams: Vec<SampleStream>) -> Self {
        Self::new(streams)
    }
}

/// One row per sample, series by series
impl Records for RangeResult {
    fn headers(&self) -> Vec<String> {
        let mut headers = self.columns();
        headers.push("value".to_string());
        headers.push("timestamp".to_string());
        headers
    }

    fn records(&self) -> Vec<Vec<String>> {
        let columns = self.columns();
        let mut rows = Vec::new();
        for stream in &self.0 {
            let labels: Vec<String> = columns
                .iter()
                .map(|name| stream.metric.get(name).unwrap_or_default().to_string())
                .collect();
            for pair in &stream.values {
                let mut row = labels.clone();
                row.push(format_value(pair.value));
                row.push(pair.timestamp.rfc3339());
                rows.push(row);
            }
        }
        rows
    }
}

impl Render for RangeResult {
    fn json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    fn csv(&self, no_headers: bool) -> Result<String> {
        records_csv(self, no_headers)
    }
}

impl GraphRender for RangeResult {
    fn graph(&self, dims: TermDimensions) -> Result<String> {
        let mut out = String::new();

        for stream in &self.0 {
            let (Some(first), Some(last)) = (stream.values.first(), stream.values.last()) else {
                debug!(metric = %stream.metric, "Skipping series without samples");
                continue;
            };

            let data: Vec<f64> = stream.values.iter().map(|p| p.value).collect();
            let width = dims
                .width
                .checked_sub(GRAPH_DECORATION + plot::axis_width(&data))
                .filter(|w| *w > 0)
                .ok_or(RenderError::TerminalTooSmall {
                    width: dims.width,
                    height: dims.height,
                })?;
            let height = (dims.height / GRAPH_HEIGHT_DIVISOR).max(1);

            let header = [
                format!(
                    "TIME_RANGE: {} -> {}",
                    first.timestamp.stamp(),
                    last.timestamp.stamp()
                ),
                format!("METRIC:     {}", stream.metric),
            ];

            out.push('\n');
            out.push_str(&header_box(&header, dims.width));
            out.push_str(&plot::plot(&data, &PlotConfig::new(width, height)));
            out.push('\n');
        }

        Ok(out)
    }
}

/// Lines framed in a box no wider than `term_width`.
///
/// The horizontal border runs two cells past the longest line.
fn header_box(lines: &[String], term_width: usize) -> String {
    let limit = term_width.saturating_sub(BOX_DECORATION);
    let lines: Vec<String> = lines.iter().map(|l| truncate(l, limit)).collect();
    let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let border = "─".repeat(inner + 2);

    let mut out = format!("┌{}┐\n", border);
    for line in &lines {
        out.push_str(&format!("│ {:<inner$} │\n", line, inner = inner));
    }
    out.push_str(&format!("└{}┘\n", border));
    out
}

/// Cut `line` to at most `max` characters, marking the cut with `...`
fn truncate(line: &str, max: usize) -> String {
    if line.chars().count() <= max {
        return line.to_string();
    }
    if max <= 3 {
        return line.chars().take(max).collect();
    }
    let mut cut: String = line.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}
