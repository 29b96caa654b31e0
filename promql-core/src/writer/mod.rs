//! Result writers
//!
//! Each query result kind is wrapped in a type that knows how to render
//! itself as JSON and CSV ([`Render`]), and additionally as an aligned table
//! ([`TableRender`]) or as ASCII graphs ([`GraphRender`]). The dispatchers
//! pick the rendering from [`RenderOptions`], build the complete output in
//! memory and only then write it.
//!
//! - [`instant`] - point-in-time samples
//! - [`range`] - series with value histories
//! - [`names`] - metric name and label name lists
//! - [`meta`] - metric metadata
//! - [`series`] - label sets from the series endpoint

mod instant;
mod meta;
mod names;
mod range;
mod series;

pub use instant::InstantResult;
pub use meta::MetaResult;
pub use names::{LabelsResult, MetricsResult};
pub use range::RangeResult;
pub use series::SeriesResult;

use crate::error::{RenderError, Result};
use crate::term::{terminal_size, TermDimensions};
use std::io::Write;
use std::str::FromStr;
use tabwriter::TabWriter;

/// Spaces between aligned table columns
pub const COLUMN_PADDING: usize = 4;

/// Output format selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Table for instant-shaped results, graph for range results
    #[default]
    Default,
    Json,
    Csv,
}

impl OutputFormat {
    /// Lenient lookup: anything other than `json` or `csv` is the default
    pub fn from_name(name: &str) -> Self {
        match name {
            "json" => Self::Json,
            "csv" => Self::Csv,
            _ => Self::Default,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "" | "table" | "graph" => Ok(Self::Default),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!(
                "Invalid output format '{}'. Must be 'json' or 'csv'",
                s
            )),
        }
    }
}

/// Parameters of one render call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// Omit the header row from table and CSV output
    pub no_headers: bool,
}

impl RenderOptions {
    pub fn new(format: OutputFormat, no_headers: bool) -> Self {
        Self { format, no_headers }
    }
}

/// Renderings every result supports
pub trait Render {
    /// Compact JSON in the API's natural shape
    fn json(&self) -> Result<String>;

    /// Comma-separated records with lower-case headers
    fn csv(&self, no_headers: bool) -> Result<String>;
}

/// Results that can be shown as an aligned table
pub trait TableRender: Render {
    fn table(&self, no_headers: bool) -> Result<String>;
}

/// Results that can be drawn as ASCII graphs
pub trait GraphRender: Render {
    fn graph(&self, dims: TermDimensions) -> Result<String>;
}

/// Render an instant-shaped result: JSON, CSV or (by default) a table
pub fn render_instant<R: TableRender + ?Sized>(result: &R, options: &RenderOptions) -> Result<String> {
    match options.format {
        OutputFormat::Json => result.json(),
        OutputFormat::Csv => result.csv(options.no_headers),
        OutputFormat::Default => result.table(options.no_headers),
    }
}

/// Render a range-shaped result: JSON, CSV or (by default) graphs sized to
/// the current terminal
pub fn render_range<R: GraphRender + ?Sized>(result: &R, options: &RenderOptions) -> Result<String> {
    render_range_with(result, options, terminal_size)
}

/// [`render_range`] with a caller-supplied terminal size lookup.
///
/// The lookup only runs when graphs are rendered.
pub fn render_range_with<R, F>(result: &R, options: &RenderOptions, term_size: F) -> Result<String>
where
    R: GraphRender + ?Sized,
    F: FnOnce() -> Result<TermDimensions>,
{
    match options.format {
        OutputFormat::Json => result.json(),
        OutputFormat::Csv => result.csv(options.no_headers),
        OutputFormat::Default => result.graph(term_size()?),
    }
}

/// Render an instant-shaped result and write it to `out`
pub fn write_instant<R, W>(out: &mut W, result: &R, options: &RenderOptions) -> Result<()>
where
    R: TableRender + ?Sized,
    W: Write,
{
    let buf = render_instant(result, options)?;
    write_output(out, &buf)
}

/// Render a range-shaped result and write it to `out`
pub fn write_range<R, W>(out: &mut W, result: &R, options: &RenderOptions) -> Result<()>
where
    R: GraphRender + ?Sized,
    W: Write,
{
    let buf = render_range(result, options)?;
    write_output(out, &buf)
}

/// Write a rendered buffer, terminated by exactly one newline
pub(crate) fn write_output<W: Write>(out: &mut W, buf: &str) -> Result<()> {
    out.write_all(buf.as_bytes())?;
    if !buf.is_empty() && !buf.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush().map_err(RenderError::from)
}

/// Header and body cells shared by the table and CSV renderings
pub(crate) trait Records {
    /// Column names as they appear in CSV output
    fn headers(&self) -> Vec<String>;

    /// Body rows, one cell per header
    fn records(&self) -> Vec<Vec<String>>;
}

/// Aligned table with upper-cased headers.
///
/// Cells are tab-separated and aligned by an elastic tab stop writer: every
/// cell but the last of its row is padded to its column's widest cell plus
/// [`COLUMN_PADDING`].
pub(crate) fn records_table<R: Records + ?Sized>(result: &R, no_headers: bool) -> Result<String> {
    let mut writer = TabWriter::new(Vec::new())
        .minwidth(0)
        .padding(COLUMN_PADDING);

    if !no_headers {
        let headers: Vec<String> = result.headers().iter().map(|h| h.to_uppercase()).collect();
        writeln!(writer, "{}", headers.join("\t"))?;
    }
    for row in result.records() {
        writeln!(writer, "{}", row.join("\t"))?;
    }

    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|e| RenderError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))?;
    Ok(String::from_utf8(bytes)?)
}

/// CSV with minimal quoting and `\n` line endings
pub(crate) fn records_csv<R: Records + ?Sized>(result: &R, no_headers: bool) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if !no_headers {
        writer.write_record(result.headers())?;
    }
    for row in result.records() {
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}
