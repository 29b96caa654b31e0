//! Error types for result rendering

use thiserror::Error;

/// Core error type for rendering operations
#[derive(Error, Debug)]
pub enum RenderError {
    /// Column discovery was asked about a result without label sets
    #[error("unable to parse metric labels: unknown query result type: {0}")]
    UnsupportedResult(&'static str),

    /// The terminal size lookup failed
    #[error("unable to determine terminal size: {0}")]
    TerminalSize(String),

    /// The terminal cannot fit a plot next to its y-axis labels
    #[error("terminal too small to draw a graph ({width}x{height})")]
    TerminalTooSmall { width: usize, height: usize },

    /// JSON encoding errors
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding errors
    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),

    /// Encoded output was not valid UTF-8
    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;

impl<W> From<csv::IntoInnerError<W>> for RenderError {
    fn from(err: csv::IntoInnerError<W>) -> Self {
        RenderError::Io(err.into_error())
    }
}
