//! promql Core Library
//!
//! Result models, column discovery and output rendering for the promql
//! command-line client. The CLI crate fetches query results from the
//! Prometheus HTTP API and hands them to the writers defined here.

pub mod api;
pub mod error;
pub mod labels;
pub mod model;
pub mod paths;
pub mod plot;
pub mod term;
pub mod writer;

// Re-export commonly used types
pub use error::*;
pub use labels::unique_labels;
pub use model::*;
pub use paths::default_config_path;
pub use term::{terminal_size, TermDimensions};
pub use writer::{
    render_instant, render_range, render_range_with, write_instant, write_range, GraphRender,
    InstantResult, LabelsResult, MetaResult, MetricsResult, OutputFormat, RangeResult, Render,
    RenderOptions, SeriesResult, TableRender,
};
