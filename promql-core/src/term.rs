//! Terminal geometry lookup
//!
//! Graphs are sized to the terminal they are printed in. The size is read by
//! running `stty size` against the inherited stdin, which prints
//! `<rows> <columns>`.

use crate::error::{RenderError, Result};
use std::process::{Command, Stdio};
use tracing::debug;

/// Height and width of a terminal in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermDimensions {
    pub height: usize,
    pub width: usize,
}

impl TermDimensions {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }
}

/// Query the size of the terminal attached to stdin.
///
/// Fails when stdin is not a terminal or `stty` is unavailable.
pub fn terminal_size() -> Result<TermDimensions> {
    let output = Command::new("stty")
        .arg("size")
        .stdin(Stdio::inherit())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| RenderError::TerminalSize(format!("failed to run stty: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RenderError::TerminalSize(format!(
            "stty exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let dims = parse_stty_size(&String::from_utf8_lossy(&output.stdout))?;
    debug!(height = dims.height, width = dims.width, "Read terminal size");
    Ok(dims)
}

/// Parse `stty size` output (`<rows> <columns>`)
pub(crate) fn parse_stty_size(output: &str) -> Result<TermDimensions> {
    let mut fields = output.split_whitespace();
    let (Some(rows), Some(cols), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(RenderError::TerminalSize(format!(
            "unexpected stty output: {:?}",
            output.trim()
        )));
    };

    let parse = |field: &str| {
        field
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| RenderError::TerminalSize(format!("invalid dimension: {:?}", field)))
    };

    Ok(TermDimensions::new(parse(rows)?, parse(cols)?))
}
