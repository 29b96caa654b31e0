//! ASCII line plots
//!
//! Draws a numeric series as a box-drawing line chart with a labelled
//! y-axis:
//!
//! ```text
//!  3.00 ┤  ╭
//!  2.00 ┤ ╭╯
//!  1.00 ┤╭╯
//!  0.00 ┼╯
//! ```
//!
//! The series is resampled to the requested width and scaled to the
//! requested height. Non-finite values leave gaps in the line.

/// Columns reserved left of the data area for the label and the axis
pub const DEFAULT_OFFSET: usize = 3;

/// Decimals printed on y-axis labels before magnitude adjustments
pub const DEFAULT_PRECISION: usize = 2;

/// Plot dimensions and axis settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotConfig {
    /// Number of data columns; 0 keeps the series length
    pub width: usize,
    /// Number of rows spanned by the value range
    pub height: usize,
    pub offset: usize,
    pub precision: usize,
}

impl PlotConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            offset: DEFAULT_OFFSET,
            precision: DEFAULT_PRECISION,
        }
    }
}

/// Width of the widest y-axis value a plot of `series` would print, at any
/// plot width.
///
/// Callers use this to leave room for the axis when fitting a plot to a
/// terminal.
pub fn axis_width(series: &[f64]) -> usize {
    let (min, max) = bounds(series);
    let precision = axis_precision(min, max, DEFAULT_PRECISION);
    label_width(min, max, precision)
}

/// Render `series` as a multi-line plot without a trailing newline
pub fn plot(series: &[f64], config: &PlotConfig) -> String {
    if series.is_empty() {
        return String::new();
    }

    let data = if config.width > 0 {
        interpolate(series, config.width)
    } else {
        series.to_vec()
    };

    let (min, max) = bounds(&data);
    let interval = (max - min).abs();
    let height = config.height.max(1);
    let offset = config.offset.max(2);

    let ratio = if interval != 0.0 {
        height as f64 / interval
    } else {
        1.0
    };
    let min2 = (min * ratio).round() as i64;
    let max2 = (max * ratio).round() as i64;
    let rows = (max2 - min2).unsigned_abs() as usize;

    // Resampling can skip extremes; size the labels from the input so they
    // match `axis_width`
    let (raw_min, raw_max) = bounds(series);
    let precision = axis_precision(raw_min, raw_max, config.precision);
    let label_width = label_width(raw_min, raw_max, precision);

    let mut labels = Vec::with_capacity(rows + 1);
    let mut axis = vec!['┤'; rows + 1];
    for row in 0..=rows {
        let magnitude = if rows > 0 {
            max - row as f64 * interval / rows as f64
        } else {
            max
        };
        labels.push(format!(
            "{:>width$.prec$}",
            magnitude,
            width = label_width + 1,
            prec = precision
        ));
    }
    if min2 <= 0 && max2 >= 0 {
        axis[rows - (-min2) as usize] = '┼';
    }

    // Level of a value counted up from the bottom row
    let level = |v: f64| -> Option<usize> {
        v.is_finite()
            .then(|| ((v * ratio).round() as i64 - min2) as usize)
    };

    let mut grid = vec![vec![' '; data.len()]; rows + 1];
    if let Some(y0) = level(data[0]) {
        axis[rows - y0] = '┼';
    }

    for x in 0..data.len().saturating_sub(1) {
        match (level(data[x]), level(data[x + 1])) {
            (None, None) => {}
            (None, Some(y1)) => grid[rows - y1][x] = '╶',
            (Some(y0), None) => grid[rows - y0][x] = '╴',
            (Some(y0), Some(y1)) if y0 == y1 => grid[rows - y0][x] = '─',
            (Some(y0), Some(y1)) => {
                if y0 > y1 {
                    grid[rows - y1][x] = '╰';
                    grid[rows - y0][x] = '╮';
                } else {
                    grid[rows - y1][x] = '╭';
                    grid[rows - y0][x] = '╯';
                }
                for y in y0.min(y1) + 1..y0.max(y1) {
                    grid[rows - y][x] = '│';
                }
            }
        }
    }

    let mut lines = Vec::with_capacity(rows + 1);
    for ((label, axis), cells) in labels.iter().zip(axis).zip(grid) {
        let lead = offset.saturating_sub(label.chars().count());
        let gap = (offset - 2).saturating_sub(lead);
        let mut line = String::new();
        line.extend(std::iter::repeat(' ').take(lead));
        line.push_str(label);
        line.extend(std::iter::repeat(' ').take(gap));
        line.push(axis);
        line.extend(cells);
        lines.push(line);
    }

    lines.join("\n")
}

/// Linearly resample `data` to exactly `count` points
fn interpolate(data: &[f64], count: usize) -> Vec<f64> {
    if count < 2 || data.len() < 2 {
        return vec![data[0]; count.max(1)];
    }

    let spring = (data.len() - 1) as f64 / (count - 1) as f64;
    let mut out = Vec::with_capacity(count);
    out.push(data[0]);
    for i in 1..count - 1 {
        let position = i as f64 * spring;
        let before = position.floor();
        let after = position.ceil();
        let (a, b) = (data[before as usize], data[after as usize]);
        out.push(a + (b - a) * (position - before));
    }
    out.push(data[data.len() - 1]);
    out
}

/// Minimum and maximum of the finite values; `(0, 0)` when there are none
fn bounds(data: &[f64]) -> (f64, f64) {
    let mut finite = data.iter().copied().filter(|v| v.is_finite());
    match finite.next() {
        Some(first) => finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))),
        None => (0.0, 0.0),
    }
}

/// Extra decimals for small magnitudes, none for large ones
fn axis_precision(min: f64, max: f64, base: usize) -> usize {
    let log_max = if min == 0.0 && max == 0.0 {
        -1.0
    } else {
        max.abs().max(min.abs()).log10()
    };

    if log_max < 0.0 {
        if log_max.fract() != 0.0 {
            base + log_max.abs() as usize
        } else {
            base + (log_max.abs() - 1.0) as usize
        }
    } else if log_max > 2.0 {
        0
    } else {
        base
    }
}

fn label_width(min: f64, max: f64, precision: usize) -> usize {
    let max_len = format!("{:.*}", precision, max).len();
    let min_len = format!("{:.*}", precision, min).len();
    max_len.max(min_len)
}
