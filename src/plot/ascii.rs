//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted curve: `-` line

use crate::domain::{ModelFit, Sample};
use crate::models::predict;

/// Render observed points with the fitted curve over the sample's x range.
pub fn render_ascii_plot(sample: &Sample, fit: &ModelFit, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = sample.x_range();
    let curve = sample_curve(fit, x_min, x_max, width);
    let points: Vec<(f64, f64)> = sample.pairs().collect();

    let (y_lo, y_hi) = y_range(&points, &curve).unwrap_or((0.0, 1.0));
    let x_scale = Scale::new(x_min, x_max, width);
    let y_scale = Scale::padded(y_lo, y_hi, 0.05, height);

    let mut grid = vec![vec![' '; width]; height];

    // Curve first so observed points overlay it.
    draw_curve(&mut grid, &curve, x_scale, y_scale);

    for &(x, y) in &points {
        grid[row_of(y_scale, y)][x_scale.cell(x)] = 'o';
    }

    let mut out = format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{:.2}, {:.2}]\n",
        y_scale.lo, y_scale.hi
    );
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    out
}

fn sample_curve(fit: &ModelFit, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x_min + u * (x_max - x_min);
            (x, predict(fit.model, x, fit.result.a, fit.result.b))
        })
        .filter(|(_, y)| y.is_finite())
        .collect()
}

fn y_range(points: &[(f64, f64)], curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let (lo, hi) = points
        .iter()
        .chain(curve)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    (lo.is_finite() && hi.is_finite() && hi > lo).then_some((lo, hi))
}

/// Maps a data interval onto `cells` grid positions, clamping at the edges.
#[derive(Debug, Clone, Copy)]
struct Scale {
    lo: f64,
    hi: f64,
    cells: usize,
}

impl Scale {
    fn new(lo: f64, hi: f64, cells: usize) -> Self {
        Self {
            lo,
            hi,
            cells: cells.max(2),
        }
    }

    /// Widen both ends by `frac` of the span.
    fn padded(lo: f64, hi: f64, frac: f64, cells: usize) -> Self {
        let pad = ((hi - lo).abs() * frac).max(1e-12);
        Self::new(lo - pad, hi + pad, cells)
    }

    fn cell(self, v: f64) -> usize {
        let u = ((v - self.lo) / (self.hi - self.lo)).clamp(0.0, 1.0);
        (u * (self.cells as f64 - 1.0)).round() as usize
    }
}

/// Grid row for `y`; row 0 is the top of the plot.
fn row_of(y_scale: Scale, y: f64) -> usize {
    y_scale.cells - 1 - y_scale.cell(y)
}

/// Mark each curve sample, filling the rows skipped since the previous sample
/// so steep segments stay connected.
fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_scale: Scale, y_scale: Scale) {
    let mut prev_row: Option<usize> = None;
    for &(x, y) in curve {
        let col = x_scale.cell(x);
        let row = row_of(y_scale, y);
        let (top, bottom) = match prev_row {
            Some(prev) if prev < row => (prev + 1, row),
            Some(prev) if prev > row => (row, prev - 1),
            _ => (row, row),
        };
        for cell in grid[top..=bottom].iter_mut().map(|r| &mut r[col]) {
            if *cell == ' ' {
                *cell = '-';
            }
        }
        prev_row = Some(row);
    }
}
