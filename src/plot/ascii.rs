//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks of a comparison in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - band edges (lower/upper bound): `-` lines
//! - reference curve: `.` line
//! - test samples: `o`
//! - test samples outside the band: `X`

use crate::compare::Comparison;
use crate::domain::Point;

/// Everything a plot can show, as plain point slices.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlotLayers<'a> {
    pub reference: &'a [Point],
    pub lower: &'a [Point],
    pub upper: &'a [Point],
    pub test: &'a [Point],
    pub violations: &'a [Point],
}

impl<'a> PlotLayers<'a> {
    pub fn from_comparison(run: &'a Comparison) -> Self {
        Self {
            reference: run.reference.points(),
            lower: run.band.lower().points(),
            upper: run.band.upper().points(),
            test: run.test.points(),
            violations: run.errors.original().points(),
        }
    }

    fn all(&self) -> impl Iterator<Item = &'a Point> {
        self.reference
            .iter()
            .chain(self.lower)
            .chain(self.upper)
            .chain(self.test)
            .chain(self.violations)
    }
}

/// Render a comparison run.
pub fn render_comparison(run: &Comparison, width: usize, height: usize) -> String {
    render_plot(&PlotLayers::from_comparison(run), width, height)
}

/// Render arbitrary layers on a `width` x `height` character grid.
pub fn render_plot(layers: &PlotLayers<'_>, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = range(layers.all().map(|p| p.x)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = range(layers.all().map(|p| p.y)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let frame = Frame {
        x_min,
        x_max,
        y_min,
        y_max,
    };

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so points can overlay.
    draw_curve(&mut grid, layers.upper, &frame, '-');
    draw_curve(&mut grid, layers.lower, &frame, '-');
    draw_curve(&mut grid, layers.reference, &frame, '.');

    for (points, ch) in [(layers.test, 'o'), (layers.violations, 'X')] {
        for p in points {
            let x = map_x(p.x, &frame, width);
            let y = map_y(p.y, &frame, height);
            grid[y][x] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.3}, {y_max:.3}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str("Legend: - band edges, . reference, o test, X outside band\n");

    out
}

struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max > min {
        Some((min, max))
    } else {
        Some((min - 0.5, max + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, frame: &Frame, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - frame.x_min) / (frame.x_max - frame.x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, frame: &Frame, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - frame.y_min) / (frame.y_max - frame.y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[Point], frame: &Frame, ch: char) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for p in curve {
        let x = map_x(p.x, frame, width);
        let y = map_y(p.y, frame, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, ch);
        } else if grid[y][x] == ' ' {
            grid[y][x] = ch;
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
