// File: crates/airviz-core/src/geometry.rs
// Summary: Renderer-agnostic draw primitives, plot layout and the per-redraw Frame.

use crate::axis::Axis;
use crate::config::LayoutConfig;
use crate::types::Insets;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }
    pub fn width(&self) -> f64 { self.right - self.left }
    pub fn height(&self) -> f64 { self.bottom - self.top }
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// Surface size and margins of one chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub insets: Insets,
}

impl Layout {
    pub fn new(width: u32, height: u32, insets: Insets) -> Self {
        Self { width: width as f64, height: height as f64, insets }
    }

    /// Inner plotting rectangle.
    pub fn plot(&self) -> Rect {
        Rect::from_ltrb(
            self.insets.left as f64,
            self.insets.top as f64,
            (self.width - self.insets.right as f64).max(self.insets.left as f64),
            (self.height - self.insets.bottom as f64).max(self.insets.top as f64),
        )
    }
}

impl From<&LayoutConfig> for Layout {
    fn from(c: &LayoutConfig) -> Self {
        Self::new(c.width, c.height, c.insets)
    }
}

/// What a renderer draws. `color` is an index into the renderer's palette
/// (the channel's position in the chart's channel order).
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Filled region between `points` and the horizontal line `baseline`.
    Area { channel: String, color: usize, points: Vec<(f64, f64)>, baseline: f64 },
    /// Open stroked polyline.
    Path { channel: String, color: usize, points: Vec<(f64, f64)>, width: f64 },
    /// Filled rectangle (one stacked band).
    Rect { channel: String, color: usize, rect: Rect },
    /// Point marker; `highlighted` marks members of the current selection.
    Circle { channel: String, color: usize, cx: f64, cy: f64, r: f64, highlighted: bool },
    /// Outline of the brushed region.
    Brush { rect: Rect },
}

/// One complete redraw: geometry, axes and the clip rectangle, all computed
/// from the same state.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub plot: Rect,
    pub primitives: Vec<Primitive>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    /// Channel names in palette order, for the legend.
    pub legend: Vec<String>,
}

#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo { lo } else if v > hi { hi } else { v }
}

/// Vertices of a step-after curve: each value holds until the next x.
pub fn step_after(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(points.len() * 2);
    for (i, &(x, y)) in points.iter().enumerate() {
        out.push((x, y));
        if let Some(&(nx, _)) = points.get(i + 1) {
            out.push((nx, y));
        }
    }
    out
}
