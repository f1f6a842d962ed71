// File: crates/airviz-core/src/view.rs
// Summary: Per-chart zoom/pan transform over the time axis, tick-label granularity and atomic redraws.

use chrono::NaiveDate;
use tracing::debug;

use crate::axis::{Axis, TickGranularity};
use crate::config::ZoomConfig;
use crate::geometry::{step_after, Frame, Layout, Primitive};
use crate::scale::{TimeScale, ValueScale};
use crate::series::Series;
use crate::types::{date_to_millis, Millis, DAY_MS, MAX_ZOOM, MIN_ZOOM, TICK_SPACING_PX};

/// Horizontal zoom transform: screen `px' = px * k + x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub k: f64,
    pub x: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub const fn identity() -> Self {
        Self { k: 1.0, x: 0.0 }
    }

    #[inline]
    pub fn apply_x(&self, px: f64) -> f64 {
        px * self.k + self.x
    }

    #[inline]
    pub fn invert_x(&self, px: f64) -> f64 {
        (px - self.x) / self.k
    }

    /// Base scale with its domain replaced by what is visible under this
    /// transform. The pixel range is unchanged.
    pub fn rescale(&self, base: &TimeScale) -> TimeScale {
        let d0 = base.invert(self.invert_x(base.range.0));
        let d1 = base.invert(self.invert_x(base.range.1));
        base.with_domain((d0.min(d1), d0.max(d1)))
    }

    pub fn is_identity(&self) -> bool {
        self.k == 1.0 && self.x == 0.0
    }
}

/// Limits applied after every gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomBehavior {
    pub scale_extent: (f64, f64),
    /// Viewport, in pixels.
    pub extent: (f64, f64),
    /// Content bounds, in untransformed pixels. The viewport may not show
    /// anything outside them.
    pub translate_extent: (f64, f64),
}

impl ZoomBehavior {
    /// Viewport and content both span the plot's horizontal range.
    pub fn for_range(range: (f64, f64), zoom: &ZoomConfig) -> Self {
        Self { scale_extent: (zoom.min_scale, zoom.max_scale), extent: range, translate_extent: range }
    }

    pub fn clamp_scale(&self, k: f64) -> f64 {
        let (lo, hi) = self.scale_extent;
        if !k.is_finite() { lo } else { k.max(lo).min(hi) }
    }

    /// Shift `t` so the viewport stays inside the translate extent. When the
    /// content is narrower than the viewport it is centered instead.
    pub fn constrain(&self, t: ViewTransform) -> ViewTransform {
        let dx0 = t.invert_x(self.extent.0) - self.translate_extent.0;
        let dx1 = t.invert_x(self.extent.1) - self.translate_extent.1;
        let shift = if dx1 > dx0 {
            (dx0 + dx1) / 2.0
        } else if dx0 < 0.0 {
            dx0
        } else {
            dx1.max(0.0)
        };
        ViewTransform { k: t.k, x: t.x + t.k * shift }
    }
}

impl Default for ZoomBehavior {
    fn default() -> Self {
        Self { scale_extent: (MIN_ZOOM, MAX_ZOOM), extent: (0.0, 1.0), translate_extent: (0.0, 1.0) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Zoomed,
}

/// Label granularity for a visible domain: more than a year shows years,
/// more than a week shows months, otherwise full dates.
pub fn pick_tick_granularity(domain: (Millis, Millis)) -> TickGranularity {
    let days = (domain.1 - domain.0) / DAY_MS;
    if days > 365.0 {
        TickGranularity::Year
    } else if days > 7.0 {
        TickGranularity::MonthYear
    } else {
        TickGranularity::FullDate
    }
}

/// Reference instant for the initial zoom: the configured date when it
/// parses and falls inside the series, else the first point of the series.
pub fn default_reference(zoom: &ZoomConfig, series: &Series) -> Option<Millis> {
    let (first, last) = series.time_extent()?;
    zoom.reference_date
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .map(date_to_millis)
        .filter(|t| (first..=last).contains(t))
        .or(Some(first))
}

/// Zoom/pan state of one chart instance.
#[derive(Clone, Debug)]
pub struct ViewEngine {
    base: TimeScale,
    behavior: ZoomBehavior,
    transform: ViewTransform,
    layout: Layout,
    tick_spacing_px: f64,
}

impl ViewEngine {
    pub fn new(base: TimeScale, behavior: ZoomBehavior, layout: Layout) -> Self {
        Self { base, behavior, transform: ViewTransform::identity(), layout, tick_spacing_px: TICK_SPACING_PX }
    }

    /// Engine whose base scale maps `domain` onto the layout's plot width.
    pub fn for_domain(domain: (Millis, Millis), layout: Layout, zoom: &ZoomConfig) -> Self {
        let plot = layout.plot();
        let range = (plot.left, plot.right);
        Self::new(TimeScale::new(domain, range), ZoomBehavior::for_range(range, zoom), layout)
    }

    pub fn with_tick_spacing(mut self, px: f64) -> Self {
        if px > 0.0 {
            self.tick_spacing_px = px;
        }
        self
    }

    pub fn base(&self) -> &TimeScale {
        &self.base
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn state(&self) -> ViewState {
        if self.transform.is_identity() { ViewState::Idle } else { ViewState::Zoomed }
    }

    /// Set the scale to `k`, keeping the content under `anchor_px` fixed.
    pub fn scale_to(&mut self, k: f64, anchor_px: f64) {
        let k = self.behavior.clamp_scale(k);
        let p1 = self.transform.invert_x(anchor_px);
        self.set_transform(ViewTransform { k, x: anchor_px - p1 * k });
    }

    pub fn zoom_by(&mut self, factor: f64, anchor_px: f64) {
        self.scale_to(self.transform.k * factor, anchor_px);
    }

    /// Drag by `dx_px` screen pixels; positive moves the content right.
    pub fn pan_by(&mut self, dx_px: f64) {
        if !dx_px.is_finite() {
            return;
        }
        self.set_transform(ViewTransform { k: self.transform.k, x: self.transform.x + dx_px });
    }

    /// Install `t` after clamping its scale and constraining its translation.
    pub fn set_transform(&mut self, t: ViewTransform) {
        let k = self.behavior.clamp_scale(t.k);
        let x = if t.x.is_finite() { t.x } else { 0.0 };
        self.transform = self.behavior.constrain(ViewTransform { k, x });
    }

    pub fn reset(&mut self) {
        self.transform = ViewTransform::identity();
    }

    /// From identity, zoom to `factor` centered on the pixel where `reference`
    /// sits in the base scale.
    pub fn apply_default(&mut self, reference: Millis, factor: f64) {
        self.reset();
        self.scale_to(factor, self.base.map(reference));
        debug!(reference, k = self.transform.k, x = self.transform.x, "default zoom applied");
    }

    pub fn rescaled(&self) -> TimeScale {
        self.transform.rescale(&self.base)
    }

    pub fn visible_domain(&self) -> (Millis, Millis) {
        self.rescaled().domain
    }

    /// Geometry and axes for the current transform. Domain, clipped area and
    /// tick labels all derive from one rescaled scale.
    pub fn redraw(&self, series: &Series, color: usize) -> Frame {
        let x = self.rescaled();
        let plot = self.layout.plot();

        let (lo, hi) = series.value_extent().unwrap_or((0.0, 0.0));
        let y = ValueScale::new(plot.top, plot.bottom, lo.min(0.0), hi).nice(10);

        let visible = series.clip(x.domain);
        let max_points = (plot.width().max(1.0) as usize).saturating_mul(2).max(2);
        let visible = Series { channel: series.channel.clone(), points: visible.to_vec() }.downsample(max_points);
        let mapped: Vec<(f64, f64)> = visible.points.iter().map(|p| (x.map(p.t), y.map(p.v))).collect();

        let tick_count = (self.layout.width / self.tick_spacing_px).floor().max(1.0) as usize;
        let granularity = pick_tick_granularity(x.domain);

        let mut primitives = Vec::with_capacity(1);
        if !mapped.is_empty() {
            primitives.push(Primitive::Area {
                channel: series.channel.clone(),
                color,
                points: step_after(&mapped),
                baseline: y.map(0.0),
            });
        }

        Frame {
            title: series.channel.clone(),
            width: self.layout.width,
            height: self.layout.height,
            plot,
            primitives,
            x_axis: Axis::time("", &x, granularity, tick_count),
            y_axis: Axis::value(series.channel.clone(), &y, 10),
            legend: vec![series.channel.clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Insets;

    fn engine() -> ViewEngine {
        let layout = Layout::new(928, 400, Insets::default());
        ViewEngine::for_domain((0.0, 100.0 * DAY_MS), layout, &ZoomConfig::default())
    }

    #[test]
    fn identity_rescale_is_base() {
        let e = engine();
        assert_eq!(e.state(), ViewState::Idle);
        assert_eq!(e.visible_domain(), (0.0, 100.0 * DAY_MS));
    }

    #[test]
    fn scale_is_clamped() {
        let mut e = engine();
        e.scale_to(100.0, 400.0);
        assert_eq!(e.transform().k, 32.0);
        e.scale_to(0.1, 400.0);
        assert_eq!(e.transform().k, 1.0);
        assert_eq!(e.state(), ViewState::Idle);
    }

    #[test]
    fn anchor_stays_fixed() {
        let mut e = engine();
        let before = e.rescaled().invert(300.0);
        e.zoom_by(2.0, 300.0);
        let after = e.rescaled().invert(300.0);
        assert!((before - after).abs() < 1.0);
        assert_eq!(e.state(), ViewState::Zoomed);
    }

    #[test]
    fn constrain_pins_left_edge() {
        let b = ZoomBehavior::for_range((60.0, 868.0), &ZoomConfig::default());
        let t = b.constrain(ViewTransform { k: 2.0, x: 0.0 });
        assert!((t.invert_x(60.0) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn granularity_thresholds() {
        assert_eq!(pick_tick_granularity((0.0, 400.0 * DAY_MS)), TickGranularity::Year);
        assert_eq!(pick_tick_granularity((0.0, 30.0 * DAY_MS)), TickGranularity::MonthYear);
        assert_eq!(pick_tick_granularity((0.0, 7.0 * DAY_MS)), TickGranularity::FullDate);
    }
}
