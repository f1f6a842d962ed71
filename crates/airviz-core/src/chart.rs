// File: crates/airviz-core/src/chart.rs
// Summary: Instance-scoped chart builders; each turns records plus its own interaction state into a Frame.

use tracing::debug;

use crate::aggregate::{aggregate, Granularity, Reducer};
use crate::axis::Axis;
use crate::config::{EngineConfig, ZoomConfig};
use crate::geometry::{clamp, Frame, Layout, Primitive, Rect};
use crate::record::CleanedRecord;
use crate::scale::{BandScale, TimeScale, ValueScale};
use crate::select::{BrushEvent, BrushState, BrushStatus, Selection, SelectionRegion};
use crate::series::{daily_select_points, SelectPoint, Series};
use crate::stack::build_stack;
use crate::types::{Millis, TICK_SPACING_PX};
use crate::view::{default_reference, pick_tick_granularity, ViewEngine, ViewTransform};

const VALUE_TICKS: usize = 10;
const LINE_WIDTH: f64 = 2.0;
const DOT_RADIUS: f64 = 3.0;

fn time_extent(points: &[SelectPoint]) -> (Millis, Millis) {
    match (points.first(), points.last()) {
        (Some(a), Some(b)) => (a.t, b.t),
        _ => (0.0, 1.0),
    }
}

fn max_value(points: &[SelectPoint], channels: &[String]) -> f64 {
    points
        .iter()
        .flat_map(|p| channels.iter().filter_map(|c| p.values.get(c).copied()))
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

fn tick_count(layout: &Layout, spacing_px: f64) -> usize {
    ((layout.width / spacing_px) as usize).max(2)
}

fn polyline(points: &[SelectPoint], channel: &str, x: &TimeScale, y: &ValueScale) -> Vec<(f64, f64)> {
    points
        .iter()
        .filter_map(|p| p.values.get(channel).map(|v| (x.map(p.t), y.map(*v))))
        .collect()
}

/// Stacked bars of per-bucket channel sums.
#[derive(Clone, Debug)]
pub struct StackedBarChart {
    pub channels: Vec<String>,
    pub granularity: Granularity,
    pub layout: Layout,
}

impl StackedBarChart {
    pub fn new(channels: Vec<String>, granularity: Granularity, layout: Layout) -> Self {
        Self { channels, granularity, layout }
    }

    pub fn frame(&self, records: &[CleanedRecord]) -> Frame {
        let buckets = aggregate(records, self.granularity, &self.channels, Reducer::Sum);
        let stack = build_stack(&buckets, &self.channels);
        let plot = self.layout.plot();

        let keys: Vec<String> = stack.buckets.iter().map(|b| b.key.clone()).collect();
        let x = BandScale::new(keys, (plot.left, plot.right), BandScale::DEFAULT_PADDING);
        let y = ValueScale::new(plot.top, plot.bottom, stack.domain.0, stack.domain.1).nice(VALUE_TICKS);

        let mut primitives = Vec::with_capacity(stack.buckets.len() * self.channels.len());
        for bucket in &stack.buckets {
            let Some(left) = x.position(&bucket.key) else { continue };
            for (color, layer) in bucket.layers.iter().enumerate() {
                let (a, b) = (y.map(layer.lower), y.map(layer.upper));
                primitives.push(Primitive::Rect {
                    channel: layer.channel.clone(),
                    color,
                    rect: Rect::from_ltrb(left, a.min(b), left + x.bandwidth(), a.max(b)),
                });
            }
        }

        Frame {
            title: format!("Totals by {}", self.granularity.label().to_lowercase()),
            width: self.layout.width,
            height: self.layout.height,
            plot,
            primitives,
            x_axis: Axis::band(self.granularity.label(), &x),
            y_axis: Axis::value("", &y, VALUE_TICKS),
            legend: self.channels.clone(),
        }
    }
}

/// Step area of one channel with its own zoom/pan state.
#[derive(Clone, Debug)]
pub struct ZoomableAreaChart {
    pub channel: String,
    pub color: usize,
    pub engine: ViewEngine,
    pub series: Series,
}

impl ZoomableAreaChart {
    /// Base domain is the series extent. The configured default zoom is
    /// applied immediately.
    pub fn new(records: &[CleanedRecord], channel: &str, color: usize, cfg: &EngineConfig) -> Self {
        let series = Series::from_records(records, channel);
        let domain = series.time_extent().unwrap_or((0.0, 1.0));
        let engine = ViewEngine::for_domain(domain, Layout::from(&cfg.layout), &cfg.zoom)
            .with_tick_spacing(cfg.tick_spacing_px);
        let mut chart = Self { channel: channel.to_string(), color, engine, series };
        chart.apply_default(&cfg.zoom);
        chart
    }

    pub fn apply_default(&mut self, zoom: &ZoomConfig) {
        if let Some(reference) = default_reference(zoom, &self.series) {
            self.engine.apply_default(reference, zoom.default_factor);
        }
    }

    pub fn frame(&self) -> Frame {
        self.engine.redraw(&self.series, self.color)
    }

    pub fn zoom_by(&mut self, factor: f64, anchor_px: f64) -> Frame {
        self.engine.zoom_by(factor, anchor_px);
        self.frame()
    }

    pub fn scale_to(&mut self, k: f64, anchor_px: f64) -> Frame {
        self.engine.scale_to(k, anchor_px);
        self.frame()
    }

    pub fn pan_by(&mut self, dx_px: f64) -> Frame {
        self.engine.pan_by(dx_px);
        self.frame()
    }

    pub fn set_transform(&mut self, t: ViewTransform) -> Frame {
        self.engine.set_transform(t);
        self.frame()
    }

    pub fn reset(&mut self) -> Frame {
        self.engine.reset();
        self.frame()
    }
}

/// Daily-mean lines with a dot per point and a rectangular brush.
#[derive(Clone, Debug)]
pub struct BrushLineChart {
    pub channels: Vec<String>,
    pub brush: BrushState,
    pub points: Vec<SelectPoint>,
    layout: Layout,
    tick_spacing_px: f64,
    x: TimeScale,
    y: ValueScale,
}

impl BrushLineChart {
    pub fn new(records: &[CleanedRecord], channels: Vec<String>, layout: Layout) -> Self {
        let points = daily_select_points(records, &channels);
        Self::from_points(points, channels, layout)
    }

    pub fn from_points(points: Vec<SelectPoint>, channels: Vec<String>, layout: Layout) -> Self {
        let plot = layout.plot();
        let x = TimeScale::new(time_extent(&points), (plot.left, plot.right));
        let y = ValueScale::new(plot.top, plot.bottom, 0.0, max_value(&points, &channels)).nice(VALUE_TICKS);
        Self { channels, brush: BrushState::new(), points, layout, tick_spacing_px: TICK_SPACING_PX, x, y }
    }

    pub fn with_tick_spacing(mut self, px: f64) -> Self {
        if px > 0.0 {
            self.tick_spacing_px = px;
        }
        self
    }

    pub fn scales(&self) -> (&TimeScale, &ValueScale) {
        (&self.x, &self.y)
    }

    pub fn status(&self) -> BrushStatus {
        self.brush.status()
    }

    /// Feed one pointer event and redraw.
    pub fn handle(&mut self, evt: BrushEvent) -> Frame {
        let plot = self.layout.plot();
        let evt = match evt {
            BrushEvent::PointerDown { x, y } => BrushEvent::PointerDown { x: clamp(x, plot.left, plot.right), y: clamp(y, plot.top, plot.bottom) },
            BrushEvent::PointerMove { x, y } => BrushEvent::PointerMove { x: clamp(x, plot.left, plot.right), y: clamp(y, plot.top, plot.bottom) },
            BrushEvent::PointerUp { x, y } => BrushEvent::PointerUp { x: clamp(x, plot.left, plot.right), y: clamp(y, plot.top, plot.bottom) },
            BrushEvent::Cancel => BrushEvent::Cancel,
        };
        self.brush.handle(evt, &self.x, &self.y, &self.points);
        self.frame()
    }

    /// Finish a brush in data space. `None` clears.
    pub fn brush_end(&mut self, region: Option<SelectionRegion>) -> (Selection, Frame) {
        let selection = self.brush.apply(region, &self.points).clone();
        debug!(points = selection.points.len(), channels = selection.active_channels.len(), "brush end");
        (selection, self.frame())
    }

    /// Finish a brush given in chart pixels.
    pub fn brush_pixels(&mut self, p0: (f64, f64), p1: (f64, f64)) -> (Selection, Frame) {
        self.brush_end(Some(SelectionRegion::from_pixels(p0, p1, &self.x, &self.y)))
    }

    pub fn clear(&mut self) -> Frame {
        self.brush.clear();
        self.frame()
    }

    pub fn frame(&self) -> Frame {
        let plot = self.layout.plot();
        let region = self.brush.region();
        let mut primitives = Vec::new();

        for (color, ch) in self.channels.iter().enumerate() {
            primitives.push(Primitive::Path {
                channel: ch.clone(),
                color,
                points: polyline(&self.points, ch, &self.x, &self.y),
                width: LINE_WIDTH,
            });
        }
        for (color, ch) in self.channels.iter().enumerate() {
            for p in &self.points {
                let Some(&v) = p.values.get(ch) else { continue };
                let highlighted = region.is_some_and(|r| r.contains_time(p.t) && r.contains_value(v));
                primitives.push(Primitive::Circle {
                    channel: ch.clone(),
                    color,
                    cx: self.x.map(p.t),
                    cy: self.y.map(v),
                    r: DOT_RADIUS,
                    highlighted,
                });
            }
        }
        if let Some(r) = region {
            let (l, rr) = (self.x.map(r.t0), self.x.map(r.t1));
            let (t, b) = (self.y.map(r.v1), self.y.map(r.v0));
            primitives.push(Primitive::Brush {
                rect: Rect::from_ltrb(
                    clamp(l.min(rr), plot.left, plot.right),
                    clamp(t.min(b), plot.top, plot.bottom),
                    clamp(l.max(rr), plot.left, plot.right),
                    clamp(t.max(b), plot.top, plot.bottom),
                ),
            });
        }

        let title = match self.brush.status() {
            BrushStatus::NoneDrawn => "Daily averages".to_string(),
            BrushStatus::DrawnEmpty => "Daily averages (no points in selection)".to_string(),
            BrushStatus::DrawnNonEmpty => {
                let sel = self.brush.selection();
                format!("Daily averages ({} days selected)", sel.points.len())
            }
        };

        Frame {
            title,
            width: self.layout.width,
            height: self.layout.height,
            plot,
            primitives,
            x_axis: Axis::time(
                "Date",
                &self.x,
                pick_tick_granularity(self.x.domain),
                tick_count(&self.layout, self.tick_spacing_px),
            ),
            y_axis: Axis::value("Level", &self.y, VALUE_TICKS),
            legend: self.channels.clone(),
        }
    }
}

/// Daily-mean line per channel on a shared time axis.
#[derive(Clone, Debug)]
pub struct MultiLineChart {
    pub channels: Vec<String>,
    pub layout: Layout,
    tick_spacing_px: f64,
}

impl MultiLineChart {
    pub fn new(channels: Vec<String>, layout: Layout) -> Self {
        Self { channels, layout, tick_spacing_px: TICK_SPACING_PX }
    }

    pub fn with_tick_spacing(mut self, px: f64) -> Self {
        if px > 0.0 {
            self.tick_spacing_px = px;
        }
        self
    }

    pub fn frame(&self, records: &[CleanedRecord]) -> Frame {
        let lines: Vec<Series> = self.channels.iter().map(|ch| Series::daily_means(records, ch)).collect();
        let plot = self.layout.plot();

        let domain = lines
            .iter()
            .filter_map(Series::time_extent)
            .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)))
            .unwrap_or((0.0, 1.0));
        let vmax = lines
            .iter()
            .filter_map(Series::value_extent)
            .map(|(_, hi)| hi)
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);
        let x = TimeScale::new(domain, (plot.left, plot.right));
        let y = ValueScale::new(plot.top, plot.bottom, 0.0, vmax).nice(VALUE_TICKS);

        let primitives = lines
            .iter()
            .enumerate()
            .map(|(color, s)| Primitive::Path {
                channel: s.channel.clone(),
                color,
                points: s.points.iter().map(|p| (x.map(p.t), y.map(p.v))).collect(),
                width: LINE_WIDTH,
            })
            .collect();

        Frame {
            title: "Daily averages".to_string(),
            width: self.layout.width,
            height: self.layout.height,
            plot,
            primitives,
            x_axis: Axis::time("", &x, pick_tick_granularity(x.domain), tick_count(&self.layout, self.tick_spacing_px)),
            y_axis: Axis::value("", &y, VALUE_TICKS),
            legend: self.channels.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Insets;
    use chrono::{NaiveDate, NaiveTime};

    fn rec(m: u32, d: u32, co: f64, nox: f64) -> CleanedRecord {
        CleanedRecord {
            date_text: String::new(),
            date: NaiveDate::from_ymd_opt(2004, m, d),
            time: NaiveTime::from_hms_opt(12, 0, 0),
            values: [("CO".to_string(), co), ("NOx".to_string(), nox)].into_iter().collect(),
        }
    }

    fn chans() -> Vec<String> {
        vec!["CO".into(), "NOx".into()]
    }

    fn layout() -> Layout {
        Layout::new(400, 200, Insets::default())
    }

    #[test]
    fn weekday_bars_have_seven_bands() {
        let chart = StackedBarChart::new(chans(), Granularity::DayOfWeek, layout());
        let f = chart.frame(&[rec(3, 10, 1.0, 2.0)]);
        assert_eq!(f.x_axis.ticks.len(), 7);
        assert_eq!(f.x_axis.ticks[0].label, "Monday");
        assert_eq!(f.primitives.len(), 14);
    }

    #[test]
    fn brush_chart_highlights_selection() {
        let mut c = BrushLineChart::new(&[rec(3, 10, 1.0, 50.0), rec(3, 11, 2.0, 60.0)], chans(), layout());
        assert_eq!(c.status(), BrushStatus::NoneDrawn);
        let day = NaiveDate::from_ymd_opt(2004, 3, 10).map(crate::types::date_to_millis).unwrap();
        let (sel, frame) = c.brush_end(Some(SelectionRegion::new((day, day), (0.0, 5.0))));
        assert_eq!(sel.points.len(), 1);
        assert_eq!(sel.active_channels.iter().collect::<Vec<_>>(), vec!["CO"]);
        let lit = frame.primitives.iter().filter(|p| matches!(p, Primitive::Circle { highlighted: true, .. })).count();
        assert_eq!(lit, 1);
        assert!(frame.primitives.iter().any(|p| matches!(p, Primitive::Brush { .. })));
        let (sel, _) = c.brush_end(None);
        assert!(sel.is_empty());
        assert_eq!(c.status(), BrushStatus::NoneDrawn);
    }

    #[test]
    fn short_brush_span_labels_full_dates() {
        let c = BrushLineChart::new(&[rec(3, 10, 1.0, 50.0), rec(3, 12, 2.0, 60.0)], chans(), layout());
        let f = c.frame();
        assert!(!f.x_axis.ticks.is_empty());
        assert!(f.x_axis.ticks.iter().all(|t| t.label.starts_with("Mar ") && t.label.ends_with(", 2004")));
    }

    #[test]
    fn line_ticks_follow_configured_spacing() {
        let recs: Vec<_> = (1..=31).chain(1..=29).enumerate().map(|(i, d)| rec(3 + (i / 31) as u32, d, 1.0, 2.0)).collect();
        let sparse = MultiLineChart::new(chans(), layout()).with_tick_spacing(400.0).frame(&recs);
        let dense = MultiLineChart::new(chans(), layout()).with_tick_spacing(40.0).frame(&recs);
        assert!(sparse.x_axis.ticks.len() < dense.x_axis.ticks.len());
        assert_eq!(dense.primitives.len(), 2);
        assert!(matches!(&dense.primitives[0], Primitive::Path { points, .. } if points.len() == 60));
    }

    #[test]
    fn zoom_chart_starts_zoomed() {
        let recs: Vec<_> = (1..=28).map(|d| rec(3, d, d as f64, 0.0)).collect();
        let mut cfg = EngineConfig::default();
        cfg.layout.width = 400;
        let mut chart = ZoomableAreaChart::new(&recs, "CO", 0, &cfg);
        assert_eq!(chart.engine.transform().k, 4.0);
        let a = chart.frame();
        assert_eq!(a, chart.frame());
        let b = chart.reset();
        assert_eq!(b.x_axis.min, chart.series.points[0].t);
    }
}
