// File: crates/airviz-core/src/select.rs
// Summary: Rectangular (time x value) region selection and the per-chart brush gesture state.

use std::collections::BTreeSet;

use crate::scale::{TimeScale, ValueScale};
use crate::series::SelectPoint;
use crate::types::Millis;

/// Inclusive rectangle in data space. Constructors normalize the bounds so
/// `t0 <= t1` and `v0 <= v1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionRegion {
    pub t0: Millis,
    pub t1: Millis,
    pub v0: f64,
    pub v1: f64,
}

impl SelectionRegion {
    pub fn new(time: (Millis, Millis), value: (f64, f64)) -> Self {
        Self {
            t0: time.0.min(time.1),
            t1: time.0.max(time.1),
            v0: value.0.min(value.1),
            v1: value.0.max(value.1),
        }
    }

    /// Region covered by a pixel rectangle on a chart with these scales.
    pub fn from_pixels(p0: (f64, f64), p1: (f64, f64), x: &TimeScale, y: &ValueScale) -> Self {
        Self::new((x.invert(p0.0), x.invert(p1.0)), (y.invert(p0.1), y.invert(p1.1)))
    }

    #[inline]
    pub fn contains_time(&self, t: Millis) -> bool {
        t >= self.t0 && t <= self.t1
    }

    #[inline]
    pub fn contains_value(&self, v: f64) -> bool {
        v >= self.v0 && v <= self.v1
    }
}

/// Points inside a region and the union of channels that matched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub points: Vec<SelectPoint>,
    pub active_channels: BTreeSet<String>,
}

impl Selection {
    /// The "nothing selected" result. Identical in shape to a selection that
    /// matched nothing; [`BrushState::status`] tells the two apart.
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Keep each point whose time lies in the region and which has at least one
/// channel value inside the value range. Bounds are inclusive.
pub fn select(points: &[SelectPoint], region: &SelectionRegion) -> Selection {
    let mut out = Selection::cleared();
    for p in points.iter().filter(|p| region.contains_time(p.t)) {
        let mut hit = false;
        for (ch, v) in &p.values {
            if region.contains_value(*v) {
                hit = true;
                if !out.active_channels.contains(ch) {
                    out.active_channels.insert(ch.clone());
                }
            }
        }
        if hit {
            out.points.push(p.clone());
        }
    }
    out
}

/// What the chart should say about the current brush.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushStatus {
    NoneDrawn,
    DrawnEmpty,
    DrawnNonEmpty,
}

/// Pointer input in chart pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BrushEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    /// Escape, or a click without drag.
    Cancel,
}

/// Brush state owned by one chart instance.
#[derive(Clone, Debug, Default)]
pub struct BrushState {
    anchor: Option<(f64, f64)>,
    cursor: Option<(f64, f64)>,
    region: Option<SelectionRegion>,
    selection: Selection,
}

impl BrushState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rectangle being dragged, in pixels, while a gesture is active.
    pub fn dragging(&self) -> Option<((f64, f64), (f64, f64))> {
        Some((self.anchor?, self.cursor?))
    }

    /// Bounds of the last completed brush, kept for display.
    pub fn region(&self) -> Option<&SelectionRegion> {
        self.region.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn status(&self) -> BrushStatus {
        match (&self.region, self.selection.is_empty()) {
            (None, _) => BrushStatus::NoneDrawn,
            (Some(_), true) => BrushStatus::DrawnEmpty,
            (Some(_), false) => BrushStatus::DrawnNonEmpty,
        }
    }

    /// Feed one pointer event. Returns `true` when the selection changed.
    /// A pointer-up with zero area counts as a cancel.
    pub fn handle(&mut self, evt: BrushEvent, x: &TimeScale, y: &ValueScale, points: &[SelectPoint]) -> bool {
        match evt {
            BrushEvent::PointerDown { x: px, y: py } => {
                self.anchor = Some((px, py));
                self.cursor = Some((px, py));
                false
            }
            BrushEvent::PointerMove { x: px, y: py } => {
                if self.anchor.is_some() {
                    self.cursor = Some((px, py));
                }
                false
            }
            BrushEvent::PointerUp { x: px, y: py } => {
                let Some(a) = self.anchor.take() else { return false };
                self.cursor = None;
                if a.0 == px && a.1 == py {
                    self.apply(None, points);
                } else {
                    self.apply(Some(SelectionRegion::from_pixels(a, (px, py), x, y)), points);
                }
                true
            }
            BrushEvent::Cancel => {
                self.anchor = None;
                self.cursor = None;
                self.apply(None, points);
                true
            }
        }
    }

    /// Replace the current brush. `None` clears it.
    pub fn apply(&mut self, region: Option<SelectionRegion>, points: &[SelectPoint]) -> &Selection {
        self.selection = match &region {
            Some(r) => select(points, r),
            None => Selection::cleared(),
        };
        self.region = region;
        &self.selection
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(t: f64, vals: &[(&str, f64)]) -> SelectPoint {
        SelectPoint { t, values: vals.iter().map(|(k, v)| (k.to_string(), *v)).collect() }
    }

    #[test]
    fn region_normalizes() {
        let r = SelectionRegion::new((5.0, 1.0), (9.0, -1.0));
        assert_eq!((r.t0, r.t1, r.v0, r.v1), (1.0, 5.0, -1.0, 9.0));
    }

    #[test]
    fn active_channels_are_a_union() {
        let pts = vec![pt(1.0, &[("a", 5.0), ("b", 50.0)]), pt(2.0, &[("a", 50.0), ("b", 6.0)])];
        let s = select(&pts, &SelectionRegion::new((0.0, 3.0), (0.0, 10.0)));
        assert_eq!(s.points.len(), 2);
        assert_eq!(s.active_channels.iter().cloned().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn brush_status_tri_state() {
        let pts = vec![pt(1.0, &[("a", 5.0)])];
        let mut b = BrushState::new();
        assert_eq!(b.status(), BrushStatus::NoneDrawn);
        b.apply(Some(SelectionRegion::new((10.0, 20.0), (0.0, 1.0))), &pts);
        assert_eq!(b.status(), BrushStatus::DrawnEmpty);
        assert!(b.region().is_some());
        b.apply(Some(SelectionRegion::new((0.0, 2.0), (0.0, 10.0))), &pts);
        assert_eq!(b.status(), BrushStatus::DrawnNonEmpty);
        b.apply(None, &pts);
        assert_eq!(b.status(), BrushStatus::NoneDrawn);
        assert_eq!(b.selection(), &Selection::cleared());
    }

    #[test]
    fn pixel_gesture_inverts_through_scales() {
        let x = TimeScale::new((0.0, 100.0), (0.0, 100.0));
        let y = ValueScale::new(0.0, 100.0, 0.0, 10.0);
        let pts = vec![pt(50.0, &[("a", 5.0)]), pt(90.0, &[("a", 5.0)])];
        let mut b = BrushState::new();
        b.handle(BrushEvent::PointerDown { x: 40.0, y: 20.0 }, &x, &y, &pts);
        b.handle(BrushEvent::PointerMove { x: 55.0, y: 70.0 }, &x, &y, &pts);
        assert!(b.dragging().is_some());
        assert!(b.handle(BrushEvent::PointerUp { x: 60.0, y: 80.0 }, &x, &y, &pts));
        assert!(b.dragging().is_none());
        let r = b.region().unwrap();
        assert_eq!((r.t0, r.t1), (40.0, 60.0));
        assert_eq!((r.v0, r.v1), (2.0, 8.0));
        assert_eq!(b.selection().points.len(), 1);

        // A click without drag clears.
        b.handle(BrushEvent::PointerDown { x: 10.0, y: 10.0 }, &x, &y, &pts);
        b.handle(BrushEvent::PointerUp { x: 10.0, y: 10.0 }, &x, &y, &pts);
        assert_eq!(b.status(), BrushStatus::NoneDrawn);
    }
}
