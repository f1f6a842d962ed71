// File: crates/airviz-core/src/scale.rs
// Summary: Time (X), value (Y) and band scales mapping data coordinates to pixels.

use crate::axis::{linear_ticks, tick_increment, time_ticks};
use crate::types::Millis;

#[inline]
fn normalize(x: f64, a: f64, b: f64) -> f64 {
    let span = b - a;
    if span == 0.0 { 0.5 } else { (x - a) / span }
}

/// Linear map from a millisecond domain onto a horizontal pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    pub domain: (Millis, Millis),
    pub range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (Millis, Millis), range: (f64, f64)) -> Self {
        Self { domain, range }
    }
    #[inline]
    pub fn map(&self, t: Millis) -> f64 {
        self.range.0 + normalize(t, self.domain.0, self.domain.1) * (self.range.1 - self.range.0)
    }
    #[inline]
    pub fn invert(&self, px: f64) -> Millis {
        self.domain.0 + normalize(px, self.range.0, self.range.1) * (self.domain.1 - self.domain.0)
    }
    pub fn span(&self) -> Millis {
        self.domain.1 - self.domain.0
    }
    pub fn with_domain(&self, domain: (Millis, Millis)) -> Self {
        Self { domain, range: self.range }
    }
    /// Calendar-aligned tick positions, about `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<Millis> {
        time_ticks(self.domain, count)
    }
}

/// Vertical value scale mapping `[vmin, vmax]` to `[bottom_px, top_px]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    pub top_px: f64,
    pub bottom_px: f64,
    pub vmin: f64,
    pub vmax: f64,
}

impl ValueScale {
    pub fn new(top_px: f64, bottom_px: f64, vmin: f64, vmax: f64) -> Self {
        Self { top_px, bottom_px, vmin, vmax }
    }
    #[inline]
    pub fn map(&self, v: f64) -> f64 {
        self.bottom_px - normalize(v, self.vmin, self.vmax) * (self.bottom_px - self.top_px)
    }
    #[inline]
    pub fn invert(&self, py: f64) -> f64 {
        self.vmin + normalize(py, self.bottom_px, self.top_px) * (self.vmax - self.vmin)
    }
    /// Extend the domain outward to round tick steps.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = (self.vmin, self.vmax);
        let flipped = stop < start;
        if flipped {
            std::mem::swap(&mut start, &mut stop);
        }
        let mut prev = 0.0f64;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if step == prev || step == 0.0 || !step.is_finite() {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            }
            prev = step;
        }
        if flipped {
            std::mem::swap(&mut start, &mut stop);
        }
        self.vmin = start;
        self.vmax = stop;
        self
    }
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        linear_ticks(self.vmin, self.vmax, count)
    }
}

/// Ordinal keys laid out as equal bands with inner/outer padding.
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    keys: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub const DEFAULT_PADDING: f64 = 0.1;

    pub fn new(keys: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let n = keys.len() as f64;
        let (r0, r1) = range;
        let step = (r1 - r0) / (n - padding + padding * 2.0).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;
        Self { keys, start, step, bandwidth: step * (1.0 - padding) }
    }
    /// Left edge of the band for `key`.
    pub fn position(&self, key: &str) -> Option<f64> {
        self.keys.iter().position(|k| k == key).map(|i| self.start + self.step * i as f64)
    }
    pub fn bandwidth(&self) -> f64 { self.bandwidth }
    pub fn keys(&self) -> &[String] { &self.keys }
}
