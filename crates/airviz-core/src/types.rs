// File: crates/airviz-core/src/types.rs
// Summary: Shared types and constants (time units, validity floor, zoom bounds, chart sizes).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Milliseconds since the Unix epoch. Every time axis is expressed in it.
pub type Millis = f64;

/// One day in milliseconds.
pub const DAY_MS: f64 = 86_400_000.0;
/// One hour in milliseconds.
pub const HOUR_MS: f64 = 3_600_000.0;

/// Readings below this value are sensor faults (the UCI files use `-200`).
pub const DEFAULT_SENTINEL_FLOOR: f64 = 0.0;

/// Default `month/day/year` date column format.
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Zoom factor bounds for the time axis.
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 32.0;
/// Zoom factor applied around the reference date when a chart opens.
pub const DEFAULT_ZOOM: f64 = 4.0;

/// Default surface width in pixels.
pub const WIDTH: u32 = 928;
/// Default surface height in pixels.
pub const HEIGHT: u32 = 400;

/// Approximate horizontal spacing between time ticks, in pixels.
pub const TICK_SPACING_PX: f64 = 80.0;

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 { self.top + self.bottom }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(60, 20, 20, 60)
    }
}

/// Convert a calendar date (midnight UTC) to epoch milliseconds.
pub fn date_to_millis(date: NaiveDate) -> Millis {
    datetime_to_millis(date.and_time(NaiveTime::MIN))
}

pub fn datetime_to_millis(dt: NaiveDateTime) -> Millis {
    dt.and_utc().timestamp_millis() as f64
}

/// Inverse of [`datetime_to_millis`]; `None` when outside chrono's range.
pub fn millis_to_datetime(ms: Millis) -> Option<NaiveDateTime> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms.floor() as i64).map(|dt| dt.naive_utc())
}
