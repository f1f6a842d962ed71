// File: crates/airviz-core/src/series.rs
// Summary: Per-channel time series extracted from cleaned records, and multi-channel selectable points.

use std::collections::HashMap;

use crate::aggregate::{aggregate, Granularity, Reducer};
use crate::downsample::lttb;
use crate::record::CleanedRecord;
use crate::types::{date_to_millis, Millis};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimePoint {
    pub t: Millis,
    pub v: f64,
}

/// One channel over time, sorted by `t`.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub channel: String,
    pub points: Vec<TimePoint>,
}

impl Series {
    /// Every dated record, positioned at its date plus time-of-day.
    pub fn from_records(records: &[CleanedRecord], channel: &str) -> Self {
        let mut points: Vec<TimePoint> = records
            .iter()
            .filter_map(|r| r.timestamp().map(|t| TimePoint { t, v: r.value(channel) }))
            .collect();
        points.sort_by(|a, b| a.t.total_cmp(&b.t));
        Self { channel: channel.to_string(), points }
    }

    /// One point per calendar day (the daily mean), plotted at midnight.
    pub fn daily_means(records: &[CleanedRecord], channel: &str) -> Self {
        let channels = [channel.to_string()];
        let points = aggregate(records, Granularity::Day, &channels, Reducer::Mean)
            .into_iter()
            .filter_map(|b| b.start.map(|d| TimePoint { t: date_to_millis(d), v: b.value(channel) }))
            .collect();
        Self { channel: channel.to_string(), points }
    }

    /// `(first t, last t)`, or `None` for an empty series.
    pub fn time_extent(&self) -> Option<(Millis, Millis)> {
        Some((self.points.first()?.t, self.points.last()?.t))
    }

    /// `(min v, max v)`, or `None` for an empty series.
    pub fn value_extent(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |acc, p| match acc {
            None => Some((p.v, p.v)),
            Some((lo, hi)) => Some((p.v.min(lo), p.v.max(hi))),
        })
    }

    /// Points inside `domain`, plus the nearest neighbour on each side so a
    /// line or step curve still reaches the clip edges.
    pub fn clip(&self, domain: (Millis, Millis)) -> &[TimePoint] {
        let lo = self.points.partition_point(|p| p.t < domain.0).saturating_sub(1);
        let hi = (self.points.partition_point(|p| p.t <= domain.1) + 1).min(self.points.len());
        if lo >= hi { &[] } else { &self.points[lo..hi] }
    }

    /// LTTB-reduced copy with at most `max_points` points.
    pub fn downsample(&self, max_points: usize) -> Self {
        let points = if self.points.len() > max_points && max_points >= 2 {
            lttb(&self.points, max_points)
        } else {
            self.points.clone()
        };
        Self { channel: self.channel.clone(), points }
    }
}

/// One instant with several channel readings; the unit of brushing.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectPoint {
    pub t: Millis,
    pub values: HashMap<String, f64>,
}

/// Daily-mean multi-channel points (one per day, at midnight).
pub fn daily_select_points(records: &[CleanedRecord], channels: &[String]) -> Vec<SelectPoint> {
    aggregate(records, Granularity::Day, channels, Reducer::Mean)
        .into_iter()
        .filter_map(|b| b.start.map(|d| SelectPoint { t: date_to_millis(d), values: b.values }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn rec(d: u32, h: u32, co: f64) -> CleanedRecord {
        CleanedRecord {
            date_text: String::new(),
            date: NaiveDate::from_ymd_opt(2004, 3, d),
            time: NaiveTime::from_hms_opt(h, 0, 0),
            values: [("CO".to_string(), co)].into_iter().collect(),
        }
    }

    #[test]
    fn from_records_sorted_and_undated_dropped() {
        let mut undated = rec(10, 0, 9.0);
        undated.date = None;
        let s = Series::from_records(&[rec(11, 0, 2.0), rec(10, 5, 1.0), undated], "CO");
        assert_eq!(s.points.len(), 2);
        assert_eq!(s.points[0].v, 1.0);
        assert_eq!(s.value_extent(), Some((1.0, 2.0)));
    }

    #[test]
    fn daily_means_one_point_per_day() {
        let s = Series::daily_means(&[rec(10, 1, 1.0), rec(10, 2, 3.0), rec(11, 1, 5.0)], "CO");
        assert_eq!(s.points.iter().map(|p| p.v).collect::<Vec<_>>(), vec![2.0, 5.0]);
    }

    #[test]
    fn clip_keeps_neighbours() {
        let s = Series {
            channel: "CO".into(),
            points: (0..10).map(|i| TimePoint { t: i as f64 * 10.0, v: 0.0 }).collect(),
        };
        let c = s.clip((25.0, 45.0));
        assert_eq!(c.first().unwrap().t, 20.0);
        assert_eq!(c.last().unwrap().t, 50.0);
        assert_eq!(s.clip((-100.0, -50.0)).len(), 1);
    }

    #[test]
    fn daily_select_points_carry_all_channels() {
        let chans = ["CO".to_string(), "NOx".to_string()];
        let pts = daily_select_points(&[rec(10, 1, 1.0), rec(10, 2, 3.0), rec(12, 0, 4.0)], &chans);
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0].values["CO"], 2.0);
        assert_eq!(pts[0].values["NOx"], 0.0);
        assert_eq!(pts[1].t - pts[0].t, 2.0 * crate::types::DAY_MS);
    }
}
