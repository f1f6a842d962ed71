// File: crates/airviz-core/src/drilldown.rs
// Summary: Year → month → day → hour drill-down of one channel, and the records behind a drilled point.

use std::collections::BTreeMap;

use chrono::{Datelike, Month, Timelike};

use crate::aggregate::{aggregate_hourly, Reducer};
use crate::record::CleanedRecord;

/// Drill position. `day` is only honored when `month` is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrillFilter {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl DrillFilter {
    pub fn year(year: i32) -> Self {
        Self { year, month: None, day: None }
    }

    pub fn level(&self) -> DrillLevel {
        match (self.month, self.day) {
            (Some(_), Some(_)) => DrillLevel::Hours,
            (Some(_), None) => DrillLevel::Days,
            _ => DrillLevel::Months,
        }
    }

    fn matches(&self, r: &CleanedRecord) -> bool {
        let Some(d) = r.date else { return false };
        if d.year() != self.year {
            return false;
        }
        match self.month {
            None => true,
            Some(m) => d.month() == m && self.day.map_or(true, |day| d.day() == day),
        }
    }
}

/// What one drilled point stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrillLevel {
    Months,
    Days,
    Hours,
}

impl DrillLevel {
    fn key(&self, r: &CleanedRecord) -> Option<u32> {
        match self {
            DrillLevel::Months => r.date.map(|d| d.month()),
            DrillLevel::Days => r.date.map(|d| d.day()),
            DrillLevel::Hours => r.time.map(|t| t.hour()),
        }
    }

    pub fn label(&self, key: u32) -> String {
        match self {
            DrillLevel::Months => u8::try_from(key)
                .ok()
                .and_then(|m| Month::try_from(m).ok())
                .map(|m| m.name().to_string())
                .unwrap_or_else(|| format!("Month {key:02}")),
            DrillLevel::Days => format!("Day {key:02}"),
            DrillLevel::Hours => format!("{key:02}:00"),
        }
    }

    /// Inverse of [`DrillLevel::label`].
    pub fn parse_label(&self, label: &str) -> Option<u32> {
        let label = label.trim();
        match self {
            DrillLevel::Months => (1..=12).find(|&m| self.label(m).eq_ignore_ascii_case(label)),
            DrillLevel::Days => label.strip_prefix("Day ")?.trim().parse().ok(),
            DrillLevel::Hours => label.split(':').next()?.trim().parse().ok(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrillPoint {
    pub key: u32,
    pub label: String,
    pub value: f64,
    pub count: usize,
}

fn sorted_unique<T: Ord>(it: impl Iterator<Item = T>) -> Vec<T> {
    let mut v: Vec<T> = it.collect();
    v.sort();
    v.dedup();
    v
}

pub fn available_years(records: &[CleanedRecord]) -> Vec<i32> {
    sorted_unique(records.iter().filter_map(|r| r.date.map(|d| d.year())))
}

/// Months present in `year`.
pub fn available_months(records: &[CleanedRecord], year: i32) -> Vec<u32> {
    let f = DrillFilter::year(year);
    sorted_unique(records.iter().filter(|r| f.matches(r)).filter_map(|r| r.date.map(|d| d.month())))
}

/// Days present in `year`/`month`.
pub fn available_days(records: &[CleanedRecord], year: i32, month: u32) -> Vec<u32> {
    let f = DrillFilter { year, month: Some(month), day: None };
    sorted_unique(records.iter().filter(|r| f.matches(r)).filter_map(|r| r.date.map(|d| d.day())))
}

/// Mean of `channel` per month, day or hour under `filter`, in calendar order.
pub fn drill_series(records: &[CleanedRecord], channel: &str, filter: &DrillFilter) -> Vec<DrillPoint> {
    let level = filter.level();
    if level == DrillLevel::Hours {
        let day: Vec<CleanedRecord> = records.iter().filter(|r| filter.matches(r)).cloned().collect();
        let channels = [channel.to_string()];
        return aggregate_hourly(&day, &channels, Reducer::Mean)
            .into_iter()
            .filter_map(|b| {
                let key = level.parse_label(&b.key)?;
                Some(DrillPoint { key, label: b.key.clone(), value: b.value(channel), count: b.count })
            })
            .collect();
    }

    let mut groups: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for r in records.iter().filter(|r| filter.matches(r)) {
        if let Some(k) = level.key(r) {
            let e = groups.entry(k).or_insert((0.0, 0));
            e.0 += r.value(channel);
            e.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(key, (sum, count))| DrillPoint { key, label: level.label(key), value: sum / count as f64, count })
        .collect()
}

/// `(x_channel, y_channel)` pairs of the records behind the drill point
/// `label` (e.g. temperature against absolute humidity).
pub fn drill_detail(
    records: &[CleanedRecord],
    filter: &DrillFilter,
    label: &str,
    x_channel: &str,
    y_channel: &str,
) -> Vec<(f64, f64)> {
    let level = filter.level();
    let Some(key) = level.parse_label(label) else { return Vec::new() };
    records
        .iter()
        .filter(|r| filter.matches(r) && level.key(r) == Some(key))
        .map(|r| (r.value(x_channel), r.value(y_channel)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn rec(y: i32, m: u32, d: u32, h: u32, co: f64) -> CleanedRecord {
        CleanedRecord {
            date_text: String::new(),
            date: NaiveDate::from_ymd_opt(y, m, d),
            time: NaiveTime::from_hms_opt(h, 0, 0),
            values: [("CO".to_string(), co), ("T".to_string(), 10.0 + h as f64), ("AH".to_string(), 0.5)]
                .into_iter()
                .collect(),
        }
    }

    fn sample() -> Vec<CleanedRecord> {
        vec![
            rec(2004, 11, 2, 7, 4.0),
            rec(2004, 3, 10, 18, 2.0),
            rec(2004, 3, 10, 19, 4.0),
            rec(2004, 3, 11, 7, 6.0),
            rec(2005, 1, 1, 0, 1.0),
        ]
    }

    #[test]
    fn months_in_calendar_order() {
        let s = drill_series(&sample(), "CO", &DrillFilter::year(2004));
        let labels: Vec<_> = s.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["March", "November"]);
        assert_eq!(s[0].value, 4.0);
        assert_eq!(s[0].count, 3);
    }

    #[test]
    fn days_and_hours() {
        let recs = sample();
        let days = drill_series(&recs, "CO", &DrillFilter { year: 2004, month: Some(3), day: None });
        assert_eq!(days.iter().map(|p| p.label.clone()).collect::<Vec<_>>(), vec!["Day 10", "Day 11"]);
        let hours = drill_series(&recs, "CO", &DrillFilter { year: 2004, month: Some(3), day: Some(10) });
        assert_eq!(hours.iter().map(|p| p.label.clone()).collect::<Vec<_>>(), vec!["18:00", "19:00"]);
        assert_eq!(hours.iter().map(|p| (p.key, p.value, p.count)).collect::<Vec<_>>(), vec![(18, 2.0, 1), (19, 4.0, 1)]);
    }

    #[test]
    fn hours_average_repeated_readings() {
        let mut recs = sample();
        recs.push(rec(2004, 3, 10, 18, 6.0));
        let mut no_time = rec(2004, 3, 10, 0, 100.0);
        no_time.time = None;
        recs.push(no_time);
        let hours = drill_series(&recs, "CO", &DrillFilter { year: 2004, month: Some(3), day: Some(10) });
        assert_eq!(hours.len(), 2);
        assert_eq!((hours[0].key, hours[0].value, hours[0].count), (18, 4.0, 2));
    }

    #[test]
    fn available_lists() {
        let recs = sample();
        assert_eq!(available_years(&recs), vec![2004, 2005]);
        assert_eq!(available_months(&recs, 2004), vec![3, 11]);
        assert_eq!(available_days(&recs, 2004, 3), vec![10, 11]);
    }

    #[test]
    fn detail_behind_a_point() {
        let recs = sample();
        let pairs = drill_detail(&recs, &DrillFilter::year(2004), "March", "T", "AH");
        assert_eq!(pairs.len(), 3);
        let pairs = drill_detail(&recs, &DrillFilter { year: 2004, month: Some(3), day: Some(10) }, "19:00", "T", "AH");
        assert_eq!(pairs, vec![(29.0, 0.5)]);
        assert!(drill_detail(&recs, &DrillFilter::year(2004), "Smarch", "T", "AH").is_empty());
    }
}
