// File: crates/airviz-core/src/aggregate.rs
// Summary: Temporal bucketing of cleaned records by day, week, month, weekday and hour.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::record::CleanedRecord;

/// Temporal bucket size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Week,
    Month,
    DayOfWeek,
}

impl Granularity {
    /// Canonical bucket key for `date`.
    pub fn key(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Day => date.format("%Y-%m-%d").to_string(),
            Granularity::Week => date.format("%Y-W%W").to_string(),
            Granularity::Month => date.format("%Y-%m").to_string(),
            Granularity::DayOfWeek => weekday_name(date.weekday()).to_string(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Day => "Day",
            Granularity::Week => "Week",
            Granularity::Month => "Month",
            Granularity::DayOfWeek => "Day of Week",
        }
    }
}

/// How the records of one bucket are folded per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    Sum,
    Mean,
}

impl Reducer {
    fn finish(&self, sum: f64, count: usize) -> f64 {
        match self {
            Reducer::Sum => sum,
            Reducer::Mean if count == 0 => 0.0,
            Reducer::Mean => sum / count as f64,
        }
    }
}

/// Weekdays in axis order.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// One aggregated group of records.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregationBucket {
    pub key: String,
    /// Earliest contributing date; `None` for an empty weekday bucket.
    pub start: Option<NaiveDate>,
    pub count: usize,
    pub values: HashMap<String, f64>,
}

impl AggregationBucket {
    pub fn value(&self, channel: &str) -> f64 {
        self.values.get(channel).copied().unwrap_or(0.0)
    }
}

#[derive(Clone)]
struct Acc {
    start: Option<NaiveDate>,
    count: usize,
    sums: Vec<f64>,
}

impl Acc {
    fn new(width: usize) -> Self {
        Self { start: None, count: 0, sums: vec![0.0; width] }
    }

    fn push(&mut self, date: Option<NaiveDate>, rec: &CleanedRecord, channels: &[String]) {
        if let Some(d) = date {
            self.start = Some(self.start.map_or(d, |s| s.min(d)));
        }
        self.count += 1;
        for (sum, ch) in self.sums.iter_mut().zip(channels) {
            *sum += rec.value(ch);
        }
    }

    fn into_bucket(self, key: String, channels: &[String], reducer: Reducer) -> AggregationBucket {
        let values = channels
            .iter()
            .zip(&self.sums)
            .map(|(ch, s)| (ch.clone(), reducer.finish(*s, self.count)))
            .collect();
        AggregationBucket { key, start: self.start, count: self.count, values }
    }
}

/// Group `records` by `granularity` and fold each channel with `reducer`.
///
/// Day, week and month buckets come back in chronological order and only
/// exist for keys present in the data. Day-of-week always yields seven
/// buckets, Monday first, zero-filled for absent weekdays. Records without a
/// parsed date are skipped.
pub fn aggregate(
    records: &[CleanedRecord],
    granularity: Granularity,
    channels: &[String],
    reducer: Reducer,
) -> Vec<AggregationBucket> {
    let buckets = match granularity {
        Granularity::DayOfWeek => aggregate_weekdays(records, channels, reducer),
        _ => aggregate_calendar(records, granularity, channels, reducer),
    };
    tracing::debug!("{} aggregation: {} records -> {} buckets", granularity.label(), records.len(), buckets.len());
    buckets
}

fn aggregate_calendar(
    records: &[CleanedRecord],
    granularity: Granularity,
    channels: &[String],
    reducer: Reducer,
) -> Vec<AggregationBucket> {
    let mut groups: HashMap<String, Acc> = HashMap::new();
    let mut skipped = 0usize;
    for rec in records {
        let Some(date) = rec.date else {
            skipped += 1;
            continue;
        };
        groups
            .entry(granularity.key(date))
            .or_insert_with(|| Acc::new(channels.len()))
            .push(Some(date), rec, channels);
    }
    if skipped > 0 {
        tracing::debug!("skipped {} records without a parsed date", skipped);
    }

    let mut out: Vec<AggregationBucket> = groups
        .into_iter()
        .map(|(key, acc)| acc.into_bucket(key, channels, reducer))
        .collect();
    out.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.key.cmp(&b.key)));
    out
}

// Kept separate from the calendar path: the seven buckets always exist.
fn aggregate_weekdays(records: &[CleanedRecord], channels: &[String], reducer: Reducer) -> Vec<AggregationBucket> {
    let mut days = vec![Acc::new(channels.len()); 7];
    for rec in records {
        if let Some(date) = rec.date {
            days[date.weekday().num_days_from_monday() as usize].push(Some(date), rec, channels);
        }
    }
    days.into_iter()
        .zip(WEEKDAYS)
        .map(|(acc, wd)| acc.into_bucket(weekday_name(wd).to_string(), channels, reducer))
        .collect()
}

/// Group by hour of day (`HH:00`), ascending. Records without a parsed
/// time-of-day are skipped.
pub fn aggregate_hourly(records: &[CleanedRecord], channels: &[String], reducer: Reducer) -> Vec<AggregationBucket> {
    let mut hours: Vec<Option<Acc>> = vec![None; 24];
    for rec in records {
        if let Some(h) = rec.hour() {
            hours[h as usize]
                .get_or_insert_with(|| Acc::new(channels.len()))
                .push(rec.date, rec, channels);
        }
    }
    hours
        .into_iter()
        .enumerate()
        .filter_map(|(h, acc)| acc.map(|a| a.into_bucket(format!("{h:02}:00"), channels, reducer)))
        .collect()
}
