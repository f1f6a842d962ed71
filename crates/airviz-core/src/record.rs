// File: crates/airviz-core/src/record.rs
// Summary: Raw and cleaned sensor rows keyed by calendar date and optional time-of-day.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::types::{date_to_millis, datetime_to_millis, Millis};

/// One parsed row, values still as text.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    pub date_text: String,
    /// `None` when `date_text` does not match the configured format.
    pub date: Option<NaiveDate>,
    pub time_text: Option<String>,
    pub time: Option<NaiveTime>,
    pub values: HashMap<String, String>,
}

impl RawRecord {
    pub fn raw(&self, channel: &str) -> Option<&str> {
        self.values.get(channel).map(String::as_str)
    }
}

/// A row in which every channel holds a finite number.
#[derive(Clone, Debug, PartialEq)]
pub struct CleanedRecord {
    pub date_text: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub values: HashMap<String, f64>,
}

impl CleanedRecord {
    /// Value for `channel`, 0 when the record has no such column.
    pub fn value(&self, channel: &str) -> f64 {
        self.values.get(channel).copied().unwrap_or(0.0)
    }

    pub fn datetime(&self) -> Option<NaiveDateTime> {
        let date = self.date?;
        Some(match self.time {
            Some(t) => date.and_time(t),
            None => date.and_time(NaiveTime::MIN),
        })
    }

    /// Position on the time axis: date plus time-of-day when known.
    pub fn timestamp(&self) -> Option<Millis> {
        match (self.date, self.time) {
            (Some(d), Some(t)) => Some(datetime_to_millis(d.and_time(t))),
            (Some(d), None) => Some(date_to_millis(d)),
            _ => None,
        }
    }

    pub fn hour(&self) -> Option<u32> {
        self.time.map(|t| t.hour())
    }
}

/// Parse a time-of-day cell. Accepts `HH:MM:SS`, `HH:MM` and the dotted
/// `HH.MM.SS` layout used by the UCI air-quality exports.
pub fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    ["%H:%M:%S", "%H:%M", "%H.%M.%S", "%H.%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(t, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_formats() {
        let want = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        assert_eq!(parse_time_of_day("18:00:00"), Some(want));
        assert_eq!(parse_time_of_day("18.00.00"), Some(want));
        assert_eq!(parse_time_of_day(" 18:00 "), Some(want));
        assert_eq!(parse_time_of_day(""), None);
        assert_eq!(parse_time_of_day("noon"), None);
    }

    #[test]
    fn timestamp_adds_time_of_day() {
        let rec = CleanedRecord {
            date_text: "3/10/2004".into(),
            date: NaiveDate::from_ymd_opt(2004, 3, 10),
            time: NaiveTime::from_hms_opt(1, 0, 0),
            values: HashMap::new(),
        };
        let midnight = date_to_millis(NaiveDate::from_ymd_opt(2004, 3, 10).unwrap());
        assert_eq!(rec.timestamp(), Some(midnight + crate::types::HOUR_MS));
        assert_eq!(rec.value("CO"), 0.0);
        assert_eq!(rec.hour(), Some(1));
    }
}
