// File: crates/airviz-core/src/impute.rs
// Summary: Sentinel detection, per-channel means over valid readings, and mean imputation.

use std::collections::HashMap;

use crate::record::{CleanedRecord, RawRecord};

/// Parse a reading as a finite number. A single decimal comma is accepted
/// (`2,6` reads as `2.6`) for semicolon-delimited exports.
pub fn parse_reading(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    let v = match t.parse::<f64>() {
        Ok(v) => v,
        Err(_) if t.matches(',').count() == 1 && !t.contains('.') => t.replace(',', ".").parse().ok()?,
        Err(_) => return None,
    };
    v.is_finite().then_some(v)
}

/// A reading is valid when it is a finite number at or above `floor`.
pub fn is_valid_reading(text: &str, floor: f64) -> bool {
    valid_value(text, floor).is_some()
}

fn valid_value(text: &str, floor: f64) -> Option<f64> {
    parse_reading(text).filter(|v| *v >= floor)
}

/// Mean of the valid readings of each channel, computed once per load.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelMeans {
    floor: f64,
    means: HashMap<String, f64>,
}

impl ChannelMeans {
    /// Mean for `channel`; 0 for a channel that was never measured.
    pub fn get(&self, channel: &str) -> f64 {
        self.means.get(channel).copied().unwrap_or(0.0)
    }

    pub fn floor(&self) -> f64 { self.floor }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.means.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Arithmetic mean of every valid reading per channel, or 0 when a channel
/// has no valid reading at all.
pub fn compute_channel_means(records: &[RawRecord], channels: &[String], floor: f64) -> ChannelMeans {
    let means = channels
        .iter()
        .map(|ch| {
            let (sum, n) = records
                .iter()
                .filter_map(|r| r.raw(ch).and_then(|t| valid_value(t, floor)))
                .fold((0.0f64, 0usize), |(s, n), v| (s + v, n + 1));
            let mean = if n == 0 { 0.0 } else { sum / n as f64 };
            if n < records.len() {
                tracing::debug!("{}: {} of {} readings invalid, imputing {:.4}", ch, records.len() - n, records.len(), mean);
            }
            (ch.clone(), mean)
        })
        .collect();
    ChannelMeans { floor, means }
}

/// Replace every invalid reading by its channel mean. Output has the same
/// length and order as `records` and contains only finite values.
pub fn clean_records(records: &[RawRecord], means: &ChannelMeans) -> Vec<CleanedRecord> {
    records
        .iter()
        .map(|r| {
            let values = r
                .values
                .iter()
                .map(|(ch, text)| {
                    let v = valid_value(text, means.floor).unwrap_or_else(|| means.get(ch));
                    (ch.clone(), v)
                })
                .collect();
            CleanedRecord { date_text: r.date_text.clone(), date: r.date, time: r.time, values }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(values: &[(&str, &str)]) -> RawRecord {
        RawRecord {
            date_text: "3/10/2004".into(),
            date: None,
            time_text: None,
            time: None,
            values: values.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    #[test]
    fn readings() {
        assert_eq!(parse_reading(" 2.6 "), Some(2.6));
        assert_eq!(parse_reading("2,6"), Some(2.6));
        assert_eq!(parse_reading("-200"), Some(-200.0));
        assert_eq!(parse_reading(""), None);
        assert_eq!(parse_reading("n/a"), None);
        assert_eq!(parse_reading("NaN"), None);
        assert_eq!(parse_reading("inf"), None);
        assert!(!is_valid_reading("-200", 0.0));
        assert!(is_valid_reading("0", 0.0));
    }

    #[test]
    fn means_skip_sentinels() {
        let rs = vec![rec(&[("CO", "-200")]), rec(&[("CO", "10")]), rec(&[("CO", "20")])];
        let m = compute_channel_means(&rs, &["CO".to_string()], 0.0);
        assert_eq!(m.get("CO"), 15.0);
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        let rs = vec![rec(&[("CO", "-200")]), rec(&[("CO", "")])];
        let m = compute_channel_means(&rs, &["CO".to_string(), "T".to_string()], 0.0);
        assert_eq!(m.get("CO"), 0.0);
        assert_eq!(m.get("T"), 0.0);
        assert_eq!(m.get("unknown"), 0.0);
    }

    #[test]
    fn clean_substitutes_means() {
        let rs = vec![rec(&[("CO", "-200"), ("T", "x")]), rec(&[("CO", "4"), ("T", "11")])];
        let chans = vec!["CO".to_string(), "T".to_string()];
        let m = compute_channel_means(&rs, &chans, 0.0);
        let c = clean_records(&rs, &m);
        assert_eq!(c.len(), 2);
        assert_eq!(c[0].value("CO"), 4.0);
        assert_eq!(c[0].value("T"), 11.0);
        assert!(c.iter().all(|r| r.values.values().all(|v| v.is_finite() && *v >= 0.0)));
    }
}
