// File: crates/airviz-core/src/axis.rs
// Summary: Axis model with ticks and labels; numeric and calendar tick generation; label formats.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::scale::{BandScale, TimeScale, ValueScale};
use crate::types::{datetime_to_millis, millis_to_datetime, Millis, DAY_MS, HOUR_MS};

/// One labelled tick; `position` is in pixels along the axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub value: f64,
    pub label: String,
}

/// Axis model: label, data range and ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<Tick>,
}

impl Axis {
    /// Time axis labelled at `granularity`.
    pub fn time(label: impl Into<String>, scale: &TimeScale, granularity: TickGranularity, count: usize) -> Self {
        let ticks = scale
            .ticks(count)
            .into_iter()
            .map(|t| Tick { position: scale.map(t), value: t, label: granularity.format(t) })
            .collect();
        Self { label: label.into(), min: scale.domain.0, max: scale.domain.1, ticks }
    }

    /// Value axis with SI-prefixed labels.
    pub fn value(label: impl Into<String>, scale: &ValueScale, count: usize) -> Self {
        let ticks = scale
            .ticks(count)
            .into_iter()
            .map(|v| Tick { position: scale.map(v), value: v, label: format_si(v) })
            .collect();
        Self { label: label.into(), min: scale.vmin, max: scale.vmax, ticks }
    }

    /// One tick centered on each band.
    pub fn band(label: impl Into<String>, scale: &BandScale) -> Self {
        let half = scale.bandwidth() / 2.0;
        let ticks: Vec<Tick> = scale
            .keys()
            .iter()
            .enumerate()
            .filter_map(|(i, k)| {
                scale.position(k).map(|p| Tick { position: p + half, value: i as f64, label: k.clone() })
            })
            .collect();
        Self { label: label.into(), min: 0.0, max: ticks.len() as f64, ticks }
    }
}

/// Label format for time ticks, chosen from the visible span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickGranularity {
    /// `2004`
    Year,
    /// `Mar 2004`
    MonthYear,
    /// `Mar 10, 2004`
    FullDate,
}

impl TickGranularity {
    pub fn pattern(&self) -> &'static str {
        match self {
            TickGranularity::Year => "%Y",
            TickGranularity::MonthYear => "%b %Y",
            TickGranularity::FullDate => "%b %d, %Y",
        }
    }

    pub fn format(&self, t: Millis) -> String {
        millis_to_datetime(t).map(|dt| dt.format(self.pattern()).to_string()).unwrap_or_default()
    }
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

fn step_factor(error: f64) -> f64 {
    if error >= E10 { 10.0 } else if error >= E5 { 5.0 } else if error >= E2 { 2.0 } else { 1.0 }
}

/// Round step between about `count` ticks over `[start, stop]`.
/// Negative results encode `1 / -step` for sub-unit steps to keep float
/// arithmetic exact.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    if !(step > 0.0) || !step.is_finite() {
        return 0.0;
    }
    let power = step.log10().floor();
    let factor = step_factor(step / 10f64.powf(power));
    if power >= 0.0 { factor * 10f64.powf(power) } else { -(10f64.powf(-power)) / factor }
}

/// Positive step size equivalent to [`tick_increment`].
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let inc = tick_increment(start.min(stop), start.max(stop), count);
    if inc < 0.0 { -1.0 / inc } else { inc }
}

/// Nicely rounded ticks (1, 2 or 5 times a power of ten) inside `[min, max]`.
pub fn linear_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    let (lo, hi, rev) = if max < min { (max, min, true) } else { (min, max, false) };
    let inc = tick_increment(lo, hi, count);
    if inc == 0.0 {
        return Vec::new();
    }
    let mut ticks: Vec<f64> = if inc < 0.0 {
        let inv = -inc;
        let mut i1 = (lo * inv).round();
        let mut i2 = (hi * inv).round();
        if i1 / inv < lo { i1 += 1.0; }
        if i2 / inv > hi { i2 -= 1.0; }
        let n = (i2 - i1 + 1.0).max(0.0) as usize;
        (0..n).map(|i| (i1 + i as f64) / inv).collect()
    } else {
        let mut i1 = (lo / inc).round();
        let mut i2 = (hi / inc).round();
        if i1 * inc < lo { i1 += 1.0; }
        if i2 * inc > hi { i2 -= 1.0; }
        let n = (i2 - i1 + 1.0).max(0.0) as usize;
        (0..n).map(|i| (i1 + i as f64) * inc).collect()
    };
    if rev {
        ticks.reverse();
    }
    ticks
}

const MINUTE_MS: f64 = 60_000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Interval {
    Fixed(f64),
    Days(u32),
    Week,
    Months(u32),
    Years(i32),
}

impl Interval {
    fn duration(&self) -> f64 {
        match self {
            Interval::Fixed(ms) => *ms,
            Interval::Days(n) => DAY_MS * *n as f64,
            Interval::Week => DAY_MS * 7.0,
            Interval::Months(n) => DAY_MS * 30.0 * *n as f64,
            Interval::Years(n) => DAY_MS * 365.0 * *n as f64,
        }
    }
}

const INTERVALS: [Interval; 14] = [
    Interval::Fixed(MINUTE_MS),
    Interval::Fixed(5.0 * MINUTE_MS),
    Interval::Fixed(15.0 * MINUTE_MS),
    Interval::Fixed(30.0 * MINUTE_MS),
    Interval::Fixed(HOUR_MS),
    Interval::Fixed(3.0 * HOUR_MS),
    Interval::Fixed(6.0 * HOUR_MS),
    Interval::Fixed(12.0 * HOUR_MS),
    Interval::Days(1),
    Interval::Days(2),
    Interval::Week,
    Interval::Months(1),
    Interval::Months(3),
    Interval::Years(1),
];

fn pick_interval(span: f64, count: usize) -> Option<Interval> {
    let target = span / count.max(1) as f64;
    let i = INTERVALS.iter().position(|iv| iv.duration() > target).unwrap_or(INTERVALS.len());
    if i == INTERVALS.len() {
        let years = tick_step(0.0, span / (DAY_MS * 365.0), count).max(1.0).round() as i32;
        return Some(Interval::Years(years));
    }
    if i == 0 {
        return None;
    }
    let (prev, next) = (INTERVALS[i - 1], INTERVALS[i]);
    Some(if target / prev.duration() < next.duration() / target { prev } else { next })
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(chrono::Months::new(months))
}

/// Calendar-aligned tick instants inside `domain`: whole minutes or hours,
/// midnights, Sundays, month starts, or January firsts depending on the
/// span. Very short spans fall back to plain numeric ticks.
pub fn time_ticks(domain: (Millis, Millis), count: usize) -> Vec<Millis> {
    let (d0, d1) = if domain.0 <= domain.1 { domain } else { (domain.1, domain.0) };
    if count == 0 || !d0.is_finite() || !d1.is_finite() {
        return Vec::new();
    }
    let Some(interval) = pick_interval(d1 - d0, count) else {
        return linear_ticks(d0, d1, count);
    };
    let Some(start) = millis_to_datetime(d0) else { return Vec::new() };

    // Upper bound on emitted ticks; a misbehaving domain must not spin forever.
    const MAX_TICKS: usize = 10_000;
    let mut out = Vec::new();
    let mut push = |dt: NaiveDateTime| -> bool {
        let t = datetime_to_millis(dt);
        if t > d1 || out.len() >= MAX_TICKS {
            return false;
        }
        if t >= d0 {
            out.push(t);
        }
        true
    };

    match interval {
        Interval::Fixed(step) => {
            let mut t = (d0 / step).floor() * step;
            while let Some(dt) = millis_to_datetime(t) {
                if !push(dt) { break; }
                t += step;
            }
        }
        Interval::Days(n) => {
            let mut day = start.date();
            loop {
                if (day.day() - 1) % n == 0 && !push(midnight(day)) { break; }
                if datetime_to_millis(midnight(day)) > d1 { break; }
                match day.succ_opt() { Some(d) => day = d, None => break }
            }
        }
        Interval::Week => {
            let mut day = start.date();
            while day.weekday() != Weekday::Sun {
                match day.pred_opt() { Some(d) => day = d, None => break }
            }
            while push(midnight(day)) {
                day += Duration::days(7);
            }
        }
        Interval::Months(n) => {
            let Some(mut day) = NaiveDate::from_ymd_opt(start.year(), start.month(), 1) else { return Vec::new() };
            loop {
                if (day.month() - 1) % n == 0 && !push(midnight(day)) { break; }
                match add_months(day, 1) { Some(d) if datetime_to_millis(midnight(day)) <= d1 => day = d, _ => break }
            }
        }
        Interval::Years(n) => {
            let n = n.max(1);
            let mut year = start.year().div_euclid(n) * n;
            while let Some(day) = NaiveDate::from_ymd_opt(year, 1, 1) {
                if !push(midnight(day)) { break; }
                year += n;
            }
        }
    }
    out
}

const SI_PREFIXES: [&str; 17] = ["y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y"];

/// Format with an SI prefix and three significant digits: `1.5k`, `250`, `2.5m`.
pub fn format_si(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if !v.is_finite() {
        return v.to_string();
    }
    let exp3 = ((v.abs().log10() / 3.0).floor() as i32).clamp(-8, 8);
    let scaled = v / 10f64.powi(exp3 * 3);
    let int_digits = (scaled.abs().log10().floor() as i32 + 1).clamp(1, 3);
    let decimals = (3 - int_digits).max(0) as usize;
    let mut s = format!("{:.*}", decimals, scaled);
    if s.contains('.') {
        s = s.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    let prefix = SI_PREFIXES[(exp3 + 8) as usize];
    format!("{s}{prefix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::date_to_millis;

    fn ms(y: i32, m: u32, d: u32) -> Millis {
        date_to_millis(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn linear_ticks_round_steps() {
        assert_eq!(linear_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(linear_ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(linear_ticks(3.0, 3.0, 5), vec![3.0]);
        assert!(linear_ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn month_ticks_land_on_first_of_month() {
        let ticks = time_ticks((ms(2004, 3, 10), ms(2004, 9, 1)), 6);
        assert!(!ticks.is_empty());
        for t in &ticks {
            assert_eq!(millis_to_datetime(*t).unwrap().day(), 1);
        }
        assert_eq!(ticks[0], ms(2004, 4, 1));
    }

    #[test]
    fn daily_ticks_on_midnight() {
        let ticks = time_ticks((ms(2004, 3, 10), ms(2004, 3, 15)), 5);
        assert_eq!(ticks.len(), 6);
        assert!(ticks.iter().all(|t| t % DAY_MS == 0.0));
    }

    #[test]
    fn year_ticks_for_long_spans() {
        let ticks = time_ticks((ms(2000, 6, 1), ms(2010, 6, 1)), 5);
        assert_eq!(ticks, vec![ms(2002, 1, 1), ms(2004, 1, 1), ms(2006, 1, 1), ms(2008, 1, 1), ms(2010, 1, 1)]);
    }

    #[test]
    fn granularity_formats() {
        let t = ms(2004, 3, 10);
        assert_eq!(TickGranularity::Year.format(t), "2004");
        assert_eq!(TickGranularity::MonthYear.format(t), "Mar 2004");
        assert_eq!(TickGranularity::FullDate.format(t), "Mar 10, 2004");
    }

    #[test]
    fn si_labels() {
        assert_eq!(format_si(0.0), "0");
        assert_eq!(format_si(1500.0), "1.5k");
        assert_eq!(format_si(250.0), "250");
        assert_eq!(format_si(0.0025), "2.5m");
        assert_eq!(format_si(-2000.0), "-2k");
        assert_eq!(format_si(1_234_000.0), "1.23M");
    }
}
