// File: crates/airviz-core/tests/aggregate_stack.rs
// Purpose: Weekday zero-fill and cumulative stacking over aggregated buckets.

use airviz_core::record::CleanedRecord;
use airviz_core::{aggregate, build_stack, Granularity, Reducer};
use chrono::NaiveDate;

fn rec(m: u32, d: u32, a: f64, b: f64) -> CleanedRecord {
    CleanedRecord {
        date_text: format!("{m}/{d}/2004"),
        date: NaiveDate::from_ymd_opt(2004, m, d),
        time: None,
        values: [("A".to_string(), a), ("B".to_string(), b)].into_iter().collect(),
    }
}

fn chans() -> Vec<String> {
    vec!["A".into(), "B".into()]
}

#[test]
fn weekday_buckets_always_seven_in_order() {
    // 2004-03-09 is a Tuesday, 2004-03-11 a Thursday.
    let recs = vec![rec(3, 9, 1.0, 2.0), rec(3, 11, 3.0, 4.0), rec(3, 16, 5.0, 6.0)];
    let b = aggregate(&recs, Granularity::DayOfWeek, &chans(), Reducer::Sum);
    let keys: Vec<&str> = b.iter().map(|x| x.key.as_str()).collect();
    assert_eq!(keys, ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]);
    assert_eq!(b[1].count, 2);
    assert_eq!(b[1].value("A"), 6.0);
    assert_eq!(b[3].value("B"), 4.0);
    for i in [0, 2, 4, 5, 6] {
        assert_eq!(b[i].count, 0);
        assert_eq!(b[i].value("A"), 0.0);
        assert_eq!(b[i].value("B"), 0.0);
    }
}

#[test]
fn undated_records_are_skipped_not_fatal() {
    let mut bad = rec(3, 9, 100.0, 100.0);
    bad.date = None;
    let recs = vec![rec(3, 9, 1.0, 2.0), bad];
    let b = aggregate(&recs, Granularity::Day, &chans(), Reducer::Sum);
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].value("A"), 1.0);
    assert_eq!(aggregate(&recs, Granularity::DayOfWeek, &chans(), Reducer::Sum).len(), 7);
}

#[test]
fn last_layer_top_is_bucket_sum() {
    let recs = vec![rec(3, 9, 1.5, 2.0), rec(4, 1, 3.0, 0.25)];
    let buckets = aggregate(&recs, Granularity::Month, &chans(), Reducer::Sum);
    let stack = build_stack(&buckets, &chans());
    for (sb, b) in stack.buckets.iter().zip(&buckets) {
        assert_eq!(sb.top(), b.value("A") + b.value("B"));
        assert_eq!(sb.layers[0].lower, 0.0);
        assert_eq!(sb.layers[1].lower, sb.layers[0].upper);
    }
    assert_eq!(stack.domain, (0.0, 3.5));
}
