// File: crates/airviz-core/src/stack.rs
// Summary: Cumulative per-channel layers for stacked bars, plus the plotted value domain.

use crate::aggregate::AggregationBucket;

/// One channel's band within one bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct StackedLayer {
    pub channel: String,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StackedBucket {
    pub key: String,
    /// Same order as the `channel_order` passed to [`build_stack`].
    pub layers: Vec<StackedLayer>,
}

impl StackedBucket {
    /// Upper bound of the last layer (the bar's top).
    pub fn top(&self) -> f64 {
        self.layers.last().map_or(0.0, |l| l.upper)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stack {
    pub buckets: Vec<StackedBucket>,
    /// `(min(0, lowest lower bound), highest upper bound)`.
    pub domain: (f64, f64),
}

/// Stack each bucket's channels bottom-up in `channel_order`.
///
/// Each layer starts where the previous one ended, negative values included,
/// so a negative contribution pulls the running total down instead of being
/// clipped. Missing or non-finite values count as 0.
pub fn build_stack(buckets: &[AggregationBucket], channel_order: &[String]) -> Stack {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;

    let stacked = buckets
        .iter()
        .map(|b| {
            let mut running = 0.0f64;
            let layers = channel_order
                .iter()
                .map(|ch| {
                    let v = b.value(ch);
                    let v = if v.is_finite() { v } else { 0.0 };
                    let layer = StackedLayer { channel: ch.clone(), lower: running, upper: running + v };
                    running = layer.upper;
                    lo = lo.min(layer.lower);
                    hi = hi.max(layer.upper);
                    layer
                })
                .collect();
            StackedBucket { key: b.key.clone(), layers }
        })
        .collect();

    let domain = if lo.is_finite() && hi.is_finite() { (lo.min(0.0), hi) } else { (0.0, 0.0) };
    Stack { buckets: stacked, domain }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn bucket(key: &str, vals: &[(&str, f64)]) -> AggregationBucket {
        AggregationBucket {
            key: key.into(),
            start: None,
            count: 1,
            values: vals.iter().map(|(k, v)| (k.to_string(), *v)).collect::<HashMap<_, _>>(),
        }
    }

    fn order(chs: &[&str]) -> Vec<String> { chs.iter().map(|s| s.to_string()).collect() }

    #[test]
    fn cumulative_layers() {
        let s = build_stack(&[bucket("a", &[("x", 1.0), ("y", 2.0), ("z", 3.0)])], &order(&["x", "y", "z"]));
        let l = &s.buckets[0].layers;
        assert_eq!((l[0].lower, l[0].upper), (0.0, 1.0));
        assert_eq!((l[1].lower, l[1].upper), (1.0, 3.0));
        assert_eq!((l[2].lower, l[2].upper), (3.0, 6.0));
        assert_eq!(s.buckets[0].top(), 6.0);
        assert_eq!(s.domain, (0.0, 6.0));
    }

    #[test]
    fn negative_values_extend_domain_below_zero() {
        let s = build_stack(&[bucket("a", &[("x", -4.0), ("y", 1.0)])], &order(&["x", "y"]));
        assert_eq!(s.domain, (-4.0, -3.0));
        assert_eq!(s.buckets[0].layers[1].lower, -4.0);
        assert_eq!(s.buckets[0].top(), -3.0);
    }

    #[test]
    fn missing_channel_is_zero_height() {
        let s = build_stack(&[bucket("a", &[("x", 2.0)])], &order(&["y", "x"]));
        assert_eq!(s.buckets[0].layers[0].upper, 0.0);
        assert_eq!(s.buckets[0].top(), 2.0);
    }

    #[test]
    fn empty_input() {
        let s = build_stack(&[], &order(&["x"]));
        assert!(s.buckets.is_empty());
        assert_eq!(s.domain, (0.0, 0.0));
    }
}
