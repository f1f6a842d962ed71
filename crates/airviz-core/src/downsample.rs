// File: crates/airviz-core/src/downsample.rs
// Summary: Largest-Triangle-Three-Buckets reduction of dense time series before drawing.

use crate::series::TimePoint;

/// Reduce `points` to at most `threshold` points while keeping peaks and
/// troughs. First and last points are always kept; input order is preserved.
pub fn lttb(points: &[TimePoint], threshold: usize) -> Vec<TimePoint> {
    let n = points.len();
    if threshold >= n || n <= 2 {
        return points.to_vec();
    }
    match threshold {
        0 => return Vec::new(),
        1 => return vec![points[0]],
        2 => return vec![points[0], points[n - 1]],
        _ => {}
    }

    // Interior points are split into `threshold - 2` buckets.
    let every = (n - 2) as f64 / (threshold - 2) as f64;
    let bucket_bounds = |i: usize| -> (usize, usize) {
        let lo = 1 + (i as f64 * every).floor() as usize;
        let hi = (1 + ((i + 1) as f64 * every).floor() as usize).min(n - 1);
        (lo, hi.max(lo + 1))
    };

    let mut out = Vec::with_capacity(threshold);
    out.push(points[0]);
    let mut anchor = points[0];

    for i in 0..threshold - 2 {
        let (lo, hi) = bucket_bounds(i);

        // Average of the following bucket (or the last point for the final bucket).
        let (nlo, nhi) = if i + 1 < threshold - 2 { bucket_bounds(i + 1) } else { (n - 1, n) };
        let next = &points[nlo..nhi.min(n)];
        let (sum_t, sum_v) = next.iter().fold((0.0, 0.0), |(t, v), p| (t + p.t, v + p.v));
        let (avg_t, avg_v) = (sum_t / next.len() as f64, sum_v / next.len() as f64);

        let best = points[lo..hi.min(n - 1)]
            .iter()
            .copied()
            .max_by(|a, b| {
                let area = |p: &TimePoint| ((anchor.t - avg_t) * (p.v - anchor.v) - (anchor.t - p.t) * (avg_v - anchor.v)).abs();
                area(a).total_cmp(&area(b))
            })
            .unwrap_or(points[lo]);
        out.push(best);
        anchor = best;
    }

    out.push(points[n - 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(n: usize) -> Vec<TimePoint> {
        (0..n).map(|i| TimePoint { t: i as f64, v: (i as f64 * 0.3).sin() }).collect()
    }

    #[test]
    fn keeps_endpoints_and_size() {
        let pts = wave(1000);
        let out = lttb(&pts, 50);
        assert_eq!(out.len(), 50);
        assert_eq!(out[0], pts[0]);
        assert_eq!(out[49], pts[999]);
        assert!(out.windows(2).all(|w| w[0].t < w[1].t));
    }

    #[test]
    fn small_inputs_pass_through() {
        let pts = wave(10);
        assert_eq!(lttb(&pts, 20), pts);
        assert_eq!(lttb(&pts, 0), Vec::new());
        assert_eq!(lttb(&pts, 2).len(), 2);
    }

    #[test]
    fn keeps_a_spike() {
        let mut pts: Vec<TimePoint> = (0..100).map(|i| TimePoint { t: i as f64, v: 0.0 }).collect();
        pts[37].v = 50.0;
        let out = lttb(&pts, 10);
        assert!(out.iter().any(|p| p.v == 50.0));
    }
}
