//! Percentile estimation and percentile-based bounds.

use serde::{Deserialize, Serialize};

/// Fewest usable samples for which percentile trimming is trusted.
pub const MIN_TRIM_SAMPLES: usize = 10;

/// Value at fraction `p` of an ascending sample.
///
/// Linear interpolation between the order statistics bracketing index
/// `(n - 1) * p`. `p` is clamped to `[0, 1]`. Returns `None` for an empty sample.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    let idx = (sorted.len() - 1) as f64 * p;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let w = idx - lo as f64;
    Some(sorted[lo] * (1.0 - w) + sorted[hi] * w)
}

/// Inclusive `[low, high]` envelope computed from one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBounds {
    pub low: f64,
    pub high: f64,
}

impl PercentileBounds {
    /// `[0, +inf)`: nothing positive is excluded.
    pub const UNBOUNDED: PercentileBounds = PercentileBounds {
        low: 0.0,
        high: f64::INFINITY,
    };

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    pub fn is_unbounded(&self) -> bool {
        *self == Self::UNBOUNDED
    }

    /// Tighten to an absolute floor/ceiling.
    pub fn clamped(self, floor: f64, ceiling: f64) -> Self {
        Self {
            low: self.low.max(floor),
            high: self.high.min(ceiling),
        }
    }
}

/// Bounds at the `low_p`/`high_p` percentiles of the positive finite values.
///
/// With fewer than [`MIN_TRIM_SAMPLES`] usable values the result is
/// [`PercentileBounds::UNBOUNDED`].
pub fn bounds_by_percentile(
    values: impl IntoIterator<Item = f64>,
    low_p: f64,
    high_p: f64,
) -> PercentileBounds {
    let mut cleaned: Vec<f64> = values
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();

    if cleaned.len() < MIN_TRIM_SAMPLES {
        return PercentileBounds::UNBOUNDED;
    }

    cleaned.sort_by(f64::total_cmp);
    match (percentile(&cleaned, low_p), percentile(&cleaned, high_p)) {
        (Some(low), Some(high)) => PercentileBounds { low, high },
        _ => PercentileBounds::UNBOUNDED,
    }
}
