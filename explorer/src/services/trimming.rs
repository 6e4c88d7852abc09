//! Outlier trimming applied to a fetched series before charting.
//!
//! Bounds come from the sample currently on screen, so what counts as an
//! outlier moves with the active filters.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::stats::{bounds_by_percentile, PercentileBounds};
use crate::api::{FilmPoint, SeriesKind};

/// Trimming thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimPolicy {
    /// Budgets below this are data-entry noise.
    #[serde(default = "default_budget_floor")]
    pub budget_floor: f64,
    /// Revenues below this are data-entry noise (budget series only).
    #[serde(default = "default_revenue_floor")]
    pub revenue_floor: f64,
    #[serde(default = "default_ratio_floor")]
    pub ratio_floor: f64,
    #[serde(default = "default_ratio_ceiling")]
    pub ratio_ceiling: f64,
    #[serde(default = "default_low_percentile")]
    pub low_percentile: f64,
    #[serde(default = "default_high_percentile")]
    pub high_percentile: f64,
}

fn default_budget_floor() -> f64 {
    10_000.0
}

fn default_revenue_floor() -> f64 {
    1_000.0
}

fn default_ratio_floor() -> f64 {
    0.001
}

fn default_ratio_ceiling() -> f64 {
    1000.0
}

fn default_low_percentile() -> f64 {
    0.01
}

fn default_high_percentile() -> f64 {
    0.99
}

impl Default for TrimPolicy {
    fn default() -> Self {
        Self {
            budget_floor: default_budget_floor(),
            revenue_floor: default_revenue_floor(),
            ratio_floor: default_ratio_floor(),
            ratio_ceiling: default_ratio_ceiling(),
            low_percentile: default_low_percentile(),
            high_percentile: default_high_percentile(),
        }
    }
}

/// Envelope a point must fall inside to be charted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimEnvelope {
    pub primary: PercentileBounds,
    pub revenue: PercentileBounds,
    /// Revenue/budget ratio; budget series only.
    pub ratio: Option<PercentileBounds>,
}

impl TrimEnvelope {
    fn admits(&self, primary: f64, revenue: f64) -> bool {
        self.primary.contains(primary)
            && self.revenue.contains(revenue)
            && self
                .ratio
                .map_or(true, |ratio| ratio.contains(revenue / primary))
    }
}

/// Both metrics of a point when they are usable for statistics.
fn metrics<P: FilmPoint>(point: &P) -> Option<(f64, f64)> {
    let primary = point.primary().filter(|v| v.is_finite() && *v > 0.0)?;
    let revenue = point.revenue().filter(|v| v.is_finite() && *v > 0.0)?;
    Some((primary, revenue))
}

/// Hard rules applied before any percentile logic.
fn passes_floors<P: FilmPoint>(point: &P, policy: &TrimPolicy) -> Option<(f64, f64)> {
    let (primary, revenue) = metrics(point)?;
    if P::KIND == SeriesKind::Budget
        && (primary < policy.budget_floor || revenue < policy.revenue_floor)
    {
        return None;
    }
    Some((primary, revenue))
}

/// Percentile envelope of the points that survive the hard rules.
pub fn envelope<P: FilmPoint>(points: &[P], policy: &TrimPolicy) -> TrimEnvelope {
    let usable: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|p| passes_floors(p, policy))
        .collect();

    let (low_p, high_p) = (policy.low_percentile, policy.high_percentile);
    let primary = bounds_by_percentile(usable.iter().map(|(x, _)| *x), low_p, high_p);
    let revenue = bounds_by_percentile(usable.iter().map(|(_, y)| *y), low_p, high_p);
    let ratio = (P::KIND == SeriesKind::Budget).then(|| {
        bounds_by_percentile(usable.iter().map(|(x, y)| y / x), low_p, high_p)
            .clamped(policy.ratio_floor, policy.ratio_ceiling)
    });

    TrimEnvelope {
        primary,
        revenue,
        ratio,
    }
}

/// Points that pass the hard rules and fall inside the percentile envelope,
/// in their original order.
pub fn trim_outliers<P: FilmPoint>(points: &[P], policy: &TrimPolicy) -> Vec<P> {
    let envelope = envelope(points, policy);
    let kept: Vec<P> = points
        .iter()
        .filter(|p| {
            passes_floors(*p, policy)
                .is_some_and(|(primary, revenue)| envelope.admits(primary, revenue))
        })
        .cloned()
        .collect();

    debug!(
        kind = ?P::KIND,
        total = points.len(),
        kept = kept.len(),
        "Trimmed outliers"
    );
    kept
}

#[cfg(test)]
#[path = "trimming_tests.rs"]
mod trimming_tests;
