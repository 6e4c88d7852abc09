//! Renderer-agnostic chart configuration.
//!
//! Building is pure: identical points, trend and context always produce an
//! identical [`ChartViewModel`].

use serde::{Deserialize, Serialize};

use super::format::{group_thousands, title_with_year, usd};
use super::posters::{PosterSize, PosterTemplate};
use crate::api::{FilmPoint, RatingSource, SeriesKind, Trend};

/// Rating axis upper bound.
pub const RATING_MAX: f64 = 10.0;
/// Log axes start here so no point maps to a non-positive input.
pub const LOG_AXIS_MIN: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AxisScale {
    Log { base: f64, min: f64 },
    Linear { min: f64, max: f64 },
}

impl AxisScale {
    /// Position of `value` along the axis in `[0, 1]` given the data maximum.
    pub fn normalize(&self, value: f64, data_max: f64) -> f64 {
        let t = match *self {
            AxisScale::Log { base, min } => {
                let lo = min.log(base);
                let hi = data_max.max(min * base).log(base);
                (value.max(min).log(base) - lo) / (hi - lo)
            }
            AxisScale::Linear { min, max } => (value - min) / (max - min),
        };
        if t.is_finite() {
            t.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub name: String,
    pub scale: AxisScale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub heading: String,
    pub lines: Vec<String>,
}

/// One plotted film.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPoint {
    /// `[x, y]` after substituting rendering minimums.
    pub value: [f64; 2],
    pub name: String,
    pub year: Option<i32>,
    pub thumbnail: Option<String>,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartViewModel {
    pub kind: SeriesKind,
    pub title: String,
    pub subtitle: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub points: Vec<RenderPoint>,
    /// Suggested file name for an image export.
    pub export_name: String,
}

/// Inputs besides the data that shape a chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartContext<'a> {
    pub genre: Option<&'a str>,
    pub source: RatingSource,
    pub posters: &'a PosterTemplate,
}

fn log_axis(name: &str) -> Axis {
    Axis {
        name: name.to_string(),
        scale: AxisScale::Log {
            base: 10.0,
            min: LOG_AXIS_MIN,
        },
    }
}

/// `R²=…, slope=…, n=…` when the trend has a fit, else just `n=…`.
pub fn trend_subtitle(trend: &Trend) -> String {
    let n = group_thousands(trend.n);
    match trend.fit() {
        Some((slope, r2)) => format!("Trend R²={:.2}, slope={:.2}, n={}", r2, slope, n),
        None => format!("n={}", n),
    }
}

/// Lower-cased genre with whitespace runs collapsed to `-`, or `all`.
pub fn genre_slug(genre: Option<&str>) -> String {
    match genre.map(str::trim).filter(|g| !g.is_empty()) {
        Some(genre) => genre
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase(),
        None => "all".to_string(),
    }
}

fn chart_title(base: &str, genre: Option<&str>) -> String {
    match genre.filter(|g| !g.is_empty()) {
        Some(genre) => format!("{} — {}", base, genre),
        None => base.to_string(),
    }
}

/// Build the chart configuration for a (trimmed) series.
pub fn build_chart<P: FilmPoint>(points: &[P], trend: &Trend, ctx: &ChartContext<'_>) -> ChartViewModel {
    let render = |point: &P| -> RenderPoint {
        let revenue = point.revenue().unwrap_or(LOG_AXIS_MIN).max(LOG_AXIS_MIN);
        let (x, x_line) = match P::KIND {
            SeriesKind::Budget => {
                let budget = point.primary().unwrap_or(LOG_AXIS_MIN).max(LOG_AXIS_MIN);
                (budget, format!("Budget: {}", usd(budget)))
            }
            SeriesKind::Rating => {
                let rating = point.primary().unwrap_or(0.0);
                (rating, format!("Rating: {:.1}", rating))
            }
        };
        RenderPoint {
            value: [x, revenue],
            name: point.title().to_string(),
            year: point.year(),
            thumbnail: ctx.posters.url(point.poster_path(), PosterSize::W92),
            tooltip: Tooltip {
                heading: title_with_year(point.title(), point.year()),
                lines: vec![x_line, format!("Revenue: {}", usd(revenue))],
            },
        }
    };

    let (title, x_axis, export_name) = match P::KIND {
        SeriesKind::Budget => (
            chart_title("Budget vs Revenue", ctx.genre),
            log_axis("Budget (USD, log)"),
            format!("budget-vs-revenue_{}.png", genre_slug(ctx.genre)),
        ),
        SeriesKind::Rating => (
            chart_title("Rating vs Revenue", ctx.genre),
            Axis {
                name: format!("{} Rating (0–10)", ctx.source.as_str().to_uppercase()),
                scale: AxisScale::Linear {
                    min: 0.0,
                    max: RATING_MAX,
                },
            },
            format!(
                "rating-vs-revenue_{}-{}.png",
                ctx.source.as_str(),
                genre_slug(ctx.genre)
            ),
        ),
    };

    ChartViewModel {
        kind: P::KIND,
        title,
        subtitle: trend_subtitle(trend),
        x_axis,
        y_axis: log_axis("Revenue (USD, log)"),
        points: points.iter().map(render).collect(),
        export_name,
    }
}

#[cfg(test)]
#[path = "view_model_tests.rs"]
mod view_model_tests;
