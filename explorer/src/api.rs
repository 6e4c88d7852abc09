//! Public API surface shared with the scatter/meta backend.
//!
//! This file consolidates the DTO types exchanged with the backend.
//! All types derive Serialize/Deserialize for JSON serialization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Film identifier (backend primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FilmId(pub i64);

impl FilmId {
    pub fn new(value: i64) -> Self {
        FilmId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for FilmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which rating column the backend should read.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingSource {
    #[default]
    Tmdb,
    Imdb,
}

impl RatingSource {
    pub const ALL: [RatingSource; 2] = [RatingSource::Tmdb, RatingSource::Imdb];

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingSource::Tmdb => "tmdb",
            RatingSource::Imdb => "imdb",
        }
    }
}

impl fmt::Display for RatingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatingSource {
    type Err = String;

    /// Exact match only: `"TMDB"` is not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RatingSource::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| format!("Unknown rating source: {}", s))
    }
}

/// Global dataset bounds returned by `/meta`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaResponse {
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

/// Linear trend summary computed upstream for a whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub slope: Option<f64>,
    pub r2: Option<f64>,
    #[serde(default)]
    pub n: u64,
}

impl Trend {
    /// Slope and R² when both are present and finite.
    pub fn fit(&self) -> Option<(f64, f64)> {
        match (self.slope, self.r2) {
            (Some(slope), Some(r2)) if slope.is_finite() && r2.is_finite() => Some((slope, r2)),
            _ => None,
        }
    }
}

/// A film positioned by budget and revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPoint {
    pub id: FilmId,
    pub title: String,
    pub year: Option<i32>,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
    pub poster_path: Option<String>,
}

/// A film positioned by rating and revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingPoint {
    pub id: FilmId,
    pub title: String,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub revenue: Option<f64>,
    pub poster_path: Option<String>,
}

/// Response of `/scatter/budget-revenue`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetSeries {
    pub points: Vec<BudgetPoint>,
    pub trend: Trend,
}

/// Response of `/scatter/rating-revenue`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSeries {
    pub points: Vec<RatingPoint>,
    pub trend: Trend,
    #[serde(default)]
    pub source: RatingSource,
}

/// The two scatter variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Budget,
    Rating,
}

/// Shape shared by both point variants.
///
/// `primary` is the x metric (budget or rating). Missing metrics stay `None`;
/// callers decide whether to substitute a rendering minimum.
pub trait FilmPoint: Clone {
    const KIND: SeriesKind;

    fn id(&self) -> FilmId;
    fn title(&self) -> &str;
    fn year(&self) -> Option<i32>;
    fn poster_path(&self) -> Option<&str>;
    fn primary(&self) -> Option<f64>;
    fn revenue(&self) -> Option<f64>;

    fn rating(&self) -> Option<f64> {
        None
    }
}

impl FilmPoint for BudgetPoint {
    const KIND: SeriesKind = SeriesKind::Budget;

    fn id(&self) -> FilmId {
        self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn year(&self) -> Option<i32> {
        self.year
    }
    fn poster_path(&self) -> Option<&str> {
        self.poster_path.as_deref()
    }
    fn primary(&self) -> Option<f64> {
        self.budget
    }
    fn revenue(&self) -> Option<f64> {
        self.revenue
    }
}

impl FilmPoint for RatingPoint {
    const KIND: SeriesKind = SeriesKind::Rating;

    fn id(&self) -> FilmId {
        self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn year(&self) -> Option<i32> {
        self.year
    }
    fn poster_path(&self) -> Option<&str> {
        self.poster_path.as_deref()
    }
    fn primary(&self) -> Option<f64> {
        self.rating
    }
    fn revenue(&self) -> Option<f64> {
        self.revenue
    }
    fn rating(&self) -> Option<f64> {
        self.rating
    }
}
