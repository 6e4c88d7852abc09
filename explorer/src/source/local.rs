//! In-memory [`FilmSource`] for unit testing and local development.
//!
//! Applies the same genre/year/limit filtering the backend does, but never
//! fits trends: each series reports whatever trend it was seeded with.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{FilmSource, SourceError, SourceResult};
use crate::api::{
    BudgetPoint, BudgetSeries, FilmId, MetaResponse, RatingPoint, RatingSeries, RatingSource,
    SeriesKind, Trend,
};
use crate::filters::FilterState;

/// Most common original languages reported by `fetch_meta`.
const META_LANGUAGE_LIMIT: usize = 20;

/// One film row of the local dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalFilm {
    pub id: FilmId,
    pub title: String,
    pub year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub original_language: Option<String>,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
    pub tmdb_rating: Option<f64>,
    pub imdb_rating: Option<f64>,
    pub poster_path: Option<String>,
}

impl LocalFilm {
    pub fn new(id: i64, title: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            id: FilmId::new(id),
            title: title.into(),
            year,
            genres: Vec::new(),
            original_language: None,
            budget: None,
            revenue: None,
            tmdb_rating: None,
            imdb_rating: None,
            poster_path: None,
        }
    }

    fn matches(&self, filters: &FilterState) -> bool {
        if let Some(genre) = filters.genre() {
            if !self.genres.iter().any(|g| g == genre) {
                return false;
            }
        }
        match (filters.year_min, filters.year_max, self.year) {
            (None, None, _) => true,
            (_, _, None) => false,
            (min, max, Some(year)) => {
                min.map_or(true, |m| year >= m) && max.map_or(true, |m| year <= m)
            }
        }
    }

    fn rating(&self, source: RatingSource) -> Option<f64> {
        match source {
            RatingSource::Tmdb => self.tmdb_rating,
            RatingSource::Imdb => self.imdb_rating,
        }
    }
}

#[derive(Debug, Default)]
struct LocalState {
    films: Vec<LocalFilm>,
    trends: HashMap<SeriesKind, Trend>,
    failure: Option<String>,
    latency: Duration,
}

/// In-memory dataset.
#[derive(Debug, Default)]
pub struct LocalFilmSource {
    state: RwLock<LocalState>,
    series_calls: AtomicUsize,
}

impl LocalFilmSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_films(films: Vec<LocalFilm>) -> Self {
        let source = Self::new();
        source.state.write().films = films;
        source
    }

    pub fn insert(&self, film: LocalFilm) {
        self.state.write().films.push(film);
    }

    /// Trend reported for every `kind` series from now on.
    pub fn set_trend(&self, kind: SeriesKind, trend: Trend) {
        self.state.write().trends.insert(kind, trend);
    }

    /// Make every fetch fail with `message` until cleared with `None`.
    pub fn set_failure(&self, message: Option<String>) {
        self.state.write().failure = message;
    }

    /// Simulated response time.
    pub fn set_latency(&self, latency: Duration) {
        self.state.write().latency = latency;
    }

    /// Number of series fetches served so far (budget and rating).
    pub fn series_calls(&self) -> usize {
        self.series_calls.load(Ordering::SeqCst)
    }

    async fn respond(&self) -> SourceResult<()> {
        let (latency, failure) = {
            let state = self.state.read();
            (state.latency, state.failure.clone())
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        match failure {
            Some(message) => Err(SourceError::Unavailable(message)),
            None => Ok(()),
        }
    }

    fn selected(&self, filters: &FilterState) -> Vec<LocalFilm> {
        self.state
            .read()
            .films
            .iter()
            .filter(|f| f.matches(filters))
            .take(filters.limit.value() as usize)
            .cloned()
            .collect()
    }

    fn trend(&self, kind: SeriesKind, n: usize) -> Trend {
        self.state.read().trends.get(&kind).copied().unwrap_or(Trend {
            slope: None,
            r2: None,
            n: n as u64,
        })
    }
}

/// Values ordered by descending frequency, then by value.
fn by_frequency<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values.filter(|v| !v.is_empty()) {
        *counts.entry(value).or_default() += 1;
    }
    let mut ordered: Vec<(&str, usize)> = counts.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ordered.into_iter().map(|(v, _)| v.to_string()).collect()
}

#[async_trait]
impl FilmSource for LocalFilmSource {
    async fn fetch_meta(&self) -> SourceResult<MetaResponse> {
        self.respond().await?;
        let state = self.state.read();
        let years = state.films.iter().filter_map(|f| f.year);

        let mut languages = by_frequency(
            state
                .films
                .iter()
                .filter_map(|f| f.original_language.as_deref()),
        );
        languages.truncate(META_LANGUAGE_LIMIT);

        Ok(MetaResponse {
            year_min: years.clone().min(),
            year_max: years.max(),
            genres: by_frequency(state.films.iter().flat_map(|f| f.genres.iter().map(String::as_str))),
            languages,
        })
    }

    async fn fetch_budget_series(&self, filters: &FilterState) -> SourceResult<BudgetSeries> {
        self.series_calls.fetch_add(1, Ordering::SeqCst);
        self.respond().await?;

        let points: Vec<BudgetPoint> = self
            .selected(filters)
            .into_iter()
            .map(|f| BudgetPoint {
                id: f.id,
                title: f.title,
                year: f.year,
                budget: f.budget,
                revenue: f.revenue,
                poster_path: f.poster_path,
            })
            .collect();
        let trend = self.trend(SeriesKind::Budget, points.len());

        Ok(BudgetSeries { points, trend })
    }

    async fn fetch_rating_series(&self, filters: &FilterState) -> SourceResult<RatingSeries> {
        self.series_calls.fetch_add(1, Ordering::SeqCst);
        self.respond().await?;

        let source = filters.rating_source;
        let points: Vec<RatingPoint> = self
            .selected(filters)
            .into_iter()
            .map(|f| RatingPoint {
                rating: f.rating(source),
                id: f.id,
                title: f.title,
                year: f.year,
                revenue: f.revenue,
                poster_path: f.poster_path,
            })
            .collect();
        let trend = self.trend(SeriesKind::Rating, points.len());

        Ok(RatingSeries {
            points,
            trend,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::Limit;

    fn film(id: i64, year: Option<i32>, genres: &[&str], language: &str) -> LocalFilm {
        LocalFilm {
            genres: genres.iter().map(|g| g.to_string()).collect(),
            original_language: Some(language.to_string()),
            budget: Some(id as f64 * 1_000_000.0),
            revenue: Some(id as f64 * 3_000_000.0),
            tmdb_rating: Some(6.0),
            imdb_rating: Some(7.5),
            ..LocalFilm::new(id, format!("film_{}", id), year)
        }
    }

    fn dataset() -> LocalFilmSource {
        LocalFilmSource::with_films(vec![
            film(1, Some(1985), &["Drama"], "en"),
            film(2, Some(1995), &["Drama", "Crime"], "fr"),
            film(3, None, &["Comedy"], "en"),
            film(4, Some(2005), &["Crime"], "en"),
        ])
    }

    #[tokio::test]
    async fn test_meta_summarizes_dataset() {
        let meta = dataset().fetch_meta().await.unwrap();

        assert_eq!(meta.year_min, Some(1985));
        assert_eq!(meta.year_max, Some(2005));
        assert_eq!(meta.genres, vec!["Crime", "Drama", "Comedy"]);
        assert_eq!(meta.languages, vec!["en", "fr"]);
    }

    #[tokio::test]
    async fn test_series_filtering() {
        let source = dataset();
        let filters = FilterState {
            genre: Some("Drama".into()),
            year_min: Some(1990),
            ..FilterState::default()
        };
        let series = source.fetch_budget_series(&filters).await.unwrap();

        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].id, FilmId::new(2));
        assert_eq!(series.trend, Trend { slope: None, r2: None, n: 1 });

        // no year bounds keeps undated films
        let all = source.fetch_budget_series(&FilterState::default()).await.unwrap();
        assert_eq!(all.points.len(), 4);
        assert_eq!(source.series_calls(), 2);
    }

    #[tokio::test]
    async fn test_rating_series_uses_requested_source() {
        let source = dataset();
        source.set_trend(
            SeriesKind::Rating,
            Trend {
                slope: Some(0.2),
                r2: Some(0.1),
                n: 99,
            },
        );
        let filters = FilterState {
            rating_source: RatingSource::Imdb,
            limit: Limit::new(500).unwrap(),
            ..FilterState::default()
        };
        let series = source.fetch_rating_series(&filters).await.unwrap();

        assert_eq!(series.source, RatingSource::Imdb);
        assert!(series.points.iter().all(|p| p.rating == Some(7.5)));
        assert_eq!(series.trend.n, 99);
    }

    #[tokio::test]
    async fn test_failure_toggle() {
        let source = dataset();
        source.set_failure(Some("backend down".into()));
        let err = source.fetch_meta().await.unwrap_err();
        assert_eq!(err.to_string(), "Data source unavailable: backend down");

        source.set_failure(None);
        assert!(source.fetch_meta().await.is_ok());
    }
}
