//! Backend data sources.
//!
//! The dashboard reads everything through the [`FilmSource`] trait so the
//! HTTP backend can be swapped for an in-memory dataset in tests and during
//! development.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Dashboard panels (coordinator per panel)   │
//! └───────────────────┬─────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────┐
//! │  FilmSource trait                           │
//! └─────────┬─────────────────────────┬─────────┘
//!           │                         │
//!   HttpFilmSource             LocalFilmSource
//!   (reqwest, /meta,           (in-memory)
//!    /scatter/*)
//! ```

#[cfg(not(any(feature = "http-source", feature = "local-source")))]
compile_error!("Enable at least one data source feature.");

pub mod error;
pub mod factory;
#[cfg(feature = "http-source")]
pub mod http;
#[cfg(feature = "local-source")]
pub mod local;

use async_trait::async_trait;

use crate::api::{BudgetSeries, MetaResponse, RatingSeries};
use crate::filters::FilterState;

pub use error::{SourceError, SourceResult};
pub use factory::{SourceFactory, SourceType};
#[cfg(feature = "http-source")]
pub use http::HttpFilmSource;
#[cfg(feature = "local-source")]
pub use local::LocalFilmSource;

/// Read-only access to the film dataset.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so panels can share one instance.
#[async_trait]
pub trait FilmSource: Send + Sync {
    /// Global bounds: year range, genres, languages.
    async fn fetch_meta(&self) -> SourceResult<MetaResponse>;

    /// Budget/revenue points plus their trend for `filters`.
    async fn fetch_budget_series(&self, filters: &FilterState) -> SourceResult<BudgetSeries>;

    /// Rating/revenue points plus their trend for `filters`, using
    /// `filters.rating_source`.
    async fn fetch_rating_series(&self, filters: &FilterState) -> SourceResult<RatingSeries>;
}
