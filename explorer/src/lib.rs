//! # TMDB Explorer
//!
//! Client-side pipeline of a film dashboard: budget/revenue and rating/revenue
//! scatter plots plus "top films" lists, filtered by genre, year range, row
//! limit and rating source.
//!
//! ## Architecture
//!
//! - [`filters`]: filter state, its query-string codec and URL mirroring
//! - [`source`]: the [`source::FilmSource`] trait with HTTP and in-memory backends
//! - [`coordinator`]: debounced, staleness-guarded fetching per panel
//! - [`services`]: percentile statistics, outlier trimming, chart view models
//!   and ranked lists
//! - [`dashboard`]: page composition wiring the above together
//! - [`export`]: PNG rendering of a chart configuration
//! - [`config`]: TOML + environment configuration
//!
//! ## Data flow
//!
//! ```text
//! query string ─► FilterState ─► RequestCoordinator ─► FilmSource
//!                                       │
//!                                settled series
//!                                       │
//!                 trim_outliers ─► build_chart / build_ranked_list
//! ```

pub mod api;
pub mod config;
pub mod coordinator;
pub mod dashboard;
pub mod export;
pub mod filters;
pub mod services;
pub mod source;

pub use config::ExplorerConfig;
pub use dashboard::{Dashboard, DashboardView};
pub use filters::FilterState;
