//! Pure data-shaping services.
//!
//! Everything here is synchronous and side-effect free: fetched series go in,
//! trimmed points, chart configurations and ranked lists come out.

pub mod format;
pub mod posters;
pub mod ranking;
pub mod stats;
pub mod trimming;
pub mod view_model;

pub use posters::{PosterSize, PosterTemplate};
pub use ranking::{build_ranked_list, rank, FilmCard, RankedList, SortKey};
pub use stats::{bounds_by_percentile, percentile, PercentileBounds, MIN_TRIM_SAMPLES};
pub use trimming::{trim_outliers, TrimEnvelope, TrimPolicy};
pub use view_model::{build_chart, Axis, AxisScale, ChartContext, ChartViewModel, RenderPoint, Tooltip};
