//! Options offered by the filter bar, derived from `/meta`.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::state::Limit;
use crate::api::{MetaResponse, RatingSource};

/// Lower bound of the year inputs when the dataset reports none.
pub const FALLBACK_YEAR_MIN: i32 = 1900;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterBar {
    /// Genre choices; an unset genre means "All genres".
    pub genres: Vec<String>,
    pub year_min: i32,
    pub year_max: i32,
    pub limits: Vec<u32>,
    pub rating_sources: Vec<RatingSource>,
}

impl FilterBar {
    pub fn from_meta(meta: &MetaResponse) -> Self {
        Self::with_current_year(meta, chrono::Utc::now().year())
    }

    /// Same as [`FilterBar::from_meta`] with an explicit "this year".
    pub fn with_current_year(meta: &MetaResponse, current_year: i32) -> Self {
        Self {
            genres: meta.genres.clone(),
            year_min: meta.year_min.unwrap_or(FALLBACK_YEAR_MIN),
            year_max: meta.year_max.unwrap_or(current_year),
            limits: Limit::options().map(|l| l.value()).collect(),
            rating_sources: RatingSource::ALL.to_vec(),
        }
    }
}
