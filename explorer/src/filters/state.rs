//! Filter set that parameterizes every data fetch.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::RatingSource;

/// Maximum number of films requested from the backend.
///
/// Only the discrete values in [`Limit::ALLOWED`] can be constructed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Limit(u32);

impl Limit {
    pub const ALLOWED: [u32; 6] = [500, 1000, 2000, 5000, 10000, 20000];
    pub const DEFAULT: Limit = Limit(2000);

    pub fn new(value: u32) -> Option<Self> {
        Self::ALLOWED.contains(&value).then_some(Limit(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn options() -> impl Iterator<Item = Limit> {
        Self::ALLOWED.into_iter().map(Limit)
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Limit {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Limit::new(value).ok_or_else(|| format!("Limit {} is not one of {:?}", value, Limit::ALLOWED))
    }
}

impl From<Limit> for u32 {
    fn from(limit: Limit) -> Self {
        limit.0
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The complete filter set.
///
/// `year_min <= year_max` is not enforced; the backend receives whatever the
/// user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    pub genre: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub limit: Limit,
    pub rating_source: RatingSource,
}

/// Fields recovered from a query string; anything absent keeps its current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub genre: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub limit: Option<Limit>,
    pub rating_source: Option<RatingSource>,
}

impl FilterState {
    /// Defaults overlaid with whatever `query` carries.
    pub fn from_query(query: &str) -> Self {
        Self::default().merged(super::codec::decode(query))
    }

    pub fn to_query(&self) -> String {
        super::codec::encode(self)
    }

    /// Overlay the fields present in `patch`.
    pub fn merged(mut self, patch: FilterPatch) -> Self {
        if let Some(genre) = patch.genre {
            self.genre = Some(genre);
        }
        if let Some(year_min) = patch.year_min {
            self.year_min = Some(year_min);
        }
        if let Some(year_max) = patch.year_max {
            self.year_max = Some(year_max);
        }
        if let Some(limit) = patch.limit {
            self.limit = limit;
        }
        if let Some(source) = patch.rating_source {
            self.rating_source = source;
        }
        self
    }

    /// Genre with empty strings treated as unset.
    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref().filter(|g| !g.is_empty())
    }

    /// Query parameters understood by the scatter endpoints.
    ///
    /// `source` is only meaningful for the rating endpoint.
    pub fn request_params(&self, with_source: bool) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(5);
        if let Some(genre) = self.genre() {
            params.push(("genre", genre.to_string()));
        }
        if let Some(year_min) = self.year_min {
            params.push(("ymin", year_min.to_string()));
        }
        if let Some(year_max) = self.year_max {
            params.push(("ymax", year_max.to_string()));
        }
        params.push(("limit", self.limit.to_string()));
        if with_source {
            params.push(("source", self.rating_source.as_str().to_string()));
        }
        params
    }
}
