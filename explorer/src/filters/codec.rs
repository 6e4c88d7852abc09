//! Query-string codec for [`FilterState`].
//!
//! Decoding never fails: malformed values are dropped and the field is left
//! to its default. Encoding always writes `limit`.

use url::form_urlencoded;

use super::state::{FilterPatch, FilterState, Limit};
use crate::api::RatingSource;

pub const KEY_GENRE: &str = "genre";
pub const KEY_YEAR_MIN: &str = "ymin";
pub const KEY_YEAR_MAX: &str = "ymax";
pub const KEY_LIMIT: &str = "limit";
pub const KEY_SOURCE: &str = "src";
/// Older links spelled the rating source out.
const KEY_SOURCE_LEGACY: &str = "source";

/// Parse a query string (with or without a leading `?`).
pub fn decode(query: &str) -> FilterPatch {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut genre = None;
    let mut year_min = None;
    let mut year_max = None;
    let mut limit = None;
    let mut source = None;
    let mut legacy_source = None;

    // First occurrence of a key wins.
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let slot = match key.as_ref() {
            KEY_GENRE => &mut genre,
            KEY_YEAR_MIN => &mut year_min,
            KEY_YEAR_MAX => &mut year_max,
            KEY_LIMIT => &mut limit,
            KEY_SOURCE => &mut source,
            KEY_SOURCE_LEGACY => &mut legacy_source,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    FilterPatch {
        genre: genre.filter(|g| !g.is_empty()),
        year_min: year_min.as_deref().and_then(parse_whole).and_then(|v| i32::try_from(v).ok()),
        year_max: year_max.as_deref().and_then(parse_whole).and_then(|v| i32::try_from(v).ok()),
        limit: limit
            .as_deref()
            .and_then(parse_whole)
            .and_then(|v| u32::try_from(v).ok())
            .and_then(Limit::new),
        rating_source: source
            .or(legacy_source)
            .and_then(|s| s.parse::<RatingSource>().ok()),
    }
}

/// Serialize the fields that are set. `limit` is always present and `src`
/// only when it differs from the default source.
pub fn encode(filters: &FilterState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    if let Some(genre) = filters.genre() {
        serializer.append_pair(KEY_GENRE, genre);
    }
    if let Some(year_min) = filters.year_min {
        serializer.append_pair(KEY_YEAR_MIN, &year_min.to_string());
    }
    if let Some(year_max) = filters.year_max {
        serializer.append_pair(KEY_YEAR_MAX, &year_max.to_string());
    }
    serializer.append_pair(KEY_LIMIT, &filters.limit.to_string());
    if filters.rating_source != RatingSource::default() {
        serializer.append_pair(KEY_SOURCE, filters.rating_source.as_str());
    }
    serializer.finish()
}

/// A finite number with no fractional part; empty and non-numeric input is `None`.
fn parse_whole(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let value: f64 = raw.parse().ok()?;
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < i64::MIN as f64 || value > i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod codec_tests;
