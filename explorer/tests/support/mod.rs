#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use tmdb_explorer::source::local::{LocalFilm, LocalFilmSource};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with the `EXPLORER_*` (or any other) variables temporarily set.
///
/// Holds a process-wide lock for the duration so parallel tests never observe
/// each other's overrides; previous values come back even if `f` panics.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::apply(changes);
    f()
}

struct ScopedEnv {
    previous: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let previous = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (key, value) in changes {
            set_or_remove(key, *value);
        }
        Self { previous }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            set_or_remove(&key, value.as_deref());
        }
    }
}

fn set_or_remove(key: &str, value: Option<&str>) {
    match value {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }
}

#[allow(clippy::too_many_arguments)]
fn film(
    id: i64,
    title: &str,
    year: Option<i32>,
    genres: &[&str],
    language: &str,
    budget: Option<f64>,
    revenue: Option<f64>,
    ratings: Option<(f64, f64)>,
) -> LocalFilm {
    LocalFilm {
        genres: genres.iter().map(|g| g.to_string()).collect(),
        original_language: Some(language.to_string()),
        budget,
        revenue,
        tmdb_rating: ratings.map(|(tmdb, _)| tmdb),
        imdb_rating: ratings.map(|(_, imdb)| imdb),
        poster_path: Some(format!("/{}.jpg", id)),
        ..LocalFilm::new(id, title, year)
    }
}

/// Nine films; six tagged Drama. "Primer" sits below the budget floor and
/// "Unreleased" has no numbers at all.
pub fn films() -> Vec<LocalFilm> {
    vec![
        film(1, "Heat", Some(1995), &["Crime", "Drama"], "en", Some(60e6), Some(187e6), Some((7.9, 8.3))),
        film(2, "Rocky", Some(1976), &["Drama"], "en", Some(1e6), Some(225e6), Some((7.8, 8.1))),
        film(3, "Clerks", Some(1994), &["Comedy"], "en", Some(27_575.0), Some(3.1e6), Some((7.4, 7.7))),
        film(4, "Amélie", Some(2001), &["Comedy", "Romance"], "fr", Some(10e6), Some(174e6), Some((7.9, 8.3))),
        film(5, "Primer", Some(2004), &["Science Fiction", "Drama"], "en", Some(7_000.0), Some(841_926.0), Some((6.9, 6.8))),
        film(6, "Titanic", Some(1997), &["Drama", "Romance"], "en", Some(200e6), Some(1.84e9), Some((7.9, 7.9))),
        film(7, "Paddington", Some(2014), &["Comedy"], "en", Some(55e6), Some(268e6), Some((7.2, 7.3))),
        film(8, "Whiplash", Some(2014), &["Drama", "Music"], "en", Some(3.3e6), Some(49e6), Some((8.4, 8.5))),
        film(9, "Unreleased", None, &["Drama"], "en", None, None, None),
    ]
}

pub fn local_source() -> LocalFilmSource {
    LocalFilmSource::with_films(films())
}
