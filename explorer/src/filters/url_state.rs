//! Keeps the page's addressable query string in step with the filters.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use super::state::FilterState;
use crate::api::RatingSource;

/// Page history surface.
///
/// Filter changes only ever replace the current entry so the browser's back
/// button is not flooded with intermediate states.
pub trait HistoryBackend: Send + Sync {
    /// Replace the current entry's query string without navigating.
    fn replace_query(&self, query: &str);

    /// Query string the page was loaded with.
    fn current_query(&self) -> String;
}

/// In-process history used by the CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    inner: Arc<Mutex<MemoryHistoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryHistoryInner {
    query: String,
    replacements: usize,
    entries: usize,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::with_query("")
    }

    /// A history whose single entry was loaded with `query`.
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryHistoryInner {
                query: query.into(),
                replacements: 0,
                entries: 1,
            })),
        }
    }

    pub fn replacements(&self) -> usize {
        self.inner.lock().replacements
    }

    /// Number of history entries; replacing never adds one.
    pub fn entries(&self) -> usize {
        self.inner.lock().entries
    }
}

impl HistoryBackend for MemoryHistory {
    fn replace_query(&self, query: &str) {
        let mut inner = self.inner.lock();
        inner.query = query.to_string();
        inner.replacements += 1;
    }

    fn current_query(&self) -> String {
        self.inner.lock().query.clone()
    }
}

/// Current filters plus the history they are mirrored into.
pub struct UrlState<H: HistoryBackend> {
    filters: FilterState,
    history: H,
}

impl<H: HistoryBackend> UrlState<H> {
    /// Restore filters from the history's current query, falling back to defaults.
    pub fn restore(history: H) -> Self {
        let filters = FilterState::from_query(&history.current_query());
        debug!(?filters, "Restored filters from page query");
        Self { filters, history }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Filter bar change callback: store and mirror into the query string.
    ///
    /// Returns `false` when nothing changed.
    pub fn set_filters(&mut self, next: FilterState) -> bool {
        if next == self.filters {
            return false;
        }
        self.filters = next;
        let query = self.filters.to_query();
        debug!(%query, "Replacing page query");
        self.history.replace_query(&query);
        true
    }

    pub fn set_rating_source(&mut self, source: RatingSource) -> bool {
        let next = FilterState {
            rating_source: source,
            ..self.filters.clone()
        };
        self.set_filters(next)
    }
}
