//! Page-level composition: filters, URL mirroring and the three panels.
//!
//! Each panel fetches through its own [`RequestCoordinator`], so a slow
//! budget series never holds back the rating chart or the top-films list.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{BudgetSeries, MetaResponse, RatingSeries, RatingSource};
use crate::config::ExplorerConfig;
use crate::coordinator::{Phase, RequestCoordinator, Snapshot};
use crate::filters::{FilterBar, FilterState, HistoryBackend, UrlState};
use crate::services::{
    build_chart, build_ranked_list, trim_outliers, ChartContext, ChartViewModel, RankedList,
    SortKey,
};
use crate::source::FilmSource;

/// What one panel shows: its rendered view (if any data arrived) and status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView<V> {
    pub phase: Phase,
    pub loading: bool,
    pub error: Option<String>,
    pub view: Option<V>,
}

impl<V> PanelView<V> {
    fn from_snapshot<T>(snapshot: &Snapshot<T>, view: Option<V>) -> Self {
        Self {
            phase: snapshot.phase,
            loading: snapshot.is_loading(),
            error: snapshot.error.clone(),
            view,
        }
    }
}

/// Serializable state of the whole page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filters: FilterState,
    pub query: String,
    pub filter_bar: FilterBar,
    pub meta_error: Option<String>,
    pub budget: PanelView<ChartViewModel>,
    pub rating: PanelView<ChartViewModel>,
    pub top_by_revenue: PanelView<RankedList>,
    pub top_by_rating: PanelView<RankedList>,
}

pub struct Dashboard<H: HistoryBackend> {
    url: UrlState<H>,
    source: Arc<dyn FilmSource>,
    config: ExplorerConfig,
    meta: Option<MetaResponse>,
    meta_error: Option<String>,
    budget: RequestCoordinator<BudgetSeries>,
    rating: RequestCoordinator<RatingSeries>,
    top: RequestCoordinator<RatingSeries>,
}

/// The budget series ignores the rating source; normalizing it keeps a
/// source switch from re-fetching budget data.
fn budget_params(filters: &FilterState) -> FilterState {
    FilterState {
        rating_source: RatingSource::default(),
        ..filters.clone()
    }
}

fn rating_coordinator(source: &Arc<dyn FilmSource>, config: &ExplorerConfig) -> RequestCoordinator<RatingSeries> {
    let source = Arc::clone(source);
    RequestCoordinator::new(config.dashboard.debounce(), move |filters: FilterState| {
        let source = Arc::clone(&source);
        async move { source.fetch_rating_series(&filters).await }
    })
}

impl<H: HistoryBackend> Dashboard<H> {
    /// Restore filters from `history` and wire one coordinator per panel.
    pub fn new(source: Arc<dyn FilmSource>, history: H, config: ExplorerConfig) -> Self {
        let budget = {
            let source = Arc::clone(&source);
            RequestCoordinator::new(config.dashboard.debounce(), move |filters: FilterState| {
                let source = Arc::clone(&source);
                async move { source.fetch_budget_series(&filters).await }
            })
        };
        let rating = rating_coordinator(&source, &config);
        let top = rating_coordinator(&source, &config);

        Self {
            url: UrlState::restore(history),
            source,
            config,
            meta: None,
            meta_error: None,
            budget,
            rating,
            top,
        }
    }

    pub fn filters(&self) -> &FilterState {
        self.url.filters()
    }

    pub fn history(&self) -> &H {
        self.url.history()
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn budget_panel(&self) -> &RequestCoordinator<BudgetSeries> {
        &self.budget
    }

    pub fn rating_panel(&self) -> &RequestCoordinator<RatingSeries> {
        &self.rating
    }

    pub fn top_panel(&self) -> &RequestCoordinator<RatingSeries> {
        &self.top
    }

    /// Start every panel and queue the restored filters.
    pub fn start(&self) {
        self.budget.start();
        self.rating.start();
        self.top.start();
        self.submit();
        info!(query = %self.url.filters().to_query(), "Dashboard started");
    }

    /// Stop every panel; responses still in flight are ignored.
    pub fn stop(&self) {
        self.budget.stop();
        self.rating.stop();
        self.top.stop();
    }

    fn submit(&self) {
        let filters = self.url.filters();
        self.budget.submit(budget_params(filters));
        self.rating.submit(filters.clone());
        self.top.submit(filters.clone());
    }

    /// Apply a filter bar change. Returns `false` when nothing changed.
    pub fn set_filters(&mut self, next: FilterState) -> bool {
        if !self.url.set_filters(next) {
            return false;
        }
        self.submit();
        true
    }

    pub fn set_rating_source(&mut self, source: RatingSource) -> bool {
        if !self.url.set_rating_source(source) {
            return false;
        }
        self.submit();
        true
    }

    /// Re-issue every panel's last request immediately.
    pub fn refresh(&self) {
        self.budget.refresh();
        self.rating.refresh();
        self.top.refresh();
    }

    /// Fetch the global metadata backing the filter bar.
    ///
    /// Failures are kept as a message; the filter bar falls back to defaults.
    pub async fn load_meta(&mut self) -> Result<MetaResponse, String> {
        match self.source.fetch_meta().await {
            Ok(meta) => {
                info!(genres = meta.genres.len(), "Loaded metadata");
                self.meta = Some(meta.clone());
                self.meta_error = None;
                Ok(meta)
            }
            Err(err) => {
                warn!(error = %err, "Failed to load metadata");
                let message = err.to_string();
                self.meta_error = Some(message.clone());
                Err(message)
            }
        }
    }

    pub fn filter_bar(&self) -> FilterBar {
        match &self.meta {
            Some(meta) => FilterBar::from_meta(meta),
            None => FilterBar::from_meta(&MetaResponse::default()),
        }
    }

    fn chart_context<'a>(&'a self, params: Option<&'a FilterState>, source: RatingSource) -> ChartContext<'a> {
        ChartContext {
            genre: params.unwrap_or_else(|| self.url.filters()).genre(),
            source,
            posters: &self.config.posters,
        }
    }

    /// Budget scatter built from the last applied response, trimmed.
    pub fn budget_view(&self) -> Option<ChartViewModel> {
        let snapshot = self.budget.snapshot();
        let series = snapshot.data.as_ref()?;
        let points = trim_outliers(&series.points, &self.config.trimming);
        let ctx = self.chart_context(snapshot.params.as_ref(), RatingSource::default());
        Some(build_chart(&points, &series.trend, &ctx))
    }

    /// Rating scatter built from the last applied response, trimmed.
    pub fn rating_view(&self) -> Option<ChartViewModel> {
        let snapshot = self.rating.snapshot();
        let series = snapshot.data.as_ref()?;
        let points = trim_outliers(&series.points, &self.config.trimming);
        let ctx = self.chart_context(snapshot.params.as_ref(), series.source);
        Some(build_chart(&points, &series.trend, &ctx))
    }

    /// Top films from the untrimmed rating series.
    pub fn top_films(&self, key: SortKey) -> Option<RankedList> {
        let snapshot = self.top.snapshot();
        let series = snapshot.data.as_ref()?;
        Some(build_ranked_list(
            &series.points,
            key,
            self.config.dashboard.top_count,
            &self.config.posters,
        ))
    }

    /// Wait until no panel has a pending or in-flight request.
    pub async fn settled(&self) {
        futures::join!(self.budget.settled(), self.rating.settled(), self.top.settled());
    }

    pub fn view(&self) -> DashboardView {
        let budget = self.budget.snapshot();
        let rating = self.rating.snapshot();
        let top = self.top.snapshot();

        DashboardView {
            filters: self.url.filters().clone(),
            query: self.url.filters().to_query(),
            filter_bar: self.filter_bar(),
            meta_error: self.meta_error.clone(),
            budget: PanelView::from_snapshot(&budget, self.budget_view()),
            rating: PanelView::from_snapshot(&rating, self.rating_view()),
            top_by_revenue: PanelView::from_snapshot(&top, self.top_films(SortKey::Revenue)),
            top_by_rating: PanelView::from_snapshot(&top, self.top_films(SortKey::Rating)),
        }
    }
}
