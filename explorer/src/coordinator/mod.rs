//! Per-panel fetch lifecycle.
//!
//! Each panel owns one [`RequestCoordinator`]. Filter changes are debounced
//! into a single request, every request is tagged with a sequence number, and
//! only the response to the most recently issued request is applied. Earlier
//! responses still complete (nothing is cancelled at the transport level) but
//! are dropped on arrival.
//!
//! ```text
//!   submit ──► [armed timer] ──quiet period──► Fetching(seq) ──► Settled
//!                  ▲    │                                   └──► Error
//!                  └────┘ re-armed by a newer submit
//! ```

mod snapshot;

pub use snapshot::{Phase, Snapshot};

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::filters::FilterState;
use crate::source::SourceResult;

type FetchFn<T> = Arc<dyn Fn(FilterState) -> BoxFuture<'static, SourceResult<T>> + Send + Sync>;

struct CoordinatorState {
    running: bool,
    /// Identity of the only timer allowed to fire.
    armed: u64,
    timer: Option<JoinHandle<()>>,
    pending: Option<FilterState>,
    /// Sequence number of the last issued request.
    latest: u64,
    last_issued: Option<FilterState>,
}

struct Shared<T> {
    state: Mutex<CoordinatorState>,
    updates: watch::Sender<Snapshot<T>>,
}

impl<T> Shared<T> {
    fn publish(&self, f: impl FnOnce(&mut Snapshot<T>)) {
        self.updates.send_modify(f);
    }
}

/// Debounced, staleness-guarded fetcher for one panel.
///
/// All methods that schedule work must be called from within a Tokio runtime.
pub struct RequestCoordinator<T> {
    shared: Arc<Shared<T>>,
    fetch: FetchFn<T>,
    quiet: Duration,
}

impl<T: Send + Sync + 'static> RequestCoordinator<T> {
    pub fn new<F, Fut>(quiet: Duration, fetch: F) -> Self
    where
        F: Fn(FilterState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SourceResult<T>> + Send + 'static,
    {
        let fetch: FetchFn<T> = Arc::new(move |params| fetch(params).boxed());
        let (updates, _) = watch::channel(Snapshot::default());
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(CoordinatorState {
                    running: false,
                    armed: 0,
                    timer: None,
                    pending: None,
                    latest: 0,
                    last_issued: None,
                }),
                updates,
            }),
            fetch,
            quiet,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    pub fn is_running(&self) -> bool {
        self.shared.state.lock().running
    }

    /// Begin accepting parameter changes.
    pub fn start(&self) {
        self.shared.state.lock().running = true;
    }

    /// Stop accepting changes, drop any armed timer and ignore in-flight responses.
    ///
    /// Previously applied data stays visible in the snapshot.
    pub fn stop(&self) {
        let mut state = self.shared.state.lock();
        if !state.running {
            return;
        }
        state.running = false;
        state.armed += 1;
        state.pending = None;
        state.last_issued = None;
        // Responses carrying an older sequence number are now stale.
        state.latest += 1;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        self.shared.publish(|snapshot| {
            snapshot.phase = Phase::Idle;
            snapshot.pending = false;
        });
        debug!("Coordinator stopped");
    }

    /// Queue `params`; the fetch is issued once no newer parameters arrive
    /// for the quiet period.
    ///
    /// Returns `false` when the change was ignored (stopped, or identical to
    /// the request already issued with nothing pending).
    pub fn submit(&self, params: FilterState) -> bool {
        let mut state = self.shared.state.lock();
        if !state.running {
            debug!("Ignoring parameters submitted to a stopped coordinator");
            return false;
        }
        if state.pending.is_none() && state.last_issued.as_ref() == Some(&params) {
            return false;
        }
        state.pending = Some(params);
        self.arm(&mut state, self.quiet);
        true
    }

    /// Re-issue the last parameters immediately (user-triggered retry).
    pub fn refresh(&self) -> bool {
        let mut state = self.shared.state.lock();
        if !state.running {
            return false;
        }
        let Some(params) = state.pending.clone().or_else(|| state.last_issued.clone()) else {
            return false;
        };
        state.pending = Some(params);
        self.arm(&mut state, Duration::ZERO);
        true
    }

    fn arm(&self, state: &mut CoordinatorState, delay: Duration) {
        state.armed += 1;
        let armed = state.armed;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        let shared = Arc::clone(&self.shared);
        let fetch = Arc::clone(&self.fetch);
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            Self::fire(shared, fetch, armed);
        }));
        self.shared.publish(|snapshot| snapshot.pending = true);
    }

    fn fire(shared: Arc<Shared<T>>, fetch: FetchFn<T>, armed: u64) {
        let (seq, params) = {
            let mut state = shared.state.lock();
            // A newer submit re-armed the timer after this one woke up.
            if !state.running || state.armed != armed {
                return;
            }
            let Some(params) = state.pending.take() else {
                return;
            };
            state.timer = None;
            state.latest += 1;
            state.last_issued = Some(params.clone());
            let seq = state.latest;
            shared.publish(|snapshot| {
                snapshot.phase = Phase::Fetching;
                snapshot.pending = false;
                snapshot.issued = seq;
            });
            (seq, params)
        };

        info!(seq, ?params, "Issuing fetch");
        let request = fetch(params.clone());
        // Detached: superseding a request never cancels it.
        tokio::spawn(async move {
            let result = request.await;
            Self::settle(&shared, seq, params, result);
        });
    }

    fn settle(shared: &Shared<T>, seq: u64, params: FilterState, result: SourceResult<T>) {
        let state = shared.state.lock();
        if !state.running || seq != state.latest {
            debug!(seq, latest = state.latest, "Discarding stale response");
            return;
        }
        match result {
            Ok(data) => {
                info!(seq, "Response applied");
                shared.publish(|snapshot| {
                    snapshot.phase = Phase::Settled;
                    snapshot.data = Some(Arc::new(data));
                    snapshot.params = Some(params);
                    snapshot.error = None;
                    snapshot.applied = seq;
                });
            }
            Err(err) => {
                warn!(seq, error = %err, "Fetch failed");
                shared.publish(|snapshot| {
                    snapshot.phase = Phase::Error;
                    snapshot.error = Some(err.to_string());
                });
            }
        }
    }

    /// Current state of the panel's data.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.shared.updates.borrow().clone()
    }

    /// Receiver notified on every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.shared.updates.subscribe()
    }

    /// Wait until nothing is pending or in flight.
    ///
    /// Returns immediately for an idle coordinator with nothing queued.
    pub async fn settled(&self) -> Snapshot<T> {
        let mut updates = self.subscribe();
        loop {
            let snapshot = updates.borrow_and_update().clone();
            if snapshot.is_quiescent() || updates.changed().await.is_err() {
                return snapshot;
            }
        }
    }
}

impl<T> Drop for RequestCoordinator<T> {
    fn drop(&mut self) {
        if let Some(timer) = self.shared.state.lock().timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod coordinator_tests;
