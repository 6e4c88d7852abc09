use super::*;
use crate::source::SourceError;
use std::time::Duration;
use tokio::time::sleep;

const QUIET: Duration = Duration::from_millis(400);

/// Every call the fake backend received, in order.
#[derive(Default)]
struct Calls(Mutex<Vec<FilterState>>);

impl Calls {
    fn genres(&self) -> Vec<String> {
        self.0
            .lock()
            .iter()
            .map(|p| p.genre().unwrap_or_default().to_string())
            .collect()
    }
}

fn genre(name: &str) -> FilterState {
    FilterState {
        genre: Some(name.to_string()),
        ..FilterState::default()
    }
}

/// Fake fetch echoing the genre back. `slow` takes a second, `fail` errors.
fn coordinator() -> (RequestCoordinator<String>, Arc<Calls>) {
    let calls = Arc::new(Calls::default());
    let recorded = Arc::clone(&calls);
    let coordinator = RequestCoordinator::new(QUIET, move |params: FilterState| {
        recorded.0.lock().push(params.clone());
        async move {
            let name = params.genre().unwrap_or_default().to_string();
            let latency = if name.starts_with("slow") {
                Duration::from_millis(1000)
            } else {
                Duration::from_millis(10)
            };
            sleep(latency).await;
            if name == "fail" {
                return Err(SourceError::transport("scatter/budget-revenue", "connection reset"));
            }
            Ok(name)
        }
    });
    coordinator.start();
    (coordinator, calls)
}

fn data(snapshot: &Snapshot<String>) -> Option<String> {
    snapshot.data.as_deref().cloned()
}

#[tokio::test(start_paused = true)]
async fn test_burst_issues_single_fetch_with_final_params() {
    let (coordinator, calls) = coordinator();

    assert!(coordinator.submit(genre("Drama")));
    sleep(Duration::from_millis(100)).await;
    assert!(coordinator.submit(genre("Comedy")));
    sleep(Duration::from_millis(1000)).await;

    assert_eq!(calls.genres(), vec!["Comedy"]);
    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.phase, Phase::Settled);
    assert_eq!(data(&snapshot).as_deref(), Some("Comedy"));
    assert_eq!(snapshot.params, Some(genre("Comedy")));
}

#[tokio::test(start_paused = true)]
async fn test_fetch_waits_for_quiet_period() {
    let (coordinator, calls) = coordinator();

    coordinator.submit(genre("Drama"));
    assert!(coordinator.snapshot().pending);
    sleep(Duration::from_millis(399)).await;
    assert!(calls.genres().is_empty());
    assert_eq!(coordinator.snapshot().phase, Phase::Idle);

    sleep(Duration::from_millis(2)).await;
    assert_eq!(calls.genres(), vec!["Drama"]);
    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.phase, Phase::Fetching);
    assert!(!snapshot.pending);
    assert_eq!(snapshot.issued, 1);
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_is_discarded() {
    let (coordinator, calls) = coordinator();

    coordinator.submit(genre("slow-western"));
    sleep(Duration::from_millis(450)).await;
    coordinator.submit(genre("Horror"));
    sleep(Duration::from_millis(450)).await;

    let snapshot = coordinator.snapshot();
    assert_eq!(data(&snapshot).as_deref(), Some("Horror"));
    assert_eq!(snapshot.applied, 2);

    // the slow first response arrives now and must not win
    sleep(Duration::from_millis(1000)).await;
    let snapshot = coordinator.snapshot();
    assert_eq!(calls.genres(), vec!["slow-western", "Horror"]);
    assert_eq!(data(&snapshot).as_deref(), Some("Horror"));
    assert_eq!(snapshot.phase, Phase::Settled);
    assert_eq!(snapshot.applied, 2);
}

#[tokio::test(start_paused = true)]
async fn test_error_keeps_previous_data() {
    let (coordinator, _calls) = coordinator();

    coordinator.submit(genre("Drama"));
    let snapshot = coordinator.settled().await;
    assert_eq!(data(&snapshot).as_deref(), Some("Drama"));

    coordinator.submit(genre("fail"));
    let snapshot = coordinator.settled().await;
    assert_eq!(snapshot.phase, Phase::Error);
    assert_eq!(
        snapshot.error.as_deref(),
        Some("Network error while fetching scatter/budget-revenue: connection reset")
    );
    assert_eq!(data(&snapshot).as_deref(), Some("Drama"));

    coordinator.submit(genre("Comedy"));
    let snapshot = coordinator.settled().await;
    assert_eq!(snapshot.error, None);
    assert_eq!(data(&snapshot).as_deref(), Some("Comedy"));
}

#[tokio::test(start_paused = true)]
async fn test_stop_suppresses_in_flight_response() {
    let (coordinator, calls) = coordinator();

    coordinator.submit(genre("slow-noir"));
    sleep(Duration::from_millis(450)).await;
    coordinator.stop();
    sleep(Duration::from_millis(2000)).await;

    let snapshot = coordinator.snapshot();
    assert_eq!(calls.genres(), vec!["slow-noir"]);
    assert_eq!(snapshot.phase, Phase::Idle);
    assert!(snapshot.data.is_none());
    assert!(!coordinator.submit(genre("Drama")));
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_armed_timer() {
    let (coordinator, calls) = coordinator();

    coordinator.submit(genre("Drama"));
    sleep(Duration::from_millis(100)).await;
    coordinator.stop();
    sleep(Duration::from_millis(1000)).await;
    assert!(calls.genres().is_empty());

    coordinator.start();
    assert!(coordinator.submit(genre("Drama")));
    sleep(Duration::from_millis(500)).await;
    assert_eq!(calls.genres(), vec!["Drama"]);
}

#[tokio::test(start_paused = true)]
async fn test_identical_params_are_not_refetched() {
    let (coordinator, calls) = coordinator();

    coordinator.submit(genre("Drama"));
    coordinator.settled().await;
    assert!(!coordinator.submit(genre("Drama")));

    assert!(coordinator.refresh());
    coordinator.settled().await;
    assert_eq!(calls.genres(), vec!["Drama", "Drama"]);
}

#[tokio::test(start_paused = true)]
async fn test_not_started_ignores_submissions() {
    let coordinator: RequestCoordinator<String> =
        RequestCoordinator::new(QUIET, |_params: FilterState| async { Ok(String::new()) });

    assert!(!coordinator.is_running());
    assert!(!coordinator.submit(FilterState::default()));
    assert!(!coordinator.refresh());
    assert_eq!(coordinator.settled().await.phase, Phase::Idle);
}
