use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use hrdesk_core::GeoCoordinate;

use super::*;

/// Scripted provider: each call pops the next step.
struct Scripted {
    permission: PermissionStatus,
    steps: Mutex<Vec<Step>>,
    calls: Arc<AtomicU32>,
}

#[derive(Clone)]
enum Step {
    After(Duration, Result<LocationSample, ProviderError>),
    Hang,
}

impl Scripted {
    fn new(permission: PermissionStatus, mut steps: Vec<Step>) -> (Self, Arc<AtomicU32>) {
        steps.reverse();
        let calls = Arc::new(AtomicU32::new(0));
        let provider = Self {
            permission,
            steps: Mutex::new(steps),
            calls: Arc::clone(&calls),
        };
        (provider, calls)
    }
}

impl LocationProvider for Scripted {
    async fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    async fn current_position(&self) -> Result<LocationSample, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop().unwrap_or(Step::Hang);
        match step {
            Step::After(delay, result) => {
                sleep(delay).await;
                result
            }
            Step::Hang => std::future::pending().await,
        }
    }
}

fn sample(lat: f64) -> LocationSample {
    LocationSample::new(GeoCoordinate::new(lat, 35.0).unwrap(), Some(8.0))
}

fn policy(max_retries: u32) -> ProbePolicy {
    ProbePolicy {
        max_retries,
        attempt_timeout: Duration::from_millis(5_000),
        retry_delay: Duration::from_millis(1_000),
    }
}

#[tokio::test(start_paused = true)]
async fn immediate_fix_uses_one_attempt() {
    let (provider, calls) = Scripted::new(
        PermissionStatus::Granted,
        vec![Step::After(Duration::from_millis(200), Ok(sample(31.0)))],
    );
    let probe = LocationProbe::new(provider, policy(5));

    let got = probe.acquire().await.unwrap();

    assert_eq!(got, sample(31.0));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn denied_permission_never_asks_for_a_fix() {
    let (provider, calls) = Scripted::new(PermissionStatus::Denied, vec![]);
    let probe = LocationProbe::new(provider, policy(5));

    assert_eq!(probe.acquire().await, Err(ProbeError::PermissionDenied));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn retries_stop_at_bound() {
    let (provider, calls) = Scripted::new(PermissionStatus::Granted, vec![]);
    let probe = LocationProbe::new(provider, policy(2));
    let started = Instant::now();

    let err = probe.acquire().await.unwrap_err();

    assert_eq!(err, ProbeError::Timeout { attempts: 3 });
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // Three 5 s timeouts and two 1 s delays between them.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(17_000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(18_000), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn zero_retries_means_single_attempt() {
    let (provider, calls) = Scripted::new(PermissionStatus::Granted, vec![]);
    let probe = LocationProbe::new(provider, policy(0));

    assert_eq!(
        probe.acquire().await,
        Err(ProbeError::Timeout { attempts: 1 })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn succeeds_after_timeouts() {
    let (provider, calls) = Scripted::new(
        PermissionStatus::Granted,
        vec![
            Step::Hang,
            Step::Hang,
            Step::After(Duration::from_millis(300), Ok(sample(32.0))),
        ],
    );
    let probe = LocationProbe::new(provider, policy(5));

    assert_eq!(probe.acquire().await, Ok(sample(32.0)));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn provider_error_is_terminal() {
    let (provider, calls) = Scripted::new(
        PermissionStatus::Granted,
        vec![Step::After(
            Duration::from_millis(10),
            Err(ProviderError::ServicesDisabled),
        )],
    );
    let probe = LocationProbe::new(provider, policy(5));

    assert_eq!(
        probe.acquire().await,
        Err(ProbeError::Unavailable(ProviderError::ServicesDisabled))
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn provider_reported_timeout_is_retried() {
    let (provider, calls) = Scripted::new(
        PermissionStatus::Granted,
        vec![
            Step::After(Duration::from_millis(10), Err(ProviderError::Timeout)),
            Step::After(Duration::from_millis(10), Ok(sample(30.5))),
        ],
    );
    let probe = LocationProbe::new(provider, policy(1));

    assert_eq!(probe.acquire().await, Ok(sample(30.5)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn fix_from_timed_out_attempt_is_never_used() {
    // Attempt 0 times out at 5 s, attempt 1 starts at 6 s. Attempt 0 would
    // have produced its fix at 6.2 s, inside attempt 1's window.
    let (provider, _calls) = Scripted::new(
        PermissionStatus::Granted,
        vec![
            Step::After(Duration::from_millis(6_200), Ok(sample(10.0))),
            Step::After(Duration::from_millis(1_000), Ok(sample(20.0))),
        ],
    );
    let probe = LocationProbe::new(provider, policy(3));

    assert_eq!(probe.acquire().await, Ok(sample(20.0)));
}

#[test]
fn policy_defaults_match_documented_values() {
    let p = ProbePolicy::default();
    assert_eq!(p.max_retries, 5);
    assert_eq!(p.attempt_timeout, Duration::from_secs(5));
    assert_eq!(p.retry_delay, Duration::from_secs(1));
}

/// Hangs forever and counts how many of its futures have been dropped.
struct Hanging {
    dropped: Arc<AtomicU32>,
}

struct CountOnDrop(Arc<AtomicU32>);

impl Drop for CountOnDrop {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl LocationProvider for Hanging {
    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn current_position(&self) -> Result<LocationSample, ProviderError> {
        let _guard = CountOnDrop(Arc::clone(&self.dropped));
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn timed_out_attempts_are_aborted() {
    let dropped = Arc::new(AtomicU32::new(0));
    let probe = LocationProbe::new(
        Hanging {
            dropped: Arc::clone(&dropped),
        },
        policy(2),
    );

    assert_eq!(probe.acquire().await, Err(ProbeError::Timeout { attempts: 3 }));

    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(dropped.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn pending_attempt_is_aborted_when_acquire_is_dropped() {
    let dropped = Arc::new(AtomicU32::new(0));
    let probe = LocationProbe::new(
        Hanging {
            dropped: Arc::clone(&dropped),
        },
        policy(5),
    );

    let abandoned = tokio::time::timeout(Duration::from_millis(1_000), probe.acquire()).await;
    assert!(abandoned.is_err());

    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(dropped.load(Ordering::SeqCst), 1);
}

#[test]
fn config_sets_only_the_retry_count() {
    let config = AppConfig {
        server_url: "https://hr.example.com/svc".into(),
        env: hrdesk_core::Environment::Test,
        log_level: "info".into(),
        app_version: "1.0.0".into(),
        http_timeout_secs: 20,
        location_max_retries: 2,
        session_path: std::path::PathBuf::from("session.json"),
        offices_path: None,
    };

    let p = ProbePolicy::from(&config);

    assert_eq!(p.max_retries, 2);
    assert_eq!(p.attempt_timeout, Duration::from_millis(DEFAULT_ATTEMPT_TIMEOUT_MS));
    assert_eq!(p.retry_delay, Duration::from_millis(DEFAULT_RETRY_DELAY_MS));
}
