//! Bounded, retrying acquisition of a single location fix.
//!
//! Each attempt runs on its own task so a slow provider cannot stall the
//! probe. A timed-out attempt's task is aborted, and every attempt task still
//! running is aborted when `acquire` returns or is dropped. Results travel
//! back tagged with the attempt number; anything tagged with an earlier
//! attempt slipped in before its abort landed and is dropped.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hrdesk_core::{AppConfig, LocationSample};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{sleep, timeout_at, Instant};

use crate::error::{ProbeError, ProviderError};

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Source of device location fixes.
pub trait LocationProvider: Send + Sync + 'static {
    /// Asks for (or reports) foreground location permission.
    fn request_permission(&self) -> impl Future<Output = PermissionStatus> + Send;

    /// One high-accuracy fix. May take arbitrarily long.
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<LocationSample, ProviderError>> + Send;
}

/// Retry bounds for [`LocationProbe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    /// Retries after the first attempt; total attempts are `max_retries + 1`.
    pub max_retries: u32,
    pub attempt_timeout: Duration,
    pub retry_delay: Duration,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            attempt_timeout: Duration::from_millis(DEFAULT_ATTEMPT_TIMEOUT_MS),
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

/// Only the retry count is configurable; the per-attempt timeout and the
/// delay stay fixed so the worst-case wait is `max_retries` bounded.
impl From<&AppConfig> for ProbePolicy {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_retries: config.location_max_retries,
            ..Self::default()
        }
    }
}

/// A provider result tagged with the attempt that produced it.
type Tagged = (u32, Result<LocationSample, ProviderError>);

enum Attempt {
    Fix(LocationSample),
    TimedOut,
    Failed(ProviderError),
}

pub struct LocationProbe<P> {
    provider: Arc<P>,
    policy: ProbePolicy,
}

impl<P: LocationProvider> LocationProbe<P> {
    pub fn new(provider: P, policy: ProbePolicy) -> Self {
        Self {
            provider: Arc::new(provider),
            policy,
        }
    }

    #[must_use]
    pub fn policy(&self) -> ProbePolicy {
        self.policy
    }

    /// Acquires one fix, retrying timeouts up to the policy bound.
    ///
    /// Permission is checked once up front and never retried. Provider errors
    /// other than a timeout end the probe immediately.
    ///
    /// # Errors
    ///
    /// - [`ProbeError::PermissionDenied`] if permission is refused (no fix is
    ///   attempted).
    /// - [`ProbeError::Unavailable`] on a non-timeout provider error.
    /// - [`ProbeError::Timeout`] once every attempt has timed out.
    pub async fn acquire(&self) -> Result<LocationSample, ProbeError> {
        if self.provider.request_permission().await != PermissionStatus::Granted {
            tracing::info!("location permission denied");
            return Err(ProbeError::PermissionDenied);
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<Tagged>();
        let attempts = self.policy.max_retries.saturating_add(1);
        // Dropping the set aborts whatever is still running.
        let mut tasks = JoinSet::new();

        for attempt in 0..attempts {
            let provider = Arc::clone(&self.provider);
            let tx = tx.clone();
            let handle = tasks.spawn(async move {
                let result = provider.current_position().await;
                // Receiver gone means the probe already finished.
                let _ = tx.send((attempt, result));
            });

            match self.await_attempt(&mut rx, attempt).await {
                Attempt::Fix(sample) => {
                    tracing::debug!(attempt, "location fix acquired");
                    return Ok(sample);
                }
                Attempt::Failed(err) => {
                    tracing::warn!(attempt, error = %err, "location provider failed");
                    return Err(ProbeError::Unavailable(err));
                }
                Attempt::TimedOut => {
                    handle.abort();
                    let remaining = attempts - attempt - 1;
                    tracing::warn!(attempt, remaining, "location attempt timed out");
                    if remaining > 0 {
                        sleep(self.policy.retry_delay).await;
                    }
                }
            }
        }

        Err(ProbeError::Timeout { attempts })
    }

    async fn await_attempt(
        &self,
        rx: &mut mpsc::UnboundedReceiver<Tagged>,
        attempt: u32,
    ) -> Attempt {
        let deadline = Instant::now() + self.policy.attempt_timeout;
        loop {
            match timeout_at(deadline, rx.recv()).await {
                Err(_) => return Attempt::TimedOut,
                Ok(None) => {
                    return Attempt::Failed(ProviderError::Other("provider task vanished".into()))
                }
                Ok(Some((tag, _))) if tag != attempt => {
                    tracing::debug!(stale = tag, attempt, "discarding late location result");
                }
                Ok(Some((_, Ok(sample)))) => return Attempt::Fix(sample),
                Ok(Some((_, Err(ProviderError::Timeout)))) => return Attempt::TimedOut,
                Ok(Some((_, Err(err)))) => return Attempt::Failed(err),
            }
        }
    }
}

#[cfg(test)]
#[path = "probe_test.rs"]
mod tests;
