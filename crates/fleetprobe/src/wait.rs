//! Wait policy and polling.
//!
//! Every suspension point in the interaction primitives goes through a
//! [`Waiter`] built from one injectable [`WaitPolicy`]: element lookups,
//! read-after-settle display reads, network responses. There are no per-call
//! timeout constants anywhere else in the crate.

use crate::result::{FleetError, FleetResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Default settle window for popups and optional controls (300ms)
pub const DEFAULT_SETTLE_MS: u64 = 300;

// =============================================================================
// WAIT POLICY
// =============================================================================

/// Timeout and polling policy shared by every primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitPolicy {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
    /// Settle window in milliseconds: pause after opening popups, and how long
    /// to look for controls that may legitimately be absent
    pub settle_ms: u64,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }
}

impl WaitPolicy {
    /// Create a new policy with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Short timeouts and no settle pause, for mock-driven tests
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            timeout_ms: 200,
            poll_interval_ms: 5,
            settle_ms: 0,
        }
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set settle window in milliseconds
    #[must_use]
    pub const fn with_settle(mut self, settle_ms: u64) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Get settle window as Duration
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Check the policy is usable
    pub fn validate(&self) -> FleetResult<()> {
        if self.timeout_ms == 0 {
            return Err(FleetError::config("wait.timeout_ms must be greater than 0"));
        }
        if self.poll_interval_ms == 0 || self.poll_interval_ms > self.timeout_ms {
            return Err(FleetError::config(format!(
                "wait.poll_interval_ms must be in 1..={}",
                self.timeout_ms
            )));
        }
        Ok(())
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Polls asynchronous probes under a [`WaitPolicy`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Waiter {
    policy: WaitPolicy,
}

impl Waiter {
    /// Create a waiter for the given policy
    #[must_use]
    pub const fn new(policy: WaitPolicy) -> Self {
        Self { policy }
    }

    /// The policy in use
    #[must_use]
    pub const fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    /// Poll `probe` until it yields a value or the timeout elapses.
    ///
    /// The probe runs at least once. Probe errors abort the wait immediately.
    pub async fn until<T, F, Fut>(&self, waited_for: &str, probe: F) -> FleetResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FleetResult<Option<T>>>,
    {
        self.poll(self.policy.timeout(), probe)
            .await?
            .ok_or_else(|| FleetError::Timeout {
                waited_for: waited_for.to_string(),
                ms: self.policy.timeout_ms,
            })
    }

    /// Poll `probe` for at most `window`; `Ok(None)` when nothing showed up.
    pub async fn within<T, F, Fut>(&self, window: Duration, probe: F) -> FleetResult<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FleetResult<Option<T>>>,
    {
        self.poll(window, probe).await
    }

    /// Read until two consecutive reads agree (read-after-settle).
    ///
    /// The timeout is checked only after each re-read, so a value that never
    /// settles costs at least one poll interval beyond the first read.
    pub async fn stable<T, F, Fut>(&self, waited_for: &str, mut read: F) -> FleetResult<T>
    where
        T: PartialEq,
        F: FnMut() -> Fut,
        Fut: Future<Output = FleetResult<T>>,
    {
        let start = Instant::now();
        let mut previous = read().await?;
        loop {
            tokio::time::sleep(self.policy.poll_interval()).await;
            let current = read().await?;
            if current == previous {
                return Ok(current);
            }
            if start.elapsed() >= self.policy.timeout() {
                return Err(FleetError::Timeout {
                    waited_for: format!("{waited_for} to settle"),
                    ms: self.policy.timeout_ms,
                });
            }
            previous = current;
        }
    }

    /// Pause for the settle window (no-op when it is zero)
    pub async fn settle(&self) {
        if self.policy.settle_ms > 0 {
            tokio::time::sleep(self.policy.settle()).await;
        }
    }

    async fn poll<T, F, Fut>(&self, window: Duration, mut probe: F) -> FleetResult<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FleetResult<Option<T>>>,
    {
        let start = Instant::now();
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            if let Some(value) = probe().await? {
                tracing::trace!(attempts, elapsed_ms = start.elapsed().as_millis() as u64, "wait satisfied");
                return Ok(Some(value));
            }
            if start.elapsed() >= window {
                tracing::trace!(attempts, "wait window elapsed");
                return Ok(None);
            }
            tokio::time::sleep(self.policy.poll_interval()).await;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    mod wait_policy_tests {
        use super::*;

        #[test]
        fn test_wait_policy_default() {
            let policy = WaitPolicy::default();
            assert_eq!(policy.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(policy.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
            assert_eq!(policy.settle_ms, DEFAULT_SETTLE_MS);
        }

        #[test]
        fn test_wait_policy_chained() {
            let policy = WaitPolicy::new()
                .with_timeout(2_000)
                .with_poll_interval(20)
                .with_settle(0);
            assert_eq!(policy.timeout(), Duration::from_millis(2_000));
            assert_eq!(policy.poll_interval(), Duration::from_millis(20));
            assert_eq!(policy.settle(), Duration::ZERO);
        }

        #[test]
        fn test_wait_policy_validate() {
            assert!(WaitPolicy::default().validate().is_ok());
            assert!(WaitPolicy::fast().validate().is_ok());
            assert!(WaitPolicy::new().with_timeout(0).validate().is_err());
            assert!(WaitPolicy::new()
                .with_timeout(100)
                .with_poll_interval(500)
                .validate()
                .is_err());
        }

        #[test]
        fn test_wait_policy_deserialize_partial() {
            let policy: WaitPolicy = serde_yaml_ng::from_str("timeout_ms: 1500").unwrap();
            assert_eq!(policy.timeout_ms, 1500);
            assert_eq!(policy.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }
    }

    mod waiter_tests {
        use super::*;

        #[tokio::test]
        async fn test_until_immediate_success() {
            let waiter = Waiter::new(WaitPolicy::fast());
            let value = waiter
                .until("answer", || async { Ok(Some(42)) })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }

        #[tokio::test]
        async fn test_until_becomes_ready() {
            let waiter = Waiter::new(WaitPolicy::fast());
            let calls = AtomicU32::new(0);
            let calls_ref = &calls;
            let value = waiter
                .until("third poll", move || async move {
                    let n = calls_ref.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok((n >= 3).then_some(n))
                })
                .await
                .unwrap();
            assert_eq!(value, 3);
        }

        #[tokio::test]
        async fn test_until_timeout() {
            let waiter = Waiter::new(WaitPolicy::fast().with_timeout(20));
            let err = waiter
                .until::<(), _, _>("never", || async { Ok(None) })
                .await
                .unwrap_err();
            match err {
                FleetError::Timeout { waited_for, ms } => {
                    assert_eq!(waited_for, "never");
                    assert_eq!(ms, 20);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[tokio::test]
        async fn test_until_propagates_probe_error() {
            let waiter = Waiter::new(WaitPolicy::fast());
            let err = waiter
                .until::<(), _, _>("broken", || async { Err(FleetError::driver("gone")) })
                .await
                .unwrap_err();
            assert!(matches!(err, FleetError::Driver { .. }));
        }

        #[tokio::test]
        async fn test_within_returns_none() {
            let waiter = Waiter::new(WaitPolicy::fast());
            let found = waiter
                .within::<u8, _, _>(Duration::from_millis(10), || async { Ok(None) })
                .await
                .unwrap();
            assert!(found.is_none());
        }

        #[tokio::test]
        async fn test_stable_waits_for_repeat() {
            let waiter = Waiter::new(WaitPolicy::fast());
            let calls = AtomicU32::new(0);
            let calls_ref = &calls;
            // Reads 1, 2, 3, 3
            let value = waiter
                .stable("counter", move || async move {
                    let n = calls_ref.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok(n.min(3))
                })
                .await
                .unwrap();
            assert_eq!(value, 3);
            assert_eq!(calls.load(Ordering::SeqCst), 4);
        }

        #[tokio::test]
        async fn test_stable_times_out_on_flicker() {
            let waiter = Waiter::new(WaitPolicy::fast().with_timeout(20));
            let calls = AtomicU32::new(0);
            let calls_ref = &calls;
            let err = waiter
                .stable("flicker", move || async move {
                    Ok(calls_ref.fetch_add(1, Ordering::SeqCst))
                })
                .await
                .unwrap_err();
            assert!(err.is_timeout());
        }
    }
}
