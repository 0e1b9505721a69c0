//! Sliding-window rate limiting keyed by action and subject.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::{duration_ms, Millis, SharedClock};
use crate::error::{CoreError, CoreResult};

/// A window length and the number of attempts allowed inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    pub window_ms: u64,
    pub max_requests: u32,
}

impl RateLimitPolicy {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window_ms: duration_ms(window),
            max_requests,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Which attempts consume the window budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountingPolicy {
    /// Only allowed attempts are recorded; hammering a closed window
    /// does not push the reset time back.
    #[default]
    AllowedOnly,
    /// Denied attempts are recorded too, so a client retrying in a loop
    /// stays throttled until it backs off for a full window.
    AllAttempts,
}

/// Outcome of [`RateLimitGuard::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    /// The window is full. `reset_at` is when the oldest counted attempt
    /// leaves the window.
    Denied { reset_at: Millis },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Time left until the window reopens, measured from `now`.
    ///
    /// `None` when the attempt was allowed.
    pub fn retry_after(&self, now: Millis) -> Option<Duration> {
        match self {
            Self::Allowed => None,
            Self::Denied { reset_at } => {
                Some(Duration::from_millis(reset_at.saturating_sub(now)))
            }
        }
    }
}

/// Per-key sliding-window throttle.
///
/// Each key keeps the instants of its counted attempts in insertion order.
/// Stale instants are purged lazily on [`check`](Self::check); keys that
/// go quiet are dropped by [`cleanup`](Self::cleanup).
pub struct RateLimitGuard {
    clock: SharedClock,
    counting: CountingPolicy,
    attempts: HashMap<String, Vec<Millis>>,
}

impl RateLimitGuard {
    pub fn new(clock: SharedClock) -> Self {
        Self::with_counting(clock, CountingPolicy::default())
    }

    pub fn with_counting(clock: SharedClock, counting: CountingPolicy) -> Self {
        Self {
            clock,
            counting,
            attempts: HashMap::new(),
        }
    }

    /// Records an attempt for `key` if fewer than `max_requests` attempts
    /// fall inside the trailing `window`.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidLimit`] if `window` rounds to zero milliseconds
    /// or `max_requests` is zero.
    pub fn check(&mut self, key: &str, window: Duration, max_requests: u32) -> CoreResult<RateDecision> {
        let window_ms = validate_window(window)?;
        if max_requests == 0 {
            return Err(CoreError::InvalidLimit(
                "max_requests must be positive".to_string(),
            ));
        }

        let now = self.clock.now_ms();
        let counting = self.counting;
        let attempts = self.attempts.entry(key.to_string()).or_default();
        attempts.retain(|t| now.saturating_sub(*t) < window_ms);

        // `max_requests` fits in usize on every supported target.
        if attempts.len() < max_requests as usize {
            attempts.push(now);
            return Ok(RateDecision::Allowed);
        }

        if counting == CountingPolicy::AllAttempts {
            // Only the newest `max_requests` instants can decide a later check.
            attempts.push(now);
            let excess = attempts.len() - max_requests as usize;
            attempts.drain(..excess);
        }
        let oldest = attempts.first().copied().unwrap_or(now);
        let reset_at = oldest.saturating_add(window_ms);
        tracing::warn!(key, reset_at, "rate limit exceeded");
        Ok(RateDecision::Denied { reset_at })
    }

    /// [`check`](Self::check) with the window and budget taken from `policy`.
    pub fn check_policy(&mut self, key: &str, policy: &RateLimitPolicy) -> CoreResult<RateDecision> {
        self.check(key, policy.window(), policy.max_requests)
    }

    /// Purges every key's attempts older than `window` and drops keys left
    /// empty. Returns the number of keys dropped.
    ///
    /// Pass the widest window any caller checks with; a narrower one would
    /// forget attempts a wider policy still counts.
    pub fn cleanup(&mut self, window: Duration) -> CoreResult<usize> {
        let window_ms = validate_window(window)?;
        let now = self.clock.now_ms();
        let before = self.attempts.len();

        self.attempts.retain(|_, attempts| {
            attempts.retain(|t| now.saturating_sub(*t) < window_ms);
            !attempts.is_empty()
        });

        let dropped = before - self.attempts.len();
        tracing::debug!(dropped, remaining = self.attempts.len(), "rate limit cleanup");
        Ok(dropped)
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.attempts.len()
    }

    /// Recorded attempt instants for `key`, oldest first.
    ///
    /// May include instants a later `check` would purge.
    pub fn attempts(&self, key: &str) -> &[Millis] {
        self.attempts.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn counting(&self) -> CountingPolicy {
        self.counting
    }
}

fn validate_window(window: Duration) -> CoreResult<u64> {
    match duration_ms(window) {
        0 => Err(CoreError::InvalidLimit(
            "window must be at least one millisecond".to_string(),
        )),
        ms => Ok(ms),
    }
}
