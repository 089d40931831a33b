//! Fixed-window rate limiter keyed by client identity.
//!
//! Each key gets a window that starts with its first request and lasts
//! `window`. Up to `limit` requests are admitted per window; the counter
//! resets when a request arrives after the window has elapsed. Bursts of up
//! to `2 * limit` across a window boundary are accepted.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

/// Per-key window state.
#[derive(Debug)]
struct RateWindow {
    /// When the current window started.
    started_at: Instant,
    /// Requests admitted in the current window.
    count: u32,
}

/// Outcome of [`RateLimiter::check`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RateDecision {
    /// Request admitted; `remaining` more fit in the current window.
    Allowed { remaining: u32 },
    /// Request rejected; retry after this many whole seconds (at least 1).
    Limited { retry_after_secs: u64 },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Thread-safe fixed-window limiter.
///
/// Windows are created on demand and never swept; memory grows with the
/// number of distinct keys seen.
pub struct RateLimiter {
    windows: Mutex<HashMap<String, RateWindow>>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    /// Create a limiter admitting `limit` requests per `window` per key.
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            limit,
            window,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Lock the windows mutex, recovering from poison if necessary.
    fn lock_windows(&self) -> MutexGuard<'_, HashMap<String, RateWindow>> {
        self.windows.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter windows mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Count a request for `key` and decide whether to admit it.
    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut windows = self.lock_windows();

        let window = match windows.get_mut(key) {
            Some(window) if now.saturating_duration_since(window.started_at) < self.window => {
                window
            }
            _ => {
                windows.insert(
                    key.to_string(),
                    RateWindow {
                        started_at: now,
                        count: 1,
                    },
                );
                return RateDecision::Allowed {
                    remaining: self.limit.saturating_sub(1),
                };
            }
        };

        if window.count >= self.limit {
            let elapsed = now.saturating_duration_since(window.started_at);
            let remaining_ms = self.window.saturating_sub(elapsed).as_millis() as u64;
            let retry_after_secs = remaining_ms.div_ceil(1000).max(1);
            debug!(
                "Rate limiter: rejected '{}', retry after {}s",
                key, retry_after_secs
            );
            return RateDecision::Limited { retry_after_secs };
        }

        window.count += 1;
        RateDecision::Allowed {
            remaining: self.limit - window.count,
        }
    }

    /// Forget the window for `key`.
    pub fn reset(&self, key: &str) {
        self.lock_windows().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_admits_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new(2, MINUTE);

        assert_eq!(limiter.check("ip"), RateDecision::Allowed { remaining: 1 });
        assert_eq!(limiter.check("ip"), RateDecision::Allowed { remaining: 0 });

        match limiter.check("ip") {
            RateDecision::Limited { retry_after_secs } => {
                assert!(retry_after_secs > 0);
                assert!(retry_after_secs <= 60);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_window_reset_after_elapsed() {
        let limiter = RateLimiter::new(2, MINUTE);
        let start = Instant::now();

        assert!(limiter.check_at("ip", start).is_allowed());
        assert!(limiter.check_at("ip", start + Duration::from_secs(1)).is_allowed());
        assert!(!limiter.check_at("ip", start + Duration::from_secs(2)).is_allowed());

        assert_eq!(
            limiter.check_at("ip", start + MINUTE),
            RateDecision::Allowed { remaining: 1 }
        );
    }

    #[test]
    fn test_retry_after_rounds_up_remaining_window() {
        let limiter = RateLimiter::new(1, MINUTE);
        let start = Instant::now();

        assert!(limiter.check_at("ip", start).is_allowed());
        assert_eq!(
            limiter.check_at("ip", start + Duration::from_secs(30)),
            RateDecision::Limited { retry_after_secs: 30 }
        );
        assert_eq!(
            limiter.check_at("ip", start + Duration::from_millis(30_001)),
            RateDecision::Limited { retry_after_secs: 30 }
        );
        assert_eq!(
            limiter.check_at("ip", start + Duration::from_millis(59_999)),
            RateDecision::Limited { retry_after_secs: 1 }
        );
    }

    #[test]
    fn test_rejections_do_not_extend_window() {
        let limiter = RateLimiter::new(1, MINUTE);
        let start = Instant::now();

        assert!(limiter.check_at("ip", start).is_allowed());
        for secs in [10, 20, 50] {
            assert!(!limiter.check_at("ip", start + Duration::from_secs(secs)).is_allowed());
        }
        assert!(limiter.check_at("ip", start + MINUTE).is_allowed());
    }

    #[test]
    fn test_keys_are_isolated() {
        let limiter = RateLimiter::new(1, MINUTE);

        assert!(limiter.check("10.0.0.1").is_allowed());
        assert!(!limiter.check("10.0.0.1").is_allowed());
        assert!(limiter.check("10.0.0.2").is_allowed());
    }

    #[test]
    fn test_reset() {
        let limiter = RateLimiter::new(1, MINUTE);

        assert!(limiter.check("ip").is_allowed());
        assert!(!limiter.check("ip").is_allowed());

        limiter.reset("ip");
        assert!(limiter.check("ip").is_allowed());
    }

    #[test]
    fn test_boundary_burst_is_permitted() {
        let limiter = RateLimiter::new(3, MINUTE);
        let start = Instant::now();
        let end_of_window = start + MINUTE - Duration::from_millis(1);

        assert!(limiter.check_at("ip", start).is_allowed());
        assert!(limiter.check_at("ip", end_of_window).is_allowed());
        assert!(limiter.check_at("ip", end_of_window).is_allowed());
        for _ in 0..3 {
            assert!(limiter.check_at("ip", start + MINUTE).is_allowed());
        }
        assert!(!limiter.check_at("ip", start + MINUTE).is_allowed());
    }

    #[test]
    fn test_concurrent_checks_admit_exactly_limit() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let limiter = RateLimiter::new(30, MINUTE);
        let admitted = AtomicU32::new(0);
        let start = Instant::now();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        if limiter.check_at("203.0.113.7", start).is_allowed() {
                            admitted.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                });
            }
        });

        assert_eq!(admitted.load(Ordering::SeqCst), 30);
        assert!(!limiter.check_at("203.0.113.7", start).is_allowed());
    }
}
