use dashmap::DashMap;
use std::time::{Duration, Instant};

struct FailureState {
    count: u32,
    window_start: Instant,
    locked_until: Option<Instant>,
}

/// Per-IP authentication failure tracker with automatic lockout.
///
/// After `max_failures` failed attempts within `window`, the IP is locked
/// out for `lockout`. A successful authentication clears the record.
pub struct BruteForceGuard {
    failures: DashMap<String, FailureState>,
    max_failures: u32,
    window: Duration,
    lockout: Duration,
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl BruteForceGuard {
    pub fn new() -> Self {
        let max_failures = env_u64("AUTH_MAX_FAILURES", 5) as u32;
        let window = Duration::from_secs(env_u64("AUTH_FAILURE_WINDOW_SECS", 300));
        let lockout = Duration::from_secs(env_u64("AUTH_LOCKOUT_SECS", 900));

        tracing::info!(
            "Brute-force guard: max {} failures in {:?} window, {:?} lockout",
            max_failures,
            window,
            lockout
        );

        Self {
            failures: DashMap::new(),
            max_failures,
            window,
            lockout,
        }
    }

    /// Record an authentication failure for the given IP.
    pub fn record_failure(&self, ip: &str) {
        let now = Instant::now();
        let mut entry = self.failures.entry(ip.to_string()).or_insert(FailureState {
            count: 0,
            window_start: now,
            locked_until: None,
        });
        let state = entry.value_mut();

        // Stale window, start over
        if now.duration_since(state.window_start) > self.window {
            state.count = 0;
            state.window_start = now;
            state.locked_until = None;
        }

        state.count += 1;
        if state.count >= self.max_failures {
            state.locked_until = Some(now + self.lockout);
            tracing::warn!(
                "Brute-force lockout for IP {} ({} failures in window)",
                ip,
                state.count
            );
        }
    }

    /// Check if an IP is currently locked out.
    pub fn is_locked(&self, ip: &str) -> bool {
        self.failures
            .get(ip)
            .and_then(|entry| entry.locked_until)
            .is_some_and(|until| Instant::now() < until)
    }

    /// Clear failure tracking for an IP after successful authentication.
    pub fn record_success(&self, ip: &str) {
        self.failures.remove(ip);
    }

    /// Drop records older than window + lockout. Called periodically.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let max_age = self.window + self.lockout;
        self.failures
            .retain(|_, state| now.duration_since(state.window_start) < max_age);
    }
}

impl Default for BruteForceGuard {
    fn default() -> Self {
        Self::new()
    }
}
