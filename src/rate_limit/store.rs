//! Bounded, time-windowed admission store.
//!
//! Maps client identities to request counters. Both capacity-bounded (LRU-ish
//! eviction beyond a fixed entry count) and lifetime-bounded (entries whose
//! window has elapsed are dropped), so it cannot grow without bound under
//! load or IP churn.

use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;

/// One identity's counter within the current window.
#[derive(Debug, Clone, Copy)]
pub(super) struct WindowEntry {
    /// Requests seen in the current window.
    pub count: u32,
    /// Epoch milliseconds at which the window resets.
    pub reset_at_ms: i64,
}

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy)]
pub struct Admission {
    /// Whether the request is allowed.
    pub success: bool,
    /// The configured ceiling for this endpoint.
    pub limit: u32,
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// Epoch milliseconds at which the window resets.
    pub reset: i64,
}

/// Concurrent admission store backed by `DashMap`.
///
/// The per-key entry lock makes each increment-and-compare atomic: two
/// concurrent requests from the same identity can never observe the same
/// count.
pub(super) struct AdmissionStore {
    entries: DashMap<String, WindowEntry>,
    max_entries: usize,
}

impl AdmissionStore {
    pub(super) fn new(max_entries: usize) -> Self {
        AdmissionStore {
            entries: DashMap::new(),
            max_entries,
        }
    }

    /// Records one request for `identity` and decides whether to admit it.
    ///
    /// A missing or elapsed window starts fresh at count 1 and is always
    /// admitted; otherwise the counter increments and the request is admitted
    /// iff it stays within `max_requests`.
    pub(super) fn hit(&self, identity: &str, max_requests: u32, interval: Duration) -> Admission {
        let now_ms = Utc::now().timestamp_millis();
        self.evict_if_full(now_ms);

        let interval_ms = interval.as_millis() as i64;
        let mut entry = self
            .entries
            .entry(identity.to_string())
            .or_insert(WindowEntry {
                count: 0,
                reset_at_ms: now_ms + interval_ms,
            });

        if entry.count == 0 || now_ms > entry.reset_at_ms {
            entry.count = 1;
            entry.reset_at_ms = now_ms + interval_ms;
        } else {
            entry.count += 1;
        }

        let count = entry.count;
        let reset = entry.reset_at_ms;
        drop(entry);

        if count > max_requests {
            Admission {
                success: false,
                limit: max_requests,
                remaining: 0,
                reset,
            }
        } else {
            Admission {
                success: true,
                limit: max_requests,
                remaining: max_requests - count,
                reset,
            }
        }
    }

    /// Number of identities currently tracked.
    #[allow(dead_code)] // exercised by tests, useful for diagnostics
    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Keeps the store within its capacity bound: expired windows go first,
    /// and if that is not enough the oldest window is evicted.
    fn evict_if_full(&self, now_ms: i64) {
        if self.entries.len() < self.max_entries {
            return;
        }

        self.entries.retain(|_, entry| entry.reset_at_ms > now_ms);

        while self.entries.len() >= self.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().reset_at_ms)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_hit_is_admitted_with_full_window() {
        let store = AdmissionStore::new(10);
        let admission = store.hit("1.2.3.4", 5, Duration::from_secs(60));
        assert!(admission.success);
        assert_eq!(admission.limit, 5);
        assert_eq!(admission.remaining, 4);
    }

    #[test]
    fn test_hits_beyond_limit_are_denied_with_zero_remaining() {
        let store = AdmissionStore::new(10);
        for _ in 0..5 {
            let admission = store.hit("1.2.3.4", 5, Duration::from_secs(60));
            assert!(admission.success);
        }
        let denied = store.hit("1.2.3.4", 5, Duration::from_secs(60));
        assert!(!denied.success);
        assert_eq!(denied.remaining, 0);
    }

    #[test]
    fn test_identities_are_isolated() {
        let store = AdmissionStore::new(10);
        for _ in 0..5 {
            store.hit("1.2.3.4", 5, Duration::from_secs(60));
        }
        let other = store.hit("5.6.7.8", 5, Duration::from_secs(60));
        assert!(other.success);
        assert_eq!(other.remaining, 4);
    }

    #[test]
    fn test_elapsed_window_resets_counter() {
        let store = AdmissionStore::new(10);
        let interval = Duration::from_millis(10);

        store.hit("1.2.3.4", 2, interval);
        store.hit("1.2.3.4", 2, interval);
        let denied = store.hit("1.2.3.4", 2, interval);
        assert!(!denied.success);

        std::thread::sleep(Duration::from_millis(25));

        let fresh = store.hit("1.2.3.4", 2, interval);
        assert!(fresh.success, "elapsed window should admit again");
        assert_eq!(fresh.remaining, 1);
    }

    #[test]
    fn test_capacity_bound_evicts_rather_than_grows() {
        let store = AdmissionStore::new(5);
        for i in 0..50 {
            store.hit(&format!("10.0.0.{i}"), 5, Duration::from_secs(60));
        }
        assert!(store.len() <= 5);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        use std::sync::Arc;

        let store = Arc::new(AdmissionStore::new(10));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    store.hit("1.2.3.4", 10_000, Duration::from_secs(60));
                }
            }));
        }
        for handle in handles {
            handle.join().expect("thread should not panic");
        }

        // 800 increments happened; the next hit must observe all of them.
        let admission = store.hit("1.2.3.4", 10_000, Duration::from_secs(60));
        assert_eq!(admission.remaining, 10_000 - 801);
    }
}
