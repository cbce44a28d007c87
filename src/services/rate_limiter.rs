use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::config::RateLimitConfig;

/// Outcome of a single admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Admitted { remaining: u32 },
    Rejected { retry_after_secs: u64 },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started_at: DateTime<Utc>,
}

/// Fixed-window request counter keyed by client identifier.
///
/// A client's window opens on its first request and admits `max_requests`
/// requests until `window` has elapsed, after which the next request opens a
/// fresh window. Entries are never evicted.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.max_requests,
            Duration::seconds(config.window_seconds as i64),
        )
    }

    pub fn check(&self, client: &str) -> RateLimitDecision {
        self.check_at(client, Utc::now())
    }

    /// Admission check against an explicit clock reading.
    pub fn check_at(&self, client: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let mut clients = self.clients.lock();

        let window = clients.entry(client.to_string()).or_insert(Window {
            count: 0,
            started_at: now,
        });
        if now - window.started_at >= self.window {
            *window = Window {
                count: 0,
                started_at: now,
            };
        }

        if window.count >= self.max_requests {
            let reset_in = window.started_at + self.window - now;
            // Round up so clients never retry before the window closes
            let millis = reset_in.num_milliseconds().max(0) as u64;
            return RateLimitDecision::Rejected {
                retry_after_secs: millis.div_ceil(1000),
            };
        }

        window.count += 1;
        RateLimitDecision::Admitted {
            remaining: self.max_requests - window.count,
        }
    }

    /// Number of distinct clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().len()
    }
}
