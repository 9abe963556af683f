//! Fixed-window request limiter keyed by client IP

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

pub const DEFAULT_LIMIT_PER_HOUR: u32 = 30;

#[derive(Clone, Copy, Debug)]
struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

#[derive(Default)]
struct Windows {
    by_key: HashMap<String, Window>,
    /// Expired windows are dropped once this passes
    next_sweep: Option<DateTime<Utc>>,
}

impl Windows {
    fn sweep(&mut self, now: DateTime<Utc>, period: Duration) {
        match self.next_sweep {
            Some(at) if now < at => {}
            _ => {
                let before = self.by_key.len();
                self.by_key.retain(|_, w| now < w.reset_at);
                let dropped = before - self.by_key.len();
                if dropped > 0 {
                    tracing::debug!(dropped, "Expired rate-limit windows dropped");
                }
                self.next_sweep = Some(now + period);
            }
        }
    }
}

pub struct RateLimiter {
    limit: u32,
    period: Duration,
    windows: Mutex<Windows>,
}

impl RateLimiter {
    pub fn per_hour(limit: u32) -> Self {
        Self {
            limit,
            period: Duration::hours(1),
            windows: Mutex::new(Windows::default()),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Count one request for `key`; false once the window's budget is spent.
    pub async fn check(&self, key: &str) -> bool {
        self.check_at(key, Utc::now()).await
    }

    pub async fn check_at(&self, key: &str, now: DateTime<Utc>) -> bool {
        let mut windows = self.windows.lock().await;
        windows.sweep(now, self.period);

        let mut window = windows.by_key.get(key).copied().unwrap_or(Window {
            count: 0,
            reset_at: now + self.period,
        });

        if now >= window.reset_at {
            window = Window {
                count: 0,
                reset_at: now + self.period,
            };
        }

        if window.count >= self.limit {
            tracing::warn!(key = %key, reset_at = %window.reset_at, "Rate limit reached");
            return false;
        }

        window.count += 1;
        windows.by_key.insert(key.to_string(), window);
        true
    }

    /// Keys with a live window
    #[cfg(test)]
    pub async fn tracked_keys(&self) -> usize {
        self.windows.lock().await.by_key.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::per_hour(DEFAULT_LIMIT_PER_HOUR)
    }
}
