//! Gateway Rate Limiting Module
//!
//! Sliding-window limiter keyed by client address.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Decides whether a client may make another request right now.
#[async_trait]
pub trait Throttle: Send + Sync {
    async fn allow(&self, client_id: &str) -> bool;
}

/// Allows at most `max_requests` per client within any `window`.
///
/// Timestamps of accepted requests are kept per client and pruned lazily on
/// each check. Rejected requests are not recorded, so a client that keeps
/// hammering regains access as soon as its oldest accepted request ages out.
#[derive(Clone)]
pub struct SlidingWindowLimiter {
    hits: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new(30, 60)
    }
}

impl SlidingWindowLimiter {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            hits: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Check and record a request from `client_id` made at `now`.
    pub async fn check_at(&self, client_id: &str, now: Instant) -> bool {
        let mut hits = self.hits.lock().await;
        let times = hits.entry(client_id.to_string()).or_default();
        prune(times, now, self.window);

        if times.len() >= self.max_requests as usize {
            warn!(client = %client_id, "Rate limit exceeded");
            return false;
        }
        times.push_back(now);
        debug!(client = %client_id, used = times.len(), max = self.max_requests, "Rate limit OK");
        true
    }

    /// Forget clients with no request inside the window as of `now`.
    pub async fn cleanup_at(&self, now: Instant) -> usize {
        let mut hits = self.hits.lock().await;
        let before = hits.len();
        hits.retain(|_, times| {
            prune(times, now, self.window);
            !times.is_empty()
        });
        before - hits.len()
    }

    pub async fn cleanup(&self) -> usize {
        self.cleanup_at(Instant::now()).await
    }

    /// Number of clients currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.hits.lock().await.len()
    }

    /// Runs [`cleanup`](Self::cleanup) every `every` until the task is aborted.
    pub fn spawn_cleanup(&self, every: Duration) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let dropped = limiter.cleanup().await;
                if dropped > 0 {
                    debug!(dropped, "Dropped idle rate limit entries");
                }
            }
        })
    }
}

fn prune(times: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = times.front() {
        if now.saturating_duration_since(oldest) < window {
            break;
        }
        times.pop_front();
    }
}

#[async_trait]
impl Throttle for SlidingWindowLimiter {
    async fn allow(&self, client_id: &str) -> bool {
        self.check_at(client_id, Instant::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_after_max_within_window() {
        let limiter = SlidingWindowLimiter::new(3, 60);
        let start = Instant::now();
        for i in 0..3 {
            assert!(limiter.check_at("1.2.3.4", start + Duration::from_secs(i)).await);
        }
        assert!(!limiter.check_at("1.2.3.4", start + Duration::from_secs(10)).await);
        assert!(limiter.check_at("5.6.7.8", start + Duration::from_secs(10)).await);
    }

    #[tokio::test]
    async fn window_slides_per_request() {
        let limiter = SlidingWindowLimiter::new(2, 60);
        let start = Instant::now();
        assert!(limiter.check_at("c", start).await);
        assert!(limiter.check_at("c", start + Duration::from_secs(30)).await);
        assert!(!limiter.check_at("c", start + Duration::from_secs(59)).await);
        // First hit has aged out; the second still counts.
        assert!(limiter.check_at("c", start + Duration::from_secs(60)).await);
        assert!(!limiter.check_at("c", start + Duration::from_secs(61)).await);
    }

    #[tokio::test]
    async fn cleanup_drops_idle_clients() {
        let limiter = SlidingWindowLimiter::new(5, 10);
        let start = Instant::now();
        limiter.check_at("old", start).await;
        limiter.check_at("fresh", start + Duration::from_secs(9)).await;

        let dropped = limiter.cleanup_at(start + Duration::from_secs(12)).await;
        assert_eq!(dropped, 1);
        assert_eq!(limiter.tracked_clients().await, 1);
    }

    #[tokio::test]
    async fn zero_budget_rejects_everything() {
        let limiter = SlidingWindowLimiter::new(0, 60);
        assert!(!limiter.allow("anyone").await);
    }
}
