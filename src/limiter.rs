// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window rate limiter keyed by client IP.
//!
//! Each client keeps the instants of its recent requests. A check drops
//! instants that have left the window, rejects when the remainder has
//! reached the limit, and otherwise records the new request.
//!
//! State lives for the lifetime of the process and is local to it: two
//! instances behind a load balancer each admit the full limit.

use crate::config::RateLimitConfig;
use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining requests in current window
        remaining: u32,
        /// Time until the oldest counted request leaves the window
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Time until a slot frees up
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Per-IP sliding-window rate limiter.
pub struct RateLimiter {
    config: RateLimitConfig,
    clients: Mutex<HashMap<IpAddr, VecDeque<Instant>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// A limit of zero turns the limiter off.
    pub fn is_enabled(&self) -> bool {
        self.config.max_requests > 0
    }

    /// Check and record a request from `ip` at the current instant.
    pub async fn check(&self, ip: IpAddr) -> RateLimitResult {
        self.check_at(ip, Instant::now()).await
    }

    /// Check and record a request from `ip` at `now`.
    ///
    /// Callers must pass non-decreasing instants for a given client.
    pub async fn check_at(&self, ip: IpAddr, now: Instant) -> RateLimitResult {
        let window = self.config.window_duration();

        if !self.is_enabled() {
            return RateLimitResult::Allowed {
                remaining: u32::MAX,
                reset_in: window,
            };
        }

        let limit = self.config.max_requests as usize;
        let mut clients = self.clients.lock().await;
        let history = clients.entry(ip).or_default();
        prune(history, now, window);

        if history.len() >= limit {
            let retry_after = time_until_expiry(history, now, window);
            warn!(%ip, ?retry_after, "Rate limit exceeded");
            return RateLimitResult::Limited { retry_after };
        }

        history.push_back(now);
        let remaining = (limit - history.len()) as u32;
        debug!(%ip, remaining, "Request counted");

        RateLimitResult::Allowed {
            remaining,
            reset_in: time_until_expiry(history, now, window),
        }
    }

    /// Drop clients with no request left inside the window.
    pub async fn cleanup(&self) {
        self.cleanup_at(Instant::now()).await
    }

    /// Drop clients with no request left inside the window as of `now`.
    pub async fn cleanup_at(&self, now: Instant) {
        let window = self.config.window_duration();
        let mut clients = self.clients.lock().await;
        let before = clients.len();

        clients.retain(|_, history| {
            prune(history, now, window);
            !history.is_empty()
        });

        let evicted = before - clients.len();
        if evicted > 0 {
            debug!(evicted, tracked = clients.len(), "Evicted idle rate limit entries");
        }
    }

    /// Number of client keys currently held.
    pub async fn tracked_clients(&self) -> usize {
        self.clients.lock().await.len()
    }
}

/// Remove leading instants whose age has reached the window.
fn prune(history: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = history.front() {
        if now.saturating_duration_since(*oldest) >= window {
            history.pop_front();
        } else {
            break;
        }
    }
}

fn time_until_expiry(history: &VecDeque<Instant>, now: Instant, window: Duration) -> Duration {
    history
        .front()
        .and_then(|oldest| oldest.checked_add(window))
        .map(|expiry| expiry.saturating_duration_since(now))
        .unwrap_or(window)
}
