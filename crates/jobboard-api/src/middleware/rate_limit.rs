//! # Per-Client Rate Limiting
//!
//! Two fixed windows per client address: a per-minute quota and a
//! per-second burst cap. A request must fit in both.
//!
//! Clients whose minute window has lapsed carry no state worth keeping and
//! are swept out once the table grows past [`SWEEP_THRESHOLD`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parking_lot::Mutex;

use crate::error::ErrorBody;

const MINUTE: Duration = Duration::from_secs(60);
const SECOND: Duration = Duration::from_secs(1);

/// Table size at which idle clients start being swept.
pub const SWEEP_THRESHOLD: usize = 1024;

/// Minimum spacing between sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_secs(10);

/// Rate limiter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests per client per minute.
    pub requests_per_minute: u32,
    /// Requests per client per second.
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 100,
            burst: 50,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

impl Window {
    fn new(now: Instant) -> Self {
        Self {
            started: now,
            count: 0,
        }
    }

    fn roll(&mut self, now: Instant, length: Duration) {
        if now.duration_since(self.started) >= length {
            *self = Self::new(now);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ClientState {
    minute: Window,
    second: Window,
}

impl ClientState {
    fn idle(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.minute.started) >= MINUTE
    }
}

#[derive(Debug, Default)]
struct Clients {
    states: HashMap<String, ClientState>,
    next_sweep: Option<Instant>,
}

impl Clients {
    fn sweep(&mut self, now: Instant) {
        if self.states.len() < SWEEP_THRESHOLD || self.next_sweep.is_some_and(|at| now < at) {
            return;
        }
        let before = self.states.len();
        self.states.retain(|_, state| !state.idle(now));
        self.next_sweep = Some(now + SWEEP_INTERVAL);
        tracing::debug!(
            removed = before - self.states.len(),
            remaining = self.states.len(),
            "swept idle rate limit clients"
        );
    }
}

/// Shared rate limiter state.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    clients: Arc<Mutex<Clients>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            clients: Arc::new(Mutex::new(Clients::default())),
        }
    }

    /// Count a request from `key`. Returns false when either window is full.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    /// Number of clients currently holding limiter state.
    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().states.len()
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut clients = self.clients.lock();
        clients.sweep(now);
        let state = clients.states.entry(key.to_string()).or_insert(ClientState {
            minute: Window::new(now),
            second: Window::new(now),
        });

        state.minute.roll(now, MINUTE);
        state.second.roll(now, SECOND);

        if state.minute.count >= self.config.requests_per_minute
            || state.second.count >= self.config.burst
        {
            return false;
        }
        state.minute.count += 1;
        state.second.count += 1;
        true
    }
}

/// Middleware that enforces per-client rate limits.
pub async fn rate_limit_middleware(request: Request, next: Next) -> Response {
    if let Some(limiter) = request.extensions().get::<RateLimiter>().cloned() {
        let key = super::client_ip(&request);
        if !limiter.check(&key) {
            tracing::warn!(client_ip = %key, "rate limit exceeded");
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorBody::new("RATE_LIMITED", "rate limit exceeded")),
            )
                .into_response();
        }
    }

    next.run(request).await
}
