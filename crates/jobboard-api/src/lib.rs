//! # jobboard-api: Axum Service for the Job Board
//!
//! Users, job postings and applications behind JWT authentication. Every
//! request body is checked against its declared constraint table by the
//! shared [`jobboard_validate::Validator`], with a validation context built
//! fresh from the caller's identity on each authenticated request.
//!
//! ## API Surface
//!
//! | Prefix                   | Module                     |
//! |--------------------------|----------------------------|
//! | `/api/v1/users/*`        | [`routes::users`]          |
//! | `/api/v1/jobs/*`         | [`routes::jobs`]           |
//! | `/api/v1/applications/*` | [`routes::applications`]   |
//! | `/openapi.json`          | [`openapi`]                |
//! | `/health/*`              | probes, no middleware      |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → Logging → Auth → RateLimit → Handler
//! ```

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::{Extension, Router};

use crate::auth::AuthConfig;
use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter};
use crate::middleware::ClientIpSource;
use crate::state::AppState;

/// Assemble the full application router.
///
/// Health probes (`/health/*`) sit outside the middleware stack so they
/// answer without credentials and never count against a rate limit.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig::new(&state.config.jwt_secret, state.config.jwt_ttl_hours);
    let limiter = RateLimiter::new(RateLimitConfig {
        requests_per_minute: state.config.rate_limit_per_minute,
        burst: state.config.rate_limit_burst,
    });

    let api = Router::new()
        .merge(routes::users::router())
        .merge(routes::jobs::router())
        .merge(routes::applications::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::rate_limit::rate_limit_middleware))
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::logging::logging_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(Extension(auth_config))
        .layer(Extension(limiter))
        .layer(Extension(ClientIpSource::from_trust(
            state.config.trust_proxy_headers,
        )))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe. 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe.
async fn readiness() -> &'static str {
    "ready"
}
