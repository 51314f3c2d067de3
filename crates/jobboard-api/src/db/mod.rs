//! # Database Persistence Layer
//!
//! Optional Postgres persistence via SQLx. With a `DATABASE_URL` every user,
//! job and application mutation is written through to the database and the
//! in-memory stores are hydrated from it at startup. Without one the service
//! runs in-memory only.
//!
//! The schema (`users`, `jobs`, `applications`) is provisioned outside this
//! service; queries are checked at runtime, not at compile time.

pub mod applications;
pub mod jobs;
pub mod users;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Connect the pool.
///
/// Returns `None` if no URL is configured (in-memory-only mode) and `Err`
/// if the URL is set but the connection fails.
pub async fn init_pool(database_url: Option<&str>) -> Result<Option<PgPool>, sqlx::Error> {
    let url = match database_url {
        Some(url) => url,
        None => {
            tracing::warn!(
                "DATABASE_URL not set, running in-memory only. State will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(url)
        .await?;

    tracing::info!("Connected to PostgreSQL");
    Ok(Some(pool))
}

/// Wrap a stored value that no longer parses.
pub(crate) fn decode_error(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}
