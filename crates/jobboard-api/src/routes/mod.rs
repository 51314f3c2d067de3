//! # API Route Modules
//!
//! | Prefix                  | Module             |
//! |-------------------------|--------------------|
//! | `/api/v1/users/*`       | [`users`]          |
//! | `/api/v1/jobs/*`        | [`jobs`]           |
//! | `/api/v1/applications/*`| [`applications`]   |
//!
//! Every mutating handler builds a fresh validation context from the
//! caller's identity and runs the request's constraint table before
//! touching state.

pub mod applications;
pub mod jobs;
pub mod users;

use crate::error::AppError;

/// Log a failed write-through and turn it into a 500.
pub(crate) fn persistence_error(operation: &'static str, err: sqlx::Error) -> AppError {
    tracing::error!(operation, error = %err, "database write failed");
    AppError::Internal(format!("{operation}: {err}"))
}

/// Treat an empty string as "not supplied".
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
