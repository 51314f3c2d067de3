//! # Custom Extractors & Validation
//!
//! Helpers that turn axum's rejections into [`AppError`]s and run the
//! request's constraint table.
//!
//! ```ignore
//! async fn handler(
//!     State(state): State<AppState>,
//!     caller: CallerIdentity,
//!     body: Result<Json<T>, JsonRejection>,
//! ) -> Result<..., AppError> {
//!     let req = extract_authorized_json(body, &state.validator, &caller)?;
//!     // use req...
//! }
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use jobboard_validate::{Validate, Validator};

use crate::auth::CallerIdentity;
use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract query parameters, mapping parse errors to [`AppError::BadRequest`].
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and check it without a caller context.
///
/// For anonymous endpoints (registration, login). Role rules follow the
/// validator's context policy.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
    validator: &Validator,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    validator.validate(&value)?;
    Ok(value)
}

/// Extract a JSON body and check it on behalf of `caller`.
pub fn extract_authorized_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
    validator: &Validator,
    caller: &CallerIdentity,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    validator.validate_with_role(&value, &caller.validation_context())?;
    Ok(value)
}
