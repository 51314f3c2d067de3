//! # Authentication & Authorization
//!
//! HS256 JWT bearer tokens with role-based access control.
//!
//! ## Token claims
//!
//! ```text
//! sub  user id
//! role job_seeker | recruiter | admin
//! org  organization the caller acts for
//! iat  issued-at (unix seconds)
//! exp  expiry (unix seconds)
//! ```
//!
//! ## CallerIdentity
//!
//! The middleware decodes the token and injects a [`CallerIdentity`] into the
//! request extensions. Requests without an `Authorization` header pass
//! through anonymously: protected handlers take `CallerIdentity` (401 when
//! absent), public ones take `Option<CallerIdentity>`. A header that is
//! present but malformed or expired is rejected outright.
//!
//! Handlers turn the identity into a per-request
//! [`ValidationContext`](jobboard_validate::ValidationContext) for the
//! role-aware request rules.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use jobboard_core::Role;
use jobboard_validate::ValidationContext;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::state::{JobRecord, UserRecord};

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// Identity of the authenticated caller, available to handlers via
/// Axum's `FromRequestParts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The caller's user id.
    pub user_id: Uuid,
    /// The caller's role.
    pub role: Role,
    /// The organization the caller manages jobs for.
    pub company_id: Uuid,
}

impl CallerIdentity {
    /// Check if the caller has at least the given minimum role.
    pub fn has_role(&self, minimum: Role) -> bool {
        self.role.at_least(minimum)
    }

    /// Whether the caller is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// The context handed to the validator for this caller.
    pub fn validation_context(&self) -> ValidationContext {
        ValidationContext::new(self.role, self.user_id, self.company_id)
    }

    /// Whether the caller may edit `job` and review its applications.
    ///
    /// - `Admin` manages every job.
    /// - `Recruiter` manages jobs of their own company.
    /// - `Applicant` manages none.
    pub fn can_manage_job(&self, job: &JobRecord) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Recruiter => self.company_id == job.company_id,
            Role::Applicant => false,
        }
    }
}

impl From<&UserRecord> for CallerIdentity {
    fn from(user: &UserRecord) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            company_id: user.company_id,
        }
    }
}

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized("authentication required".into()))
    }
}

/// Check that the caller has at least the required role.
/// Returns 403 Forbidden if the caller's role is insufficient.
pub fn require_role(caller: &CallerIdentity, minimum: Role) -> Result<(), AppError> {
    if caller.has_role(minimum) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role '{}' required, caller has '{}'",
            minimum.as_str(),
            caller.role.as_str()
        )))
    }
}

/// Check that the caller holds one of `allowed`.
pub fn require_any_role(caller: &CallerIdentity, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&caller.role) {
        return Ok(());
    }
    let names: Vec<&str> = allowed.iter().map(Role::as_str).collect();
    Err(AppError::Forbidden(format!(
        "one of [{}] required, caller has '{}'",
        names.join(", "),
        caller.role.as_str()
    )))
}

// ── Tokens ──────────────────────────────────────────────────────────────────

/// JWT claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub org: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Signing keys and token lifetime, injected into request extensions.
///
/// Custom `Debug` hides the key material.
#[derive(Clone)]
pub struct AuthConfig {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[REDACTED]")
            .field("ttl_hours", &self.ttl.num_hours())
            .finish()
    }
}

impl AuthConfig {
    /// Keys derived from a shared HMAC secret.
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Sign a token for `identity`. Returns the token and its expiry.
    pub fn issue(&self, identity: &CallerIdentity) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: identity.user_id,
            role: identity.role,
            org: identity.company_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))?;
        Ok((token, expires_at))
    }

    /// Decode and check a token, returning the identity it names.
    pub fn verify(&self, token: &str) -> Result<CallerIdentity, String> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| format!("invalid bearer token: {e}"))?;
        Ok(CallerIdentity {
            user_id: data.claims.sub,
            role: data.claims.role,
            company_id: data.claims.org,
        })
    }
}

// ── Passwords ───────────────────────────────────────────────────────────────

/// Hash a password with Argon2id and a random salt, in PHC string form.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| AppError::Internal(format!("salt encoding failed: {e}")))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// Check a password against a stored PHC hash. Unparseable hashes never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "stored password hash is malformed");
            false
        }
    }
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Decode the bearer token, if any, and inject the caller's identity.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let Some(config) = request.extensions().get::<AuthConfig>().cloned() else {
        return next.run(request).await;
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    match auth_header {
        None => next.run(request).await,
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(token) => match config.verify(token.trim()) {
                Ok(identity) => {
                    request.extensions_mut().insert(identity);
                    next.run(request).await
                }
                Err(msg) => {
                    tracing::warn!(reason = %msg, "authentication failed");
                    unauthorized_response("invalid or expired bearer token")
                }
            },
            None => {
                tracing::warn!("authentication failed: non-Bearer authorization scheme");
                unauthorized_response("authorization header must use Bearer scheme")
            }
        },
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody::new("UNAUTHORIZED", message)),
    )
        .into_response()
}
