//! # Users API
//!
//! Registration, login and profile management.
//!
//! ## Endpoints
//!
//! - `POST /api/v1/users/register`: create an account
//! - `POST /api/v1/users/login`: exchange credentials for a token
//! - `GET /api/v1/users/me`: the caller's profile
//! - `PUT /api/v1/users/profile`: basic profile fields
//! - `PUT /api/v1/users/profile/details`: skills, bio, links, contact info
//! - `PUT /api/v1/users/profile/employment`: replace work history
//! - `PUT /api/v1/users/profile/education`: replace education history
//! - `PUT /api/v1/users/profile/certifications`: replace certifications
//! - `GET /api/v1/users/:id`: a user's profile (admin or self)

use std::future::Future;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use jobboard_core::Role;
use jobboard_validate::{
    FieldValue, Rule, Schema, Validate, ValidationContext, ValidationError, ValidationErrors,
    Validator,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{non_empty, persistence_error};
use crate::auth::{hash_password, verify_password, AuthConfig, CallerIdentity};
use crate::db;
use crate::error::AppError;
use crate::extractors::{extract_authorized_json, extract_json, extract_validated_json};
use crate::state::{
    AppState, Certification, ContactInfo, EducationEntry, EmploymentEntry, PasswordDigest,
    ProfileDetails, SocialLinks, Store, UserRecord,
};

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request to create an account.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// `job_seeker` or `recruiter`.
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Validate for RegisterRequest {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<RegisterRequest>> = Lazy::new(|| {
            Schema::<RegisterRequest>::builder()
                .field("email", |r| r.email.as_str().into(), [Rule::Required, Rule::Email])
                .field("password", |r| r.password.as_str().into(), [Rule::Required, Rule::Password])
                .field("role", |r| r.role.as_str().into(), [Rule::Required])
                .field(
                    "full_name",
                    |r| r.full_name.as_str().into(),
                    [Rule::Required, Rule::MinLen(2), Rule::MaxLen(100)],
                )
                .field(
                    "company_name",
                    |r| r.company_name.as_deref().into(),
                    [Rule::MinLen(2), Rule::MaxLen(100)],
                )
                .field("phone", |r| r.phone.as_deref().into(), [Rule::Phone])
                .build()
        });
        &SCHEMA
    }
}

/// Credentials.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<LoginRequest>> = Lazy::new(|| {
            Schema::<LoginRequest>::builder()
                .field("email", |r| r.email.as_str().into(), [Rule::Required, Rule::Email])
                .field("password", |r| r.password.as_str().into(), [Rule::Required])
                .build()
        });
        &SCHEMA
    }
}

/// A signed access token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserRecord,
}

/// Basic profile fields. Absent fields are left unchanged; an empty string
/// clears an optional field.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    /// The user to update. Defaults to the caller; only admins may name
    /// someone else.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    /// Admin only.
    #[serde(default)]
    pub role: Option<String>,
    /// Admin only.
    #[serde(default)]
    pub verified: Option<bool>,
}

impl Validate for UpdateProfileRequest {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<UpdateProfileRequest>> = Lazy::new(|| {
            Schema::<UpdateProfileRequest>::builder()
                .field("user_id", |r| r.user_id.into(), [Rule::SameUser])
                .field(
                    "full_name",
                    |r| r.full_name.as_deref().into(),
                    [Rule::MinLen(2), Rule::MaxLen(100)],
                )
                .field("phone", |r| r.phone.as_deref().into(), [Rule::Phone])
                .field(
                    "company_name",
                    |r| r.company_name.as_deref().into(),
                    [Rule::MinLen(2), Rule::MaxLen(100)],
                )
                .field("resume_url", |r| r.resume_url.as_deref().into(), [Rule::Url])
                .field("role", |r| r.role.as_deref().into(), [Rule::AdminOnly])
                .field("verified", |r| r.verified.into(), [Rule::AdminOnly])
                .build()
        });
        &SCHEMA
    }
}

/// Free-form profile details. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileDetailsRequest {
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub social_links: Option<SocialLinks>,
    #[serde(default)]
    pub contact_info: Option<ContactInfo>,
}

fn link(links: &Option<SocialLinks>, pick: fn(&SocialLinks) -> &Option<String>) -> FieldValue<'_> {
    links.as_ref().and_then(|l| pick(l).as_deref()).into()
}

fn contact(info: &Option<ContactInfo>, pick: fn(&ContactInfo) -> &Option<String>) -> FieldValue<'_> {
    info.as_ref().and_then(|c| pick(c).as_deref()).into()
}

impl Validate for UpdateProfileDetailsRequest {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<UpdateProfileDetailsRequest>> = Lazy::new(|| {
            Schema::<UpdateProfileDetailsRequest>::builder()
                .field(
                    "skills",
                    |r| r.skills.as_deref().into(),
                    [Rule::MaxLen(50), Rule::ItemsRequired],
                )
                .field("experience", |r| r.experience.as_deref().into(), [Rule::MaxLen(5000)])
                .field("education", |r| r.education.as_deref().into(), [Rule::MaxLen(5000)])
                .field("bio", |r| r.bio.as_deref().into(), [Rule::MaxLen(2000)])
                .field(
                    "profile_picture_url",
                    |r| r.profile_picture_url.as_deref().into(),
                    [Rule::Url],
                )
                .field("location", |r| r.location.as_deref().into(), [Rule::MaxLen(100)])
                .field(
                    "social_links.linkedin",
                    |r| link(&r.social_links, |l| &l.linkedin),
                    [Rule::Url],
                )
                .field(
                    "social_links.twitter",
                    |r| link(&r.social_links, |l| &l.twitter),
                    [Rule::Url],
                )
                .field(
                    "social_links.github",
                    |r| link(&r.social_links, |l| &l.github),
                    [Rule::Url],
                )
                .field(
                    "contact_info.phone",
                    |r| contact(&r.contact_info, |c| &c.phone),
                    [Rule::Phone],
                )
                .field(
                    "contact_info.email",
                    |r| contact(&r.contact_info, |c| &c.email),
                    [Rule::Email],
                )
                .field(
                    "contact_info.address",
                    |r| contact(&r.contact_info, |c| &c.address),
                    [Rule::MaxLen(200)],
                )
                .build()
        });
        &SCHEMA
    }
}

/// One work history entry as submitted.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EmploymentInput {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub title: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for EmploymentInput {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<EmploymentInput>> = Lazy::new(|| {
            Schema::<EmploymentInput>::builder()
                .field("company", |e| e.company.as_str().into(), [Rule::Required, Rule::MaxLen(100)])
                .field("title", |e| e.title.as_str().into(), [Rule::Required, Rule::MaxLen(100)])
                .field("description", |e| e.description.as_deref().into(), [Rule::MaxLen(2000)])
                .build()
        });
        &SCHEMA
    }
}

/// Replacement work history.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEmploymentRequest {
    #[serde(default)]
    pub employment_history: Vec<EmploymentInput>,
}

/// One education entry as submitted.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EducationInput {
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Validate for EducationInput {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<EducationInput>> = Lazy::new(|| {
            Schema::<EducationInput>::builder()
                .field(
                    "institution",
                    |e| e.institution.as_str().into(),
                    [Rule::Required, Rule::MaxLen(100)],
                )
                .field("degree", |e| e.degree.as_str().into(), [Rule::Required, Rule::MaxLen(100)])
                .field("field", |e| e.field.as_str().into(), [Rule::Required, Rule::MaxLen(100)])
                .build()
        });
        &SCHEMA
    }
}

/// Replacement education history.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEducationRequest {
    #[serde(default)]
    pub education_history: Vec<EducationInput>,
}

/// One certification as submitted.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CertificationInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub authority: String,
    pub issue_date: NaiveDate,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub credential_id: Option<String>,
}

impl Validate for CertificationInput {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<CertificationInput>> = Lazy::new(|| {
            Schema::<CertificationInput>::builder()
                .field("name", |c| c.name.as_str().into(), [Rule::Required, Rule::MaxLen(100)])
                .field(
                    "authority",
                    |c| c.authority.as_str().into(),
                    [Rule::Required, Rule::MaxLen(100)],
                )
                .field(
                    "credential_id",
                    |c| c.credential_id.as_deref().into(),
                    [Rule::MaxLen(100)],
                )
                .build()
        });
        &SCHEMA
    }
}

/// Replacement certifications.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCertificationsRequest {
    #[serde(default)]
    pub certifications: Vec<CertificationInput>,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users/register", post(register))
        .route("/api/v1/users/login", post(login))
        .route("/api/v1/users/me", get(me))
        .route("/api/v1/users/profile", put(update_profile))
        .route("/api/v1/users/profile/details", put(update_profile_details))
        .route("/api/v1/users/profile/employment", put(update_employment))
        .route("/api/v1/users/profile/education", put(update_education))
        .route("/api/v1/users/profile/certifications", put(update_certifications))
        .route("/api/v1/users/:id", get(get_user))
}

// ── Helpers ─────────────────────────────────────────────────────────

fn user_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("user {id} not found"))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("invalid email or password".into())
}

/// Argon2 is deliberately slow; keep it off the async workers.
async fn blocking<R: Send + 'static>(f: impl FnOnce() -> R + Send + 'static) -> Result<R, AppError> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {e}")))
}

/// Apply `change` to a copy of the stored user and hand the result to
/// `persist`. The store only sees the new record once `persist` succeeds.
async fn save_user_with<Fut>(
    users: &Store<UserRecord>,
    id: Uuid,
    change: impl FnOnce(&mut UserRecord),
    persist: impl FnOnce(UserRecord) -> Fut,
) -> Result<UserRecord, AppError>
where
    Fut: Future<Output = Result<UserRecord, AppError>>,
{
    let mut user = users.get(&id).ok_or_else(|| user_not_found(id))?;
    change(&mut user);
    user.recompute_completeness();
    user.updated_at = Utc::now();

    let user = persist(user).await?;
    users.insert(id, user.clone());
    Ok(user)
}

async fn save_user(
    state: &AppState,
    id: Uuid,
    change: impl FnOnce(&mut UserRecord),
) -> Result<UserRecord, AppError> {
    let pool = state.db_pool.clone();
    save_user_with(&state.users, id, change, |user| async move {
        if let Some(pool) = &pool {
            db::users::update(pool, &user)
                .await
                .map_err(|e| persistence_error("update user", e))?;
        }
        Ok(user)
    })
    .await
}

/// Validate every entry of a history list, plus its date ordering.
/// Errors are reported as `prefix[index].field`.
fn check_entries<T: Validate>(
    validator: &Validator,
    ctx: &ValidationContext,
    prefix: &str,
    entries: &[T],
    span: impl Fn(&T) -> (NaiveDate, Option<NaiveDate>, &'static str),
) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();
    for (index, entry) in entries.iter().enumerate() {
        let mut entry_errors = validator
            .validate_with_role(entry, ctx)
            .err()
            .unwrap_or_else(ValidationErrors::new);
        let (start, end, end_field) = span(entry);
        if end.is_some_and(|end| end < start) {
            entry_errors.push(ValidationError::new(end_field, "Must not be before the start date"));
        }
        errors.merge(entry_errors.nested(prefix, index));
    }
    errors.into_result().map_err(AppError::from)
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /api/v1/users/register: Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserRecord),
        (status = 403, description = "Admin self-registration", body = crate::error::ErrorBody),
        (status = 409, description = "Email already registered", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserRecord>), AppError> {
    let req = extract_validated_json(body, &state.validator)?;
    let role: Role = req.role.parse().map_err(|_| {
        ValidationErrors::single("role", "Invalid role. Must be one of: job_seeker, recruiter")
    })?;
    if role.is_admin() {
        return Err(AppError::Forbidden(
            "administrator accounts cannot be self-registered".into(),
        ));
    }

    let email = req.email.trim().to_ascii_lowercase();
    if state.users.find(|u| u.email == email).is_some() {
        return Err(AppError::Conflict(format!("email {email} is already registered")));
    }
    let password = req.password;
    let hash = blocking(move || hash_password(&password)).await??;

    let now = Utc::now();
    let id = Uuid::new_v4();
    let mut record = UserRecord {
        id,
        email: email.clone(),
        password_hash: PasswordDigest::new(hash),
        role,
        company_id: id,
        full_name: req.full_name,
        company_name: non_empty(req.company_name),
        phone: non_empty(req.phone),
        resume_url: None,
        verified: false,
        profile: ProfileDetails::default(),
        employment_history: Vec::new(),
        education_history: Vec::new(),
        certifications: Vec::new(),
        profile_completeness: 0,
        created_at: now,
        updated_at: now,
    };
    record.recompute_completeness();

    if !state.users.insert_unless(id, record.clone(), |u| u.email == email) {
        return Err(AppError::Conflict(format!("email {email} is already registered")));
    }
    if let Some(pool) = &state.db_pool {
        if let Err(e) = db::users::insert(pool, &record).await {
            state.users.remove(&id);
            return Err(persistence_error("insert user", e));
        }
    }

    tracing::info!(user_id = %id, role = %role, "user registered");
    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /api/v1/users/login: Exchange credentials for an access token.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
async fn login(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthConfig>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let req = extract_validated_json(body, &state.validator)?;
    let email = req.email.trim().to_ascii_lowercase();

    let user = state.users.find(|u| u.email == email).ok_or_else(|| {
        tracing::warn!("login failed: unknown email");
        invalid_credentials()
    })?;
    let stored = user.password_hash.clone();
    let password = req.password;
    if !blocking(move || verify_password(&password, stored.as_str())).await? {
        tracing::warn!(user_id = %user.id, "login failed: wrong password");
        return Err(invalid_credentials());
    }

    let (token, expires_at) = auth.issue(&CallerIdentity::from(&user))?;
    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".into(),
        expires_at,
        user,
    }))
}

/// GET /api/v1/users/me: The caller's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserRecord),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
async fn me(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<UserRecord>, AppError> {
    state
        .users
        .get(&caller.user_id)
        .map(Json)
        .ok_or_else(|| user_not_found(caller.user_id))
}

/// PUT /api/v1/users/profile: Update basic profile fields.
#[utoipa::path(
    put,
    path = "/api/v1/users/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserRecord),
        (status = 404, description = "User not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
async fn update_profile(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UserRecord>, AppError> {
    let req = extract_authorized_json(body, &state.validator, &caller)?;
    let role = non_empty(req.role)
        .map(|r| r.parse::<Role>())
        .transpose()
        .map_err(|_| {
            ValidationErrors::single(
                "role",
                "Invalid role. Must be one of: job_seeker, recruiter, admin",
            )
        })?;
    let target = req.user_id.unwrap_or(caller.user_id);
    let admin = caller.is_admin();

    let updated = save_user(&state, target, |user| {
        if let Some(name) = non_empty(req.full_name) {
            user.full_name = name;
        }
        if let Some(phone) = req.phone {
            user.phone = non_empty(Some(phone));
        }
        if let Some(company) = req.company_name {
            user.company_name = non_empty(Some(company));
        }
        if let Some(url) = req.resume_url {
            user.resume_url = non_empty(Some(url));
        }
        if admin {
            if let Some(role) = role {
                user.role = role;
            }
            if let Some(verified) = req.verified {
                user.verified = verified;
            }
        }
    })
    .await?;
    Ok(Json(updated))
}

/// PUT /api/v1/users/profile/details: Update free-form profile details.
#[utoipa::path(
    put,
    path = "/api/v1/users/profile/details",
    request_body = UpdateProfileDetailsRequest,
    responses(
        (status = 200, description = "Details updated", body = UserRecord),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
async fn update_profile_details(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<UpdateProfileDetailsRequest>, JsonRejection>,
) -> Result<Json<UserRecord>, AppError> {
    let req = extract_authorized_json(body, &state.validator, &caller)?;

    let updated = save_user(&state, caller.user_id, |user| {
        let profile = &mut user.profile;
        if let Some(skills) = req.skills {
            profile.skills = skills.into_iter().map(|s| s.trim().to_string()).collect();
        }
        if let Some(v) = req.experience {
            profile.experience = non_empty(Some(v));
        }
        if let Some(v) = req.education {
            profile.education = non_empty(Some(v));
        }
        if let Some(v) = req.bio {
            profile.bio = non_empty(Some(v));
        }
        if let Some(v) = req.profile_picture_url {
            profile.profile_picture_url = non_empty(Some(v));
        }
        if let Some(v) = req.location {
            profile.location = non_empty(Some(v));
        }
        if let Some(links) = req.social_links {
            profile.social_links = links;
        }
        if let Some(info) = req.contact_info {
            profile.contact_info = info;
        }
    })
    .await?;
    Ok(Json(updated))
}

/// PUT /api/v1/users/profile/employment: Replace work history.
#[utoipa::path(
    put,
    path = "/api/v1/users/profile/employment",
    request_body = UpdateEmploymentRequest,
    responses(
        (status = 200, description = "History replaced", body = UserRecord),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
async fn update_employment(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<UpdateEmploymentRequest>, JsonRejection>,
) -> Result<Json<UserRecord>, AppError> {
    let req = extract_json(body)?;
    check_entries(
        &state.validator,
        &caller.validation_context(),
        "employment_history",
        &req.employment_history,
        |e| (e.start_date, e.end_date, "end_date"),
    )?;

    let entries: Vec<EmploymentEntry> = req
        .employment_history
        .into_iter()
        .map(|e| EmploymentEntry {
            id: Uuid::new_v4(),
            company: e.company,
            title: e.title,
            start_date: e.start_date,
            end_date: e.end_date,
            description: non_empty(e.description),
        })
        .collect();

    let updated = save_user(&state, caller.user_id, |user| {
        user.employment_history = entries;
    })
    .await?;
    Ok(Json(updated))
}

/// PUT /api/v1/users/profile/education: Replace education history.
#[utoipa::path(
    put,
    path = "/api/v1/users/profile/education",
    request_body = UpdateEducationRequest,
    responses(
        (status = 200, description = "History replaced", body = UserRecord),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
async fn update_education(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<UpdateEducationRequest>, JsonRejection>,
) -> Result<Json<UserRecord>, AppError> {
    let req = extract_json(body)?;
    check_entries(
        &state.validator,
        &caller.validation_context(),
        "education_history",
        &req.education_history,
        |e| (e.start_date, e.end_date, "end_date"),
    )?;

    let entries: Vec<EducationEntry> = req
        .education_history
        .into_iter()
        .map(|e| EducationEntry {
            id: Uuid::new_v4(),
            institution: e.institution,
            degree: e.degree,
            field: e.field,
            start_date: e.start_date,
            end_date: e.end_date,
        })
        .collect();

    let updated = save_user(&state, caller.user_id, |user| {
        user.education_history = entries;
    })
    .await?;
    Ok(Json(updated))
}

/// PUT /api/v1/users/profile/certifications: Replace certifications.
#[utoipa::path(
    put,
    path = "/api/v1/users/profile/certifications",
    request_body = UpdateCertificationsRequest,
    responses(
        (status = 200, description = "Certifications replaced", body = UserRecord),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
async fn update_certifications(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<UpdateCertificationsRequest>, JsonRejection>,
) -> Result<Json<UserRecord>, AppError> {
    let req = extract_json(body)?;
    check_entries(
        &state.validator,
        &caller.validation_context(),
        "certifications",
        &req.certifications,
        |c| (c.issue_date, c.expiry_date, "expiry_date"),
    )?;

    let entries: Vec<Certification> = req
        .certifications
        .into_iter()
        .map(|c| Certification {
            id: Uuid::new_v4(),
            name: c.name,
            authority: c.authority,
            issue_date: c.issue_date,
            expiry_date: c.expiry_date,
            credential_id: non_empty(c.credential_id),
        })
        .collect();

    let updated = save_user(&state, caller.user_id, |user| {
        user.certifications = entries;
    })
    .await?;
    Ok(Json(updated))
}

/// GET /api/v1/users/:id: A user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserRecord),
        (status = 403, description = "Not the caller and caller is not admin", body = crate::error::ErrorBody),
        (status = 404, description = "User not found", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
async fn get_user(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<UserRecord>, AppError> {
    if !caller.is_admin() && caller.user_id != id {
        return Err(AppError::Forbidden(
            "only administrators may view other users".into(),
        ));
    }
    state
        .users
        .get(&id)
        .map(Json)
        .ok_or_else(|| user_not_found(id))
}
