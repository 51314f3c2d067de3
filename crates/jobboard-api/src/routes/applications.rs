//! # Applications API
//!
//! Job seekers apply to active postings; the posting company reviews.
//!
//! ## Endpoints
//!
//! - `POST /api/v1/applications`: apply to a job
//! - `GET /api/v1/applications`: applications visible to the caller
//! - `GET /api/v1/applications/:id`: one application
//! - `PATCH /api/v1/applications/:id/status`: review decision
//! - `GET /api/v1/jobs/:id/applications`: every application to one job
//!
//! Visibility: an applicant sees their own applications, a recruiter sees
//! applications to their company's jobs, an admin sees everything.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use jobboard_core::{paginate, ApplicationStatus, PageMeta, PageRequest, Role};
use jobboard_validate::{Rule, Schema, Validate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::persistence_error;
use crate::auth::{require_any_role, CallerIdentity};
use crate::db;
use crate::error::AppError;
use crate::extractors::{extract_authorized_json, extract_query};
use crate::state::{AppState, ApplicationRecord};

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request to apply to a job.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateApplicationRequest {
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub resume_url: String,
    /// Defaults to the caller. Only admins may apply on someone's behalf.
    #[serde(default)]
    pub applicant_id: Option<Uuid>,
}

impl Validate for CreateApplicationRequest {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<CreateApplicationRequest>> = Lazy::new(|| {
            Schema::<CreateApplicationRequest>::builder()
                .field("job_id", |r| r.job_id.as_str().into(), [Rule::Required, Rule::Uuid])
                .field(
                    "cover_letter",
                    |r| r.cover_letter.as_str().into(),
                    [Rule::Required, Rule::MinLen(50), Rule::MaxLen(5000)],
                )
                .field(
                    "resume_url",
                    |r| r.resume_url.as_str().into(),
                    [Rule::Required, Rule::Url],
                )
                .field("applicant_id", |r| r.applicant_id.into(), [Rule::SameUser])
                .build()
        });
        &SCHEMA
    }
}

/// Review decision.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateApplicationStatusRequest {
    /// `pending`, `reviewed`, `accepted` or `rejected`.
    #[serde(default)]
    pub status: String,
}

impl Validate for UpdateApplicationStatusRequest {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<UpdateApplicationStatusRequest>> = Lazy::new(|| {
            Schema::<UpdateApplicationStatusRequest>::builder()
                .field(
                    "status",
                    |r| r.status.as_str().into(),
                    [Rule::Required, Rule::ApplicationStatus, Rule::RecruiterOnly],
                )
                .build()
        });
        &SCHEMA
    }
}

/// Pagination for application listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApplicationListQuery {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Items per page, at most 100.
    pub page_size: Option<i64>,
}

/// One page of applications.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApplicationListResponse {
    pub data: Vec<ApplicationRecord>,
    /// `{total, page, page_size, total_page}`.
    #[schema(value_type = Object)]
    pub meta: PageMeta,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the applications router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/applications",
            post(create_application).get(list_applications),
        )
        .route("/api/v1/applications/:id", get(get_application))
        .route(
            "/api/v1/applications/:id/status",
            patch(update_application_status),
        )
        .route("/api/v1/jobs/:id/applications", get(list_job_applications))
}

// ── Helpers ─────────────────────────────────────────────────────────

fn application_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("application {id} not found"))
}

/// Whether `caller` may read `application`.
fn can_view(state: &AppState, caller: &CallerIdentity, application: &ApplicationRecord) -> bool {
    match caller.role {
        Role::Admin => true,
        Role::Applicant => application.applicant_id == caller.user_id,
        Role::Recruiter => state
            .jobs
            .get(&application.job_id)
            .is_some_and(|job| caller.can_manage_job(&job)),
    }
}

fn page_of(
    mut items: Vec<ApplicationRecord>,
    query: ApplicationListQuery,
) -> ApplicationListResponse {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
    let (data, meta) = paginate(items, PageRequest::new(query.page, query.page_size));
    ApplicationListResponse { data, meta }
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /api/v1/applications: Apply to a job.
#[utoipa::path(
    post,
    path = "/api/v1/applications",
    request_body = CreateApplicationRequest,
    responses(
        (status = 201, description = "Application submitted", body = ApplicationRecord),
        (status = 403, description = "Caller is not a job seeker", body = crate::error::ErrorBody),
        (status = 404, description = "Job or applicant not found", body = crate::error::ErrorBody),
        (status = 409, description = "Job closed or already applied", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "applications"
)]
async fn create_application(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateApplicationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApplicationRecord>), AppError> {
    require_any_role(&caller, &[Role::Applicant, Role::Admin])?;
    let req = extract_authorized_json(body, &state.validator, &caller)?;

    let job_id: Uuid = req
        .job_id
        .parse()
        .map_err(|e| AppError::BadRequest(format!("job_id: {e}")))?;
    let job = state
        .jobs
        .get(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("job {job_id} not found")))?;
    if !job.status.accepts_applications() {
        return Err(AppError::Conflict(format!(
            "job {job_id} is {} and not accepting applications",
            job.status
        )));
    }

    let applicant_id = match req.applicant_id {
        Some(id) if state.users.get(&id).is_none() => {
            return Err(AppError::NotFound(format!("user {id} not found")));
        }
        Some(id) => id,
        None => caller.user_id,
    };
    let now = Utc::now();
    let application = ApplicationRecord {
        id: Uuid::new_v4(),
        job_id,
        applicant_id,
        cover_letter: req.cover_letter,
        resume_url: req.resume_url,
        status: ApplicationStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    let inserted = state.applications.insert_unless(application.id, application.clone(), |a| {
        a.job_id == job_id && a.applicant_id == applicant_id
    });
    if !inserted {
        return Err(AppError::Conflict(format!(
            "user {applicant_id} has already applied to job {job_id}"
        )));
    }
    if let Some(pool) = &state.db_pool {
        if let Err(e) = db::applications::insert(pool, &application).await {
            state.applications.remove(&application.id);
            return Err(persistence_error("insert application", e));
        }
    }

    tracing::info!(
        application_id = %application.id,
        job_id = %job_id,
        applicant_id = %applicant_id,
        "application submitted"
    );
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications: Applications visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/applications",
    params(ApplicationListQuery),
    responses(
        (status = 200, description = "One page of applications", body = ApplicationListResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorBody),
    ),
    tag = "applications"
)]
async fn list_applications(
    State(state): State<AppState>,
    caller: CallerIdentity,
    query: Result<Query<ApplicationListQuery>, QueryRejection>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let query = extract_query(query)?;
    let items = state
        .applications
        .filter(|a| can_view(&state, &caller, a));
    Ok(Json(page_of(items, query)))
}

/// GET /api/v1/applications/:id: One application.
#[utoipa::path(
    get,
    path = "/api/v1/applications/{id}",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application found", body = ApplicationRecord),
        (status = 403, description = "Not visible to the caller", body = crate::error::ErrorBody),
        (status = 404, description = "Application not found", body = crate::error::ErrorBody),
    ),
    tag = "applications"
)]
async fn get_application(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationRecord>, AppError> {
    let application = state
        .applications
        .get(&id)
        .ok_or_else(|| application_not_found(id))?;
    if !can_view(&state, &caller, &application) {
        return Err(AppError::Forbidden(
            "application belongs to another user or company".into(),
        ));
    }
    Ok(Json(application))
}

/// PATCH /api/v1/applications/:id/status: Record a review decision.
#[utoipa::path(
    patch,
    path = "/api/v1/applications/{id}/status",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = UpdateApplicationStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApplicationRecord),
        (status = 403, description = "Caller does not manage the job", body = crate::error::ErrorBody),
        (status = 404, description = "Application not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "applications"
)]
async fn update_application_status(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateApplicationStatusRequest>, JsonRejection>,
) -> Result<Json<ApplicationRecord>, AppError> {
    let req = extract_authorized_json(body, &state.validator, &caller)?;
    let status: ApplicationStatus = req.status.parse()?;

    let application = state
        .applications
        .get(&id)
        .ok_or_else(|| application_not_found(id))?;
    let manages = state
        .jobs
        .get(&application.job_id)
        .is_some_and(|job| caller.can_manage_job(&job));
    if !manages {
        tracing::warn!(application_id = %id, user_id = %caller.user_id, "review denied");
        return Err(AppError::Forbidden(
            "only the posting company or an admin may review this application".into(),
        ));
    }

    let updated_at = Utc::now();
    if let Some(pool) = &state.db_pool {
        db::applications::update_status(pool, id, status, updated_at)
            .await
            .map_err(|e| persistence_error("update application status", e))?;
    }
    let updated = state
        .applications
        .update(&id, |a| {
            a.status = status;
            a.updated_at = updated_at;
        })
        .ok_or_else(|| application_not_found(id))?;

    tracing::info!(application_id = %id, status = %status, "application reviewed");
    Ok(Json(updated))
}

/// GET /api/v1/jobs/:id/applications: Every application to one job.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}/applications",
    params(("id" = Uuid, Path, description = "Job ID"), ApplicationListQuery),
    responses(
        (status = 200, description = "One page of applications", body = ApplicationListResponse),
        (status = 403, description = "Caller does not manage the job", body = crate::error::ErrorBody),
        (status = 404, description = "Job not found", body = crate::error::ErrorBody),
    ),
    tag = "applications"
)]
async fn list_job_applications(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(job_id): Path<Uuid>,
    query: Result<Query<ApplicationListQuery>, QueryRejection>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let query = extract_query(query)?;
    let job = state
        .jobs
        .get(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("job {job_id} not found")))?;
    if !caller.can_manage_job(&job) {
        return Err(AppError::Forbidden(
            "only the posting company or an admin may list applications".into(),
        ));
    }
    let items = state.applications.filter(|a| a.job_id == job_id);
    Ok(Json(page_of(items, query)))
}
