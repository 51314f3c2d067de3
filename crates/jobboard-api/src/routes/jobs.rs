//! # Jobs API
//!
//! Job postings. Listing and lookup are public; everything else requires a
//! recruiter who belongs to the posting company, or an admin.
//!
//! ## Endpoints
//!
//! - `GET /api/v1/jobs`: search and paginate
//! - `POST /api/v1/jobs`: create a posting
//! - `GET /api/v1/jobs/:id`: one posting
//! - `PUT /api/v1/jobs/:id`: partial update
//! - `PATCH /api/v1/jobs/:id/status`: change status only
//! - `DELETE /api/v1/jobs/:id`: remove a posting and its applications
//!
//! Non-privileged callers only see `active` postings. The salary range is
//! stripped from postings with `salary_visible = false` unless the caller
//! manages the job.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::Utc;
use jobboard_core::{
    paginate, ExperienceLevel, JobFilter, JobStatus, JobType, PageMeta, PageRequest, Role,
};
use jobboard_validate::{Rule, Schema, Validate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{non_empty, persistence_error};
use crate::auth::{require_role, CallerIdentity};
use crate::db;
use crate::error::AppError;
use crate::extractors::{extract_authorized_json, extract_query};
use crate::state::{AppState, JobRecord};

// ── Request/Response DTOs ───────────────────────────────────────────

/// Request to create a job posting.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateJobRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    /// `"<min>-<max>"`, e.g. `"50000-70000"`.
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub experience_level: String,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Defaults to the caller's company.
    #[serde(default)]
    pub company_id: Option<Uuid>,
    /// Admin only.
    #[serde(default)]
    pub featured: bool,
    /// Recruiter or admin. Defaults to `true`.
    #[serde(default)]
    pub salary_visible: Option<bool>,
}

impl Validate for CreateJobRequest {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<CreateJobRequest>> = Lazy::new(|| {
            Schema::<CreateJobRequest>::builder()
                .field(
                    "title",
                    |r| r.title.as_str().into(),
                    [Rule::Required, Rule::MinLen(3), Rule::MaxLen(100)],
                )
                .field(
                    "description",
                    |r| r.description.as_str().into(),
                    [Rule::Required, Rule::MinLen(10)],
                )
                .field("location", |r| r.location.as_str().into(), [Rule::Required])
                .field(
                    "salary_range",
                    |r| r.salary_range.as_str().into(),
                    [Rule::Required, Rule::SalaryRange],
                )
                .field(
                    "job_type",
                    |r| r.job_type.as_str().into(),
                    [Rule::Required, Rule::JobType],
                )
                .field(
                    "experience_level",
                    |r| r.experience_level.as_str().into(),
                    [Rule::Required, Rule::ExperienceLevel],
                )
                .field(
                    "skills",
                    |r| r.skills.as_slice().into(),
                    [Rule::Required, Rule::MaxLen(50), Rule::ItemsRequired],
                )
                .field("company_id", |r| r.company_id.into(), [Rule::SameCompany])
                .field("featured", |r| r.featured.into(), [Rule::AdminOnly])
                .field("salary_visible", |r| r.salary_visible.into(), [Rule::RecruiterOnly])
                .build()
        });
        &SCHEMA
    }
}

/// Partial update of a job posting. Absent or empty fields are unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateJobRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<String>,
    /// Admin only.
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub salary_visible: Option<bool>,
}

impl Validate for UpdateJobRequest {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<UpdateJobRequest>> = Lazy::new(|| {
            Schema::<UpdateJobRequest>::builder()
                .field(
                    "title",
                    |r| r.title.as_deref().into(),
                    [Rule::MinLen(3), Rule::MaxLen(100)],
                )
                .field("description", |r| r.description.as_deref().into(), [Rule::MinLen(10)])
                .field("location", |r| r.location.as_deref().into(), [Rule::MaxLen(100)])
                .field(
                    "salary_range",
                    |r| r.salary_range.as_deref().into(),
                    [Rule::SalaryRange],
                )
                .field("job_type", |r| r.job_type.as_deref().into(), [Rule::JobType])
                .field(
                    "experience_level",
                    |r| r.experience_level.as_deref().into(),
                    [Rule::ExperienceLevel],
                )
                .field(
                    "skills",
                    |r| r.skills.as_deref().into(),
                    [Rule::MaxLen(50), Rule::ItemsRequired],
                )
                .field("status", |r| r.status.as_deref().into(), [Rule::JobStatus])
                .field("featured", |r| r.featured.into(), [Rule::AdminOnly])
                .field("salary_visible", |r| r.salary_visible.into(), [Rule::RecruiterOnly])
                .build()
        });
        &SCHEMA
    }
}

/// Status change.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateJobStatusRequest {
    /// `active`, `inactive`, `closed` or `draft`.
    #[serde(default)]
    pub status: String,
}

impl Validate for UpdateJobStatusRequest {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<UpdateJobStatusRequest>> = Lazy::new(|| {
            Schema::<UpdateJobStatusRequest>::builder()
                .field(
                    "status",
                    |r| r.status.as_str().into(),
                    [Rule::Required, Rule::JobStatus],
                )
                .build()
        });
        &SCHEMA
    }
}

/// Search parameters for `GET /api/v1/jobs`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JobListQuery {
    /// Exact location, case-insensitive.
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    /// Comma separated; a job matches if it lists any of them.
    pub skills: Option<String>,
    pub company_id: Option<String>,
    pub status: Option<String>,
    /// 1-based page number.
    pub page: Option<i64>,
    /// Items per page, at most 100.
    pub page_size: Option<i64>,
}

impl Validate for JobListQuery {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<JobListQuery>> = Lazy::new(|| {
            Schema::<JobListQuery>::builder()
                .field("job_type", |q| q.job_type.as_deref().into(), [Rule::JobType])
                .field(
                    "experience_level",
                    |q| q.experience_level.as_deref().into(),
                    [Rule::ExperienceLevel],
                )
                .field("company_id", |q| q.company_id.as_deref().into(), [Rule::Uuid])
                .field("status", |q| q.status.as_deref().into(), [Rule::JobStatus])
                .build()
        });
        &SCHEMA
    }
}

impl JobListQuery {
    /// Turn the checked parameters into a search filter.
    fn to_filter(&self) -> Result<JobFilter, AppError> {
        let company_id = match non_empty(self.company_id.clone()) {
            Some(raw) => Some(
                raw.parse::<Uuid>()
                    .map_err(|e| AppError::BadRequest(format!("company_id: {e}")))?,
            ),
            None => None,
        };
        Ok(JobFilter {
            location: non_empty(self.location.clone()),
            job_type: non_empty(self.job_type.clone())
                .map(|v| v.parse::<JobType>())
                .transpose()?,
            experience_level: non_empty(self.experience_level.clone())
                .map(|v| v.parse::<ExperienceLevel>())
                .transpose()?,
            skills: self
                .skills
                .as_deref()
                .map(JobFilter::parse_skills)
                .unwrap_or_default(),
            company_id,
            status: non_empty(self.status.clone())
                .map(|v| v.parse::<JobStatus>())
                .transpose()?,
        })
    }
}

/// One page of search results.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobListResponse {
    pub data: Vec<JobRecord>,
    /// `{total, page, page_size, total_page}`.
    #[schema(value_type = Object)]
    pub meta: PageMeta,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the jobs router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/jobs", get(list_jobs).post(create_job))
        .route(
            "/api/v1/jobs/:id",
            get(get_job).put(update_job).delete(delete_job),
        )
        .route("/api/v1/jobs/:id/status", patch(update_job_status))
}

// ── Helpers ─────────────────────────────────────────────────────────

fn job_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("job {id} not found"))
}

/// Whether `caller` may see `job` at all.
fn is_visible(job: &JobRecord, caller: Option<&CallerIdentity>) -> bool {
    job.status == JobStatus::Active || caller.is_some_and(|c| c.can_manage_job(job))
}

/// The job as `caller` should see it.
fn view_for(job: &JobRecord, caller: Option<&CallerIdentity>) -> JobRecord {
    if caller.is_some_and(|c| c.can_manage_job(job)) {
        job.clone()
    } else {
        job.public_view()
    }
}

/// Load `id` and check that `caller` manages it.
fn owned_job(state: &AppState, caller: &CallerIdentity, id: Uuid) -> Result<JobRecord, AppError> {
    let job = state.jobs.get(&id).ok_or_else(|| job_not_found(id))?;
    if !caller.can_manage_job(&job) {
        tracing::warn!(job_id = %id, user_id = %caller.user_id, "job ownership check failed");
        return Err(AppError::Forbidden(
            "only the posting company or an admin may modify this job".into(),
        ));
    }
    Ok(job)
}

/// Write `job` to the database, then to the store.
async fn save_job(state: &AppState, job: JobRecord) -> Result<JobRecord, AppError> {
    if let Some(pool) = &state.db_pool {
        db::jobs::update(pool, &job)
            .await
            .map_err(|e| persistence_error("update job", e))?;
    }
    state.jobs.insert(job.id, job.clone());
    Ok(job)
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /api/v1/jobs: Search job postings.
#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    params(JobListQuery),
    responses(
        (status = 200, description = "One page of postings", body = JobListResponse),
        (status = 422, description = "Invalid filter", body = crate::error::ErrorBody),
    ),
    tag = "jobs"
)]
async fn list_jobs(
    State(state): State<AppState>,
    caller: Option<CallerIdentity>,
    query: Result<Query<JobListQuery>, QueryRejection>,
) -> Result<Json<JobListResponse>, AppError> {
    let query = extract_query(query)?;
    state.validator.check(JobListQuery::schema(), &query, None).into_result()?;
    let filter = query.to_filter()?;
    let page = PageRequest::new(query.page, query.page_size);

    let mut jobs: Vec<JobRecord> = state
        .jobs
        .filter(|job| is_visible(job, caller.as_ref()) && filter.matches(&job.facets()))
        .iter()
        .map(|job| view_for(job, caller.as_ref()))
        .collect();
    jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

    let (data, meta) = paginate(jobs, page);
    Ok(Json(JobListResponse { data, meta }))
}

/// POST /api/v1/jobs: Create a job posting.
#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Posting created", body = JobRecord),
        (status = 403, description = "Caller is not a recruiter", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "jobs"
)]
async fn create_job(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JobRecord>), AppError> {
    require_role(&caller, Role::Recruiter)?;
    let req = extract_authorized_json(body, &state.validator, &caller)?;

    let now = Utc::now();
    let job = JobRecord {
        id: Uuid::new_v4(),
        title: req.title,
        description: req.description,
        company_id: req.company_id.unwrap_or(caller.company_id),
        location: req.location,
        salary_range: Some(req.salary_range),
        job_type: req.job_type.parse()?,
        experience_level: req.experience_level.parse()?,
        skills: req.skills.into_iter().map(|s| s.trim().to_string()).collect(),
        status: JobStatus::Active,
        featured: req.featured,
        salary_visible: req.salary_visible.unwrap_or(true),
        posted_by: caller.user_id,
        created_at: now,
        updated_at: now,
    };

    state.jobs.insert(job.id, job.clone());
    if let Some(pool) = &state.db_pool {
        if let Err(e) = db::jobs::insert(pool, &job).await {
            state.jobs.remove(&job.id);
            return Err(persistence_error("insert job", e));
        }
    }

    tracing::info!(job_id = %job.id, company_id = %job.company_id, "job created");
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs/:id: One job posting.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Posting found", body = JobRecord),
        (status = 404, description = "Posting not found", body = crate::error::ErrorBody),
    ),
    tag = "jobs"
)]
async fn get_job(
    State(state): State<AppState>,
    caller: Option<CallerIdentity>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRecord>, AppError> {
    let job = state
        .jobs
        .get(&id)
        .filter(|job| is_visible(job, caller.as_ref()))
        .ok_or_else(|| job_not_found(id))?;
    Ok(Json(view_for(&job, caller.as_ref())))
}

/// PUT /api/v1/jobs/:id: Update a job posting.
#[utoipa::path(
    put,
    path = "/api/v1/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Posting updated", body = JobRecord),
        (status = 403, description = "Caller does not manage this job", body = crate::error::ErrorBody),
        (status = 404, description = "Posting not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "jobs"
)]
async fn update_job(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateJobRequest>, JsonRejection>,
) -> Result<Json<JobRecord>, AppError> {
    let req = extract_authorized_json(body, &state.validator, &caller)?;
    let mut job = owned_job(&state, &caller, id)?;

    if let Some(title) = non_empty(req.title) {
        job.title = title;
    }
    if let Some(description) = non_empty(req.description) {
        job.description = description;
    }
    if let Some(location) = non_empty(req.location) {
        job.location = location;
    }
    if let Some(range) = non_empty(req.salary_range) {
        job.salary_range = Some(range);
    }
    if let Some(job_type) = non_empty(req.job_type) {
        job.job_type = job_type.parse()?;
    }
    if let Some(level) = non_empty(req.experience_level) {
        job.experience_level = level.parse()?;
    }
    if let Some(skills) = req.skills.filter(|s| !s.is_empty()) {
        job.skills = skills.into_iter().map(|s| s.trim().to_string()).collect();
    }
    if let Some(status) = non_empty(req.status) {
        job.status = status.parse()?;
    }
    if let Some(visible) = req.salary_visible {
        job.salary_visible = visible;
    }
    if caller.is_admin() {
        if let Some(featured) = req.featured {
            job.featured = featured;
        }
    }
    job.updated_at = Utc::now();

    let job = save_job(&state, job).await?;
    tracing::info!(job_id = %id, "job updated");
    Ok(Json(job))
}

/// PATCH /api/v1/jobs/:id/status: Change a posting's status.
#[utoipa::path(
    patch,
    path = "/api/v1/jobs/{id}/status",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = UpdateJobStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = JobRecord),
        (status = 403, description = "Caller does not manage this job", body = crate::error::ErrorBody),
        (status = 404, description = "Posting not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "jobs"
)]
async fn update_job_status(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateJobStatusRequest>, JsonRejection>,
) -> Result<Json<JobRecord>, AppError> {
    let req = extract_authorized_json(body, &state.validator, &caller)?;
    let mut job = owned_job(&state, &caller, id)?;

    let previous = job.status;
    job.status = req.status.parse()?;
    job.updated_at = Utc::now();

    let job = save_job(&state, job).await?;
    tracing::info!(job_id = %id, from = %previous, to = %job.status, "job status changed");
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id: Remove a posting and its applications.
#[utoipa::path(
    delete,
    path = "/api/v1/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Posting deleted"),
        (status = 403, description = "Caller does not manage this job", body = crate::error::ErrorBody),
        (status = 404, description = "Posting not found", body = crate::error::ErrorBody),
    ),
    tag = "jobs"
)]
async fn delete_job(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    owned_job(&state, &caller, id)?;

    if let Some(pool) = &state.db_pool {
        db::jobs::delete(pool, id)
            .await
            .map_err(|e| persistence_error("delete job", e))?;
    }
    state.jobs.remove(&id);
    let removed = state.applications.remove_where(|a| a.job_id == id);

    tracing::info!(job_id = %id, applications = removed, "job deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard_validate::{ValidationContext, Validator};

    fn recruiter() -> CallerIdentity {
        let id = Uuid::new_v4();
        CallerIdentity {
            user_id: id,
            role: Role::Recruiter,
            company_id: id,
        }
    }

    fn job(company_id: Uuid, status: JobStatus, salary_visible: bool) -> JobRecord {
        let now = Utc::now();
        JobRecord {
            id: Uuid::new_v4(),
            title: "Backend Engineer".into(),
            description: "Build and run the job board API.".into(),
            company_id,
            location: "Berlin".into(),
            salary_range: Some("60000-80000".into()),
            job_type: JobType::FullTime,
            experience_level: ExperienceLevel::Senior,
            skills: vec!["rust".into()],
            status,
            featured: false,
            salary_visible,
            posted_by: company_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn valid_create() -> CreateJobRequest {
        CreateJobRequest {
            title: "Backend Engineer".into(),
            description: "Build and run the job board API.".into(),
            location: "Berlin".into(),
            salary_range: "60000-80000".into(),
            job_type: "full-time".into(),
            experience_level: "senior".into(),
            skills: vec!["rust".into(), "postgres".into()],
            ..Default::default()
        }
    }

    #[test]
    fn create_accepts_a_complete_request() {
        let caller = recruiter();
        assert!(Validator::fail_closed()
            .validate_with_role(&valid_create(), &caller.validation_context())
            .is_ok());
    }

    #[test]
    fn featured_needs_admin() {
        let caller = recruiter();
        let req = CreateJobRequest {
            featured: true,
            ..valid_create()
        };
        let errors = Validator::fail_closed()
            .validate_with_role(&req, &caller.validation_context())
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.as_slice()[0].field, "featured");
    }

    #[test]
    fn foreign_company_is_rejected_for_recruiters() {
        let caller = recruiter();
        let req = CreateJobRequest {
            company_id: Some(Uuid::new_v4()),
            ..valid_create()
        };
        let errors = Validator::fail_closed()
            .validate_with_role(&req, &caller.validation_context())
            .unwrap_err();
        assert_eq!(errors.for_field("company_id").count(), 1);

        let admin = ValidationContext::new(Role::Admin, Uuid::new_v4(), Uuid::new_v4());
        assert!(Validator::fail_closed().validate_with_role(&req, &admin).is_ok());
    }

    #[test]
    fn blank_skill_is_rejected() {
        let req = CreateJobRequest {
            skills: vec!["rust".into(), "  ".into()],
            ..valid_create()
        };
        let errors = Validator::new().validate(&req).unwrap_err();
        assert_eq!(errors.for_field("skills").count(), 1);
    }

    #[test]
    fn query_builds_filter() {
        let company = Uuid::new_v4();
        let query = JobListQuery {
            job_type: Some("Full-Time".into()),
            skills: Some("rust, go,".into()),
            company_id: Some(company.to_string()),
            location: Some(String::new()),
            ..Default::default()
        };
        assert!(Validator::new().validate(&query).is_ok());
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.job_type, Some(JobType::FullTime));
        assert_eq!(filter.skills, vec!["rust".to_string(), "go".to_string()]);
        assert_eq!(filter.company_id, Some(company));
        assert!(filter.location.is_none());
    }

    #[test]
    fn drafts_are_hidden_from_outsiders() {
        let owner = recruiter();
        let draft = job(owner.company_id, JobStatus::Draft, true);
        assert!(!is_visible(&draft, None));
        assert!(!is_visible(&draft, Some(&recruiter())));
        assert!(is_visible(&draft, Some(&owner)));
    }

    #[test]
    fn hidden_salary_is_shown_only_to_managers() {
        let owner = recruiter();
        let posting = job(owner.company_id, JobStatus::Active, false);
        assert!(view_for(&posting, None).salary_range.is_none());
        assert!(view_for(&posting, Some(&recruiter())).salary_range.is_none());
        assert_eq!(
            view_for(&posting, Some(&owner)).salary_range.as_deref(),
            Some("60000-80000")
        );
    }
}
