//! # OpenAPI Document
//!
//! Collects every utoipa-annotated handler into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// OpenAPI document for the whole API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Job Board API",
        version = "0.3.0",
        description = "Users, job postings and applications with JWT authentication and role-aware request validation.",
        license(name = "MIT")
    ),
    paths(
        // Users
        crate::routes::users::register,
        crate::routes::users::login,
        crate::routes::users::me,
        crate::routes::users::update_profile,
        crate::routes::users::update_profile_details,
        crate::routes::users::update_employment,
        crate::routes::users::update_education,
        crate::routes::users::update_certifications,
        crate::routes::users::get_user,
        // Jobs
        crate::routes::jobs::list_jobs,
        crate::routes::jobs::create_job,
        crate::routes::jobs::get_job,
        crate::routes::jobs::update_job,
        crate::routes::jobs::update_job_status,
        crate::routes::jobs::delete_job,
        // Applications
        crate::routes::applications::create_application,
        crate::routes::applications::list_applications,
        crate::routes::applications::get_application,
        crate::routes::applications::update_application_status,
        crate::routes::applications::list_job_applications,
    ),
    components(schemas(
        crate::state::UserRecord,
        crate::state::ProfileDetails,
        crate::state::SocialLinks,
        crate::state::ContactInfo,
        crate::state::EmploymentEntry,
        crate::state::EducationEntry,
        crate::state::Certification,
        crate::state::JobRecord,
        crate::state::ApplicationRecord,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        // User DTOs
        crate::routes::users::RegisterRequest,
        crate::routes::users::LoginRequest,
        crate::routes::users::LoginResponse,
        crate::routes::users::UpdateProfileRequest,
        crate::routes::users::UpdateProfileDetailsRequest,
        crate::routes::users::EmploymentInput,
        crate::routes::users::UpdateEmploymentRequest,
        crate::routes::users::EducationInput,
        crate::routes::users::UpdateEducationRequest,
        crate::routes::users::CertificationInput,
        crate::routes::users::UpdateCertificationsRequest,
        // Job DTOs
        crate::routes::jobs::CreateJobRequest,
        crate::routes::jobs::UpdateJobRequest,
        crate::routes::jobs::UpdateJobStatusRequest,
        crate::routes::jobs::JobListResponse,
        // Application DTOs
        crate::routes::applications::CreateApplicationRequest,
        crate::routes::applications::UpdateApplicationStatusRequest,
        crate::routes::applications::ApplicationListResponse,
    )),
    tags(
        (name = "users", description = "Accounts, login and profiles"),
        (name = "jobs", description = "Job postings"),
        (name = "applications", description = "Applications and reviews"),
    )
)]
pub struct ApiDoc;

/// Serve the document at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
