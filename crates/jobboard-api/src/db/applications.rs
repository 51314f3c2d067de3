//! Application persistence operations.

use chrono::{DateTime, Utc};
use jobboard_core::ApplicationStatus;
use sqlx::PgPool;
use uuid::Uuid;

use super::decode_error;
use crate::state::ApplicationRecord;

/// Insert a new application.
pub async fn insert(pool: &PgPool, record: &ApplicationRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO applications (id, job_id, applicant_id, cover_letter, resume_url,
         status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(record.id)
    .bind(record.job_id)
    .bind(record.applicant_id)
    .bind(&record.cover_letter)
    .bind(&record.resume_url)
    .bind(record.status.as_str())
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update application status.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: ApplicationStatus,
    updated_at: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE applications SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(status.as_str())
        .bind(updated_at)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all applications on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<ApplicationRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ApplicationRow>(
        "SELECT id, job_id, applicant_id, cover_letter, resume_url, status,
         created_at, updated_at
         FROM applications ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ApplicationRow::into_record).collect()
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: Uuid,
    job_id: Uuid,
    applicant_id: Uuid,
    cover_letter: String,
    resume_url: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ApplicationRow {
    fn into_record(self) -> Result<ApplicationRecord, sqlx::Error> {
        Ok(ApplicationRecord {
            id: self.id,
            job_id: self.job_id,
            applicant_id: self.applicant_id,
            cover_letter: self.cover_letter,
            resume_url: self.resume_url,
            status: self.status.parse().map_err(decode_error)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
