//! Job persistence operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::decode_error;
use crate::state::JobRecord;

/// Insert a new job.
pub async fn insert(pool: &PgPool, record: &JobRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO jobs (id, title, description, company_id, location, salary_range,
         job_type, experience_level, skills, status, featured, salary_visible, posted_by,
         created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
    )
    .bind(record.id)
    .bind(&record.title)
    .bind(&record.description)
    .bind(record.company_id)
    .bind(&record.location)
    .bind(&record.salary_range)
    .bind(record.job_type.as_str())
    .bind(record.experience_level.as_str())
    .bind(&record.skills)
    .bind(record.status.as_str())
    .bind(record.featured)
    .bind(record.salary_visible)
    .bind(record.posted_by)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrite every mutable attribute of a job.
pub async fn update(pool: &PgPool, record: &JobRecord) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE jobs SET title = $1, description = $2, company_id = $3, location = $4,
         salary_range = $5, job_type = $6, experience_level = $7, skills = $8, status = $9,
         featured = $10, salary_visible = $11, updated_at = $12
         WHERE id = $13",
    )
    .bind(&record.title)
    .bind(&record.description)
    .bind(record.company_id)
    .bind(&record.location)
    .bind(&record.salary_range)
    .bind(record.job_type.as_str())
    .bind(record.experience_level.as_str())
    .bind(&record.skills)
    .bind(record.status.as_str())
    .bind(record.featured)
    .bind(record.salary_visible)
    .bind(record.updated_at)
    .bind(record.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a job and its applications in one transaction.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM applications WHERE job_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

/// Load all jobs on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<JobRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, JobRow>(
        "SELECT id, title, description, company_id, location, salary_range, job_type,
         experience_level, skills, status, featured, salary_visible, posted_by,
         created_at, updated_at
         FROM jobs ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(JobRow::into_record).collect()
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    title: String,
    description: String,
    company_id: Uuid,
    location: String,
    salary_range: Option<String>,
    job_type: String,
    experience_level: String,
    skills: Vec<String>,
    status: String,
    featured: bool,
    salary_visible: bool,
    posted_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JobRow {
    fn into_record(self) -> Result<JobRecord, sqlx::Error> {
        Ok(JobRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            company_id: self.company_id,
            location: self.location,
            salary_range: self.salary_range,
            job_type: self.job_type.parse().map_err(decode_error)?,
            experience_level: self.experience_level.parse().map_err(decode_error)?,
            skills: self.skills,
            status: self.status.parse().map_err(decode_error)?,
            featured: self.featured,
            salary_visible: self.salary_visible,
            posted_by: self.posted_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
