//! User persistence operations.
//!
//! Scalar attributes are columns; the profile and the three history lists
//! are stored together in the `details` JSONB column.

use chrono::{DateTime, Utc};
use jobboard_core::Role;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::decode_error;
use crate::state::{
    Certification, EducationEntry, EmploymentEntry, PasswordDigest, ProfileDetails, UserRecord,
};

/// Shape of the `details` column.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredDetails {
    #[serde(default)]
    profile: ProfileDetails,
    #[serde(default)]
    employment_history: Vec<EmploymentEntry>,
    #[serde(default)]
    education_history: Vec<EducationEntry>,
    #[serde(default)]
    certifications: Vec<Certification>,
}

impl StoredDetails {
    fn of(record: &UserRecord) -> Self {
        Self {
            profile: record.profile.clone(),
            employment_history: record.employment_history.clone(),
            education_history: record.education_history.clone(),
            certifications: record.certifications.clone(),
        }
    }
}

/// Insert a new user.
pub async fn insert(pool: &PgPool, record: &UserRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, email, password_hash, role, company_id, full_name,
         company_name, phone, resume_url, verified, details, profile_completeness,
         created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
    )
    .bind(record.id)
    .bind(&record.email)
    .bind(record.password_hash.as_str())
    .bind(record.role.as_str())
    .bind(record.company_id)
    .bind(&record.full_name)
    .bind(&record.company_name)
    .bind(&record.phone)
    .bind(&record.resume_url)
    .bind(record.verified)
    .bind(Json(StoredDetails::of(record)))
    .bind(i16::from(record.profile_completeness))
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrite every mutable attribute of a user.
pub async fn update(pool: &PgPool, record: &UserRecord) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET role = $1, company_id = $2, full_name = $3, company_name = $4,
         phone = $5, resume_url = $6, verified = $7, details = $8,
         profile_completeness = $9, updated_at = $10
         WHERE id = $11",
    )
    .bind(record.role.as_str())
    .bind(record.company_id)
    .bind(&record.full_name)
    .bind(&record.company_name)
    .bind(&record.phone)
    .bind(&record.resume_url)
    .bind(record.verified)
    .bind(Json(StoredDetails::of(record)))
    .bind(i16::from(record.profile_completeness))
    .bind(record.updated_at)
    .bind(record.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all users on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<UserRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, role, company_id, full_name, company_name,
         phone, resume_url, verified, details, profile_completeness, created_at, updated_at
         FROM users ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(UserRow::into_record).collect()
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    company_id: Uuid,
    full_name: String,
    company_name: Option<String>,
    phone: Option<String>,
    resume_url: Option<String>,
    verified: bool,
    details: Json<StoredDetails>,
    profile_completeness: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_record(self) -> Result<UserRecord, sqlx::Error> {
        let role: Role = self.role.parse().map_err(decode_error)?;
        let Json(details) = self.details;
        Ok(UserRecord {
            id: self.id,
            email: self.email,
            password_hash: PasswordDigest::new(self.password_hash),
            role,
            company_id: self.company_id,
            full_name: self.full_name,
            company_name: self.company_name,
            phone: self.phone,
            resume_url: self.resume_url,
            verified: self.verified,
            profile: details.profile,
            employment_history: details.employment_history,
            education_history: details.education_history,
            certifications: details.certifications,
            profile_completeness: self.profile_completeness.clamp(0, 100) as u8,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
