//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! Users, jobs and applications live in in-memory stores. When a database
//! pool is configured every mutation is written through to Postgres and the
//! stores are hydrated from it at startup, so reads never leave memory.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use jobboard_core::{
    ApplicationStatus, ExperienceLevel, JobFacets, JobStatus, JobType, Role,
};
use jobboard_validate::{ContextPolicy, Validator};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::AppConfig;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// The lock is `parking_lot` and is never held across `.await`, so every
/// operation is synchronous and a panicking writer cannot poison it.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Insert `value` unless an existing record `conflicts` with it.
    ///
    /// The scan and the insert happen under one write lock, so two racing
    /// callers cannot both succeed. Returns whether the insert happened.
    pub fn insert_unless(&self, id: Uuid, value: T, conflicts: impl Fn(&T) -> bool) -> bool {
        let mut guard = self.data.write();
        if guard.values().any(conflicts) {
            return false;
        }
        guard.insert(id, value);
        true
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// First record matching `pred`.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.data.read().values().find(|v| pred(v)).cloned()
    }

    /// List all records.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// All records matching `pred`.
    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.data
            .read()
            .values()
            .filter(|v| pred(v))
            .cloned()
            .collect()
    }

    /// Update a record in place. Returns the updated record, or `None` if not found.
    pub fn update(&self, id: &Uuid, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        let entry = guard.get_mut(id)?;
        f(entry);
        Some(entry.clone())
    }

    /// Remove a record by ID.
    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Remove every record matching `pred`, returning how many went.
    pub fn remove_where(&self, pred: impl Fn(&T) -> bool) -> usize {
        let mut guard = self.data.write();
        let before = guard.len();
        guard.retain(|_, v| !pred(v));
        before - guard.len()
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Users --------------------------------------------------------------------

/// An Argon2 PHC string. `Debug` never prints it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn new(phc: String) -> Self {
        Self(phc)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordDigest([REDACTED])")
    }
}

/// Links to a user's public profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

/// Alternative contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Free-form profile details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProfileDetails {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub contact_info: ContactInfo,
}

/// One position in a user's work history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmploymentEntry {
    pub id: Uuid,
    pub company: String,
    pub title: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One degree or course of study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EducationEntry {
    pub id: Uuid,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// A professional certification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Certification {
    pub id: Uuid,
    pub name: String,
    pub authority: String,
    pub issue_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    #[serde(skip)]
    pub password_hash: PasswordDigest,
    #[schema(value_type = String, example = "job_seeker")]
    pub role: Role,
    /// Organization the user manages jobs for. Defaults to the user's own id.
    pub company_id: Uuid,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    pub verified: bool,
    pub profile: ProfileDetails,
    pub employment_history: Vec<EmploymentEntry>,
    pub education_history: Vec<EducationEntry>,
    pub certifications: Vec<Certification>,
    /// Share of profile facets filled in, 0 to 100.
    pub profile_completeness: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Recount the filled profile facets.
    pub fn recompute_completeness(&mut self) {
        let facets = [
            !self.full_name.is_empty(),
            self.phone.is_some(),
            self.resume_url.is_some(),
            !self.profile.skills.is_empty(),
            self.profile.experience.is_some(),
            self.profile.education.is_some(),
            self.profile.bio.is_some(),
            self.profile.profile_picture_url.is_some(),
            self.profile.location.is_some(),
            !self.employment_history.is_empty(),
            !self.education_history.is_empty(),
            !self.certifications.is_empty(),
        ];
        let filled = facets.iter().filter(|f| **f).count();
        self.profile_completeness = (filled * 100 / facets.len()) as u8;
    }
}

// -- Jobs ---------------------------------------------------------------------

/// A job posting.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub company_id: Uuid,
    pub location: String,
    /// Hidden from outsiders when `salary_visible` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[schema(value_type = String, example = "full-time")]
    pub job_type: JobType,
    #[schema(value_type = String, example = "senior")]
    pub experience_level: ExperienceLevel,
    pub skills: Vec<String>,
    #[schema(value_type = String, example = "active")]
    pub status: JobStatus,
    pub featured: bool,
    pub salary_visible: bool,
    pub posted_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// The searchable attributes of this job.
    pub fn facets(&self) -> JobFacets<'_> {
        JobFacets {
            location: &self.location,
            job_type: self.job_type,
            experience_level: self.experience_level,
            skills: &self.skills,
            company_id: self.company_id,
            status: self.status,
        }
    }

    /// Copy with the salary removed when it is not public.
    pub fn public_view(&self) -> Self {
        let mut view = self.clone();
        if !self.salary_visible {
            view.salary_range = None;
        }
        view
    }
}

// -- Applications -------------------------------------------------------------

/// A job seeker's application to one job.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationRecord {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub cover_letter: String,
    pub resume_url: String,
    #[schema(value_type = String, example = "pending")]
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// -- Application State --------------------------------------------------------

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub users: Store<UserRecord>,
    pub jobs: Store<JobRecord>,
    pub applications: Store<ApplicationRecord>,

    /// One validator for every request. It holds no caller state; handlers
    /// pass a fresh context per call.
    pub validator: Validator,

    /// Postgres pool. `None` runs in-memory only.
    pub db_pool: Option<PgPool>,

    pub config: AppConfig,
}

impl AppState {
    /// In-memory state with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// State for the given configuration and optional database pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        let validator = match config.validation_policy {
            ContextPolicy::FailClosed => Validator::fail_closed(),
            ContextPolicy::FailOpen => Validator::new(),
        };
        Self {
            users: Store::new(),
            jobs: Store::new(),
            applications: Store::new(),
            validator,
            db_pool,
            config,
        }
    }

    /// Load every persisted record into the in-memory stores.
    ///
    /// Called once on startup. A no-op without a database pool.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let users = crate::db::users::load_all(pool)
            .await
            .map_err(|e| format!("failed to load users: {e}"))?;
        let user_count = users.len();
        for record in users {
            self.users.insert(record.id, record);
        }

        let jobs = crate::db::jobs::load_all(pool)
            .await
            .map_err(|e| format!("failed to load jobs: {e}"))?;
        let job_count = jobs.len();
        for record in jobs {
            self.jobs.insert(record.id, record);
        }

        let applications = crate::db::applications::load_all(pool)
            .await
            .map_err(|e| format!("failed to load applications: {e}"))?;
        let application_count = applications.len();
        for record in applications {
            self.applications.insert(record.id, record);
        }

        tracing::info!(
            users = user_count,
            jobs = job_count,
            applications = application_count,
            "Hydrated in-memory stores from database"
        );

        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;

    #[test]
    fn store_basic_operations() {
        let store: Store<String> = Store::new();
        let id = Uuid::new_v4();
        assert!(store.is_empty());
        assert!(store.insert(id, "a".into()).is_none());
        assert_eq!(store.get(&id).as_deref(), Some("a"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.remove(&id).as_deref(), Some("a"));
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn update_returns_new_value() {
        let store: Store<u32> = Store::new();
        let id = Uuid::new_v4();
        store.insert(id, 1);
        assert_eq!(store.update(&id, |v| *v += 1), Some(2));
        assert_eq!(store.get(&id), Some(2));
        assert!(store.update(&Uuid::new_v4(), |v| *v += 1).is_none());
    }

    #[test]
    fn insert_unless_rejects_conflicts() {
        let store: Store<String> = Store::new();
        assert!(store.insert_unless(Uuid::new_v4(), "a@x.io".into(), |v| v == "a@x.io"));
        assert!(!store.insert_unless(Uuid::new_v4(), "a@x.io".into(), |v| v == "a@x.io"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn insert_unless_admits_one_racer() {
        let store: Store<String> = Store::new();
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let store = store.clone();
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    store.insert_unless(Uuid::new_v4(), "same".into(), |v| v == "same")
                })
            })
            .collect();
        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn remove_where_counts() {
        let store: Store<u32> = Store::new();
        for n in 0..10 {
            store.insert(Uuid::new_v4(), n);
        }
        assert_eq!(store.remove_where(|n| n % 2 == 0), 5);
        assert_eq!(store.len(), 5);
        assert_eq!(store.filter(|n| n % 2 == 0).len(), 0);
    }

    fn user() -> UserRecord {
        let now = Utc::now();
        let id = Uuid::new_v4();
        UserRecord {
            id,
            email: "jane@example.com".into(),
            password_hash: PasswordDigest::new("$argon2id$v=19$secret".into()),
            role: Role::Applicant,
            company_id: id,
            full_name: "Jane Doe".into(),
            company_name: None,
            phone: None,
            resume_url: None,
            verified: false,
            profile: ProfileDetails::default(),
            employment_history: Vec::new(),
            education_history: Vec::new(),
            certifications: Vec::new(),
            profile_completeness: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn completeness_counts_filled_facets() {
        let mut record = user();
        record.recompute_completeness();
        assert_eq!(record.profile_completeness, 8);

        record.phone = Some("+14155552671".into());
        record.resume_url = Some("https://cv.example.com/jane".into());
        record.profile.skills = vec!["rust".into()];
        record.recompute_completeness();
        assert_eq!(record.profile_completeness, 33);
    }

    #[test]
    fn user_json_never_contains_password_hash() {
        let json = serde_json::to_string(&user()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
        assert!(json.contains("\"role\":\"job_seeker\""));
    }

    #[test]
    fn password_digest_debug_is_redacted() {
        assert!(!format!("{:?}", user()).contains("secret"));
    }

    #[test]
    fn public_view_hides_private_salary() {
        let now = Utc::now();
        let job = JobRecord {
            id: Uuid::new_v4(),
            title: "Rust engineer".into(),
            description: "Build the job board".into(),
            company_id: Uuid::new_v4(),
            location: "Berlin".into(),
            salary_range: Some("80k-100k".into()),
            job_type: JobType::FullTime,
            experience_level: ExperienceLevel::Senior,
            skills: vec!["rust".into()],
            status: JobStatus::Active,
            featured: false,
            salary_visible: false,
            posted_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        assert!(job.public_view().salary_range.is_none());
        let visible = JobRecord {
            salary_visible: true,
            ..job
        };
        assert_eq!(visible.public_view().salary_range.as_deref(), Some("80k-100k"));
    }

    #[test]
    fn state_validator_follows_configured_policy() {
        assert_eq!(AppState::new().validator.policy(), ContextPolicy::FailClosed);
        let open = AppConfig {
            validation_policy: ContextPolicy::FailOpen,
            ..AppConfig::default()
        };
        assert_eq!(
            AppState::with_config(open, None).validator.policy(),
            ContextPolicy::FailOpen
        );
    }
}
