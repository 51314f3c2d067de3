//! # Job Search Filter
//!
//! Every criterion is optional; an empty filter matches every job. Text
//! criteria compare case-insensitively. A skills criterion matches when the
//! job lists at least one of the requested skills.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ExperienceLevel, JobStatus, JobType};

/// The searchable attributes of a job, borrowed from whatever record type
/// stores it.
#[derive(Debug, Clone, Copy)]
pub struct JobFacets<'a> {
    /// Free-text location, e.g. "Berlin".
    pub location: &'a str,
    /// Employment arrangement.
    pub job_type: JobType,
    /// Target seniority.
    pub experience_level: ExperienceLevel,
    /// Skill tags.
    pub skills: &'a [String],
    /// Owning company.
    pub company_id: Uuid,
    /// Publication status.
    pub status: JobStatus,
}

/// Search criteria for job listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilter {
    /// Exact location, compared case-insensitively.
    pub location: Option<String>,
    /// Required job type.
    pub job_type: Option<JobType>,
    /// Required experience level.
    pub experience_level: Option<ExperienceLevel>,
    /// Any-overlap skill match. Empty means no constraint.
    pub skills: Vec<String>,
    /// Required owning company.
    pub company_id: Option<Uuid>,
    /// Required status.
    pub status: Option<JobStatus>,
}

impl JobFilter {
    /// Whether this filter places no constraint at all.
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.job_type.is_none()
            && self.experience_level.is_none()
            && self.skills.is_empty()
            && self.company_id.is_none()
            && self.status.is_none()
    }

    /// Split a comma-separated skills parameter, dropping blank entries.
    pub fn parse_skills(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Whether `job` satisfies every criterion.
    pub fn matches(&self, job: &JobFacets<'_>) -> bool {
        if let Some(location) = &self.location {
            if !location.eq_ignore_ascii_case(job.location) {
                return false;
            }
        }
        if self.job_type.is_some_and(|t| t != job.job_type) {
            return false;
        }
        if self
            .experience_level
            .is_some_and(|l| l != job.experience_level)
        {
            return false;
        }
        if self.company_id.is_some_and(|c| c != job.company_id) {
            return false;
        }
        if self.status.is_some_and(|s| s != job.status) {
            return false;
        }
        if !self.skills.is_empty() {
            let overlap = self
                .skills
                .iter()
                .any(|wanted| job.skills.iter().any(|have| have.eq_ignore_ascii_case(wanted)));
            if !overlap {
                return false;
            }
        }
        true
    }
}
