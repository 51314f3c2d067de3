//! # Domain Vocabularies
//!
//! Closed word lists for jobs and applications. Each enum parses
//! case-insensitively and serializes to its lowercase wire name.
//!
//! The `ALL` constants are the single source of truth for what is
//! accepted: the request validation rules call [`FromStr`] on these types
//! instead of keeping their own lists.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Look up `input` case-insensitively among `(wire name, variant)` pairs.
fn lookup<T: Copy>(
    table: &[(&'static str, T)],
    input: &str,
    kind: &'static str,
    expected: &'static str,
) -> Result<T, CoreError> {
    let lowered = input.to_ascii_lowercase();
    table
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, value)| *value)
        .ok_or_else(|| CoreError::UnknownVariant {
            kind,
            value: input.to_string(),
            expected,
        })
}

// ---------------------------------------------------------------------------
// Job type
// ---------------------------------------------------------------------------

/// Employment arrangement of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    /// `full-time`
    #[serde(rename = "full-time")]
    FullTime,
    /// `part-time`
    #[serde(rename = "part-time")]
    PartTime,
    /// `contract`
    #[serde(rename = "contract")]
    Contract,
    /// `internship`
    #[serde(rename = "internship")]
    Internship,
    /// `freelance`
    #[serde(rename = "freelance")]
    Freelance,
    /// `remote`
    #[serde(rename = "remote")]
    Remote,
}

impl JobType {
    /// Every job type with its wire name.
    pub const ALL: [(&'static str, JobType); 6] = [
        ("full-time", Self::FullTime),
        ("part-time", Self::PartTime),
        ("contract", Self::Contract),
        ("internship", Self::Internship),
        ("freelance", Self::Freelance),
        ("remote", Self::Remote),
    ];

    /// Human-readable list of accepted values.
    pub const EXPECTED: &'static str = "full-time, part-time, contract, internship, freelance, remote";

    /// Return the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Contract => "contract",
            Self::Internship => "internship",
            Self::Freelance => "freelance",
            Self::Remote => "remote",
        }
    }
}

impl FromStr for JobType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(&Self::ALL, s, "job type", Self::EXPECTED)
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Experience level
// ---------------------------------------------------------------------------

/// Seniority a job posting targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    /// `entry`
    Entry,
    /// `junior`
    Junior,
    /// `mid`
    Mid,
    /// `senior`
    Senior,
    /// `lead`
    Lead,
    /// `executive`
    Executive,
}

impl ExperienceLevel {
    /// Every experience level with its wire name.
    pub const ALL: [(&'static str, ExperienceLevel); 6] = [
        ("entry", Self::Entry),
        ("junior", Self::Junior),
        ("mid", Self::Mid),
        ("senior", Self::Senior),
        ("lead", Self::Lead),
        ("executive", Self::Executive),
    ];

    /// Human-readable list of accepted values.
    pub const EXPECTED: &'static str = "entry, junior, mid, senior, lead, executive";

    /// Return the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Junior => "junior",
            Self::Mid => "mid",
            Self::Senior => "senior",
            Self::Lead => "lead",
            Self::Executive => "executive",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(&Self::ALL, s, "experience level", Self::EXPECTED)
    }
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Job status
// ---------------------------------------------------------------------------

/// Publication status of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Visible and accepting applications.
    Active,
    /// Hidden but not closed.
    Inactive,
    /// No longer accepting applications.
    Closed,
    /// Not yet published.
    Draft,
}

impl JobStatus {
    /// Every job status with its wire name.
    pub const ALL: [(&'static str, JobStatus); 4] = [
        ("active", Self::Active),
        ("inactive", Self::Inactive),
        ("closed", Self::Closed),
        ("draft", Self::Draft),
    ];

    /// Human-readable list of accepted values.
    pub const EXPECTED: &'static str = "active, inactive, closed, draft";

    /// Return the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Closed => "closed",
            Self::Draft => "draft",
        }
    }

    /// Whether applications may be submitted against a job in this status.
    pub fn accepts_applications(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl FromStr for JobStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(&Self::ALL, s, "job status", Self::EXPECTED)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Application status
// ---------------------------------------------------------------------------

/// Review status of a job application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    /// Submitted, not yet looked at.
    Pending,
    /// Seen by the recruiter.
    Reviewed,
    /// Offer extended.
    Accepted,
    /// Declined.
    Rejected,
}

impl ApplicationStatus {
    /// Every application status with its wire name.
    pub const ALL: [(&'static str, ApplicationStatus); 4] = [
        ("pending", Self::Pending),
        ("reviewed", Self::Reviewed),
        ("accepted", Self::Accepted),
        ("rejected", Self::Rejected),
    ];

    /// Human-readable list of accepted values.
    pub const EXPECTED: &'static str = "pending, reviewed, accepted, rejected";

    /// Return the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(&Self::ALL, s, "application status", Self::EXPECTED)
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_type_parses_case_insensitively() {
        assert_eq!("REMOTE".parse::<JobType>().unwrap(), JobType::Remote);
        assert_eq!("Full-Time".parse::<JobType>().unwrap(), JobType::FullTime);
        assert!("onsite".parse::<JobType>().is_err());
    }

    #[test]
    fn job_type_rejects_surrounding_whitespace() {
        assert!(" remote".parse::<JobType>().is_err());
    }

    #[test]
    fn experience_level_parses() {
        assert_eq!("Senior".parse::<ExperienceLevel>().unwrap(), ExperienceLevel::Senior);
        assert!("principal".parse::<ExperienceLevel>().is_err());
    }

    #[test]
    fn experience_levels_are_ordered() {
        assert!(ExperienceLevel::Entry < ExperienceLevel::Junior);
        assert!(ExperienceLevel::Lead < ExperienceLevel::Executive);
    }

    #[test]
    fn application_status_parses() {
        assert_eq!(
            "ACCEPTED".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Accepted
        );
        assert!("withdrawn".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn job_status_accepts_applications_only_when_active() {
        assert!(JobStatus::Active.accepts_applications());
        assert!(!JobStatus::Draft.accepts_applications());
        assert!(!JobStatus::Closed.accepts_applications());
        assert!(!JobStatus::Inactive.accepts_applications());
    }

    #[test]
    fn as_str_matches_all_table() {
        for (name, value) in JobType::ALL {
            assert_eq!(value.as_str(), name);
        }
        for (name, value) in ExperienceLevel::ALL {
            assert_eq!(value.as_str(), name);
        }
        for (name, value) in JobStatus::ALL {
            assert_eq!(value.as_str(), name);
        }
        for (name, value) in ApplicationStatus::ALL {
            assert_eq!(value.as_str(), name);
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&JobType::PartTime).unwrap(), "\"part-time\"");
        assert_eq!(serde_json::to_string(&JobStatus::Draft).unwrap(), "\"draft\"");
        let level: ExperienceLevel = serde_json::from_str("\"mid\"").unwrap();
        assert_eq!(level, ExperienceLevel::Mid);
    }

    #[test]
    fn parse_error_carries_context() {
        let err = "onsite".parse::<JobType>().unwrap_err();
        match err {
            CoreError::UnknownVariant { kind, value, .. } => {
                assert_eq!(kind, "job type");
                assert_eq!(value, "onsite");
            }
            other => panic!("expected UnknownVariant, got {other:?}"),
        }
    }
}
