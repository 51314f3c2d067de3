//! # Roles
//!
//! The three account roles of the job board, ordered by privilege.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Account roles, ordered by privilege level.
///
/// The `Ord` derivation respects variant declaration order:
/// `Applicant < Recruiter < Admin`. This enables `>=` comparison for
/// "at least" checks. Applicants serialize as `job_seeker`, the name used
/// on the wire and in stored records; `applicant` is accepted as an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Job seeker: manages their own profile and applications.
    #[serde(rename = "job_seeker", alias = "applicant")]
    Applicant,
    /// Posts and manages jobs on behalf of their company.
    Recruiter,
    /// Full access to every resource.
    Admin,
}

impl Role {
    /// Return the wire representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applicant => "job_seeker",
            Self::Recruiter => "recruiter",
            Self::Admin => "admin",
        }
    }

    /// Whether this role is at least as privileged as `minimum`.
    pub fn at_least(&self, minimum: Role) -> bool {
        *self >= minimum
    }

    /// Whether this is the administrator role.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "job_seeker" | "applicant" => Ok(Self::Applicant),
            "recruiter" => Ok(Self::Recruiter),
            "admin" => Ok(Self::Admin),
            _ => Err(CoreError::UnknownRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ordering_is_correct() {
        assert!(Role::Applicant < Role::Recruiter);
        assert!(Role::Recruiter < Role::Admin);
    }

    #[test]
    fn at_least_respects_privilege() {
        assert!(Role::Admin.at_least(Role::Recruiter));
        assert!(Role::Admin.at_least(Role::Admin));
        assert!(Role::Recruiter.at_least(Role::Recruiter));
        assert!(!Role::Recruiter.at_least(Role::Admin));
        assert!(!Role::Applicant.at_least(Role::Recruiter));
    }

    #[test]
    fn role_as_str() {
        assert_eq!(Role::Applicant.as_str(), "job_seeker");
        assert_eq!(Role::Recruiter.as_str(), "recruiter");
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn parse_accepts_alias_and_any_case() {
        assert_eq!("applicant".parse::<Role>().unwrap(), Role::Applicant);
        assert_eq!("JOB_SEEKER".parse::<Role>().unwrap(), Role::Applicant);
        assert_eq!("Recruiter".parse::<Role>().unwrap(), Role::Recruiter);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Applicant).unwrap(), "\"job_seeker\"");
        let role: Role = serde_json::from_str("\"applicant\"").unwrap();
        assert_eq!(role, Role::Applicant);
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
