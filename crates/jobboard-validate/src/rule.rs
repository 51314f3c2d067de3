//! # Rules
//!
//! The closed set of constraints a field can declare. Shape rules check
//! presence and length, format rules check a value's syntax, and role rules
//! check the value against the caller. Rules also parse from the compact
//! tag syntax `required,min=3,max=100`; a name outside the set parses to
//! [`Rule::Unknown`], which always fails with a generic message instead of
//! being silently ignored.

use std::str::FromStr;

use crate::context::ValidationContext;
use crate::error::RuleParseError;
use crate::formats;
use crate::policy;
use crate::schema::FieldValue;

/// Which family a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Presence and length.
    Shape,
    /// Context-free syntax.
    Format,
    /// Depends on the caller context.
    Role,
    /// Not a recognized rule.
    Unknown,
}

/// A single constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Value must not be absent or the zero value.
    Required,
    /// At least `n` characters, or `n` items for a list.
    MinLen(usize),
    /// At most `n` characters, or `n` items for a list.
    MaxLen(usize),
    /// Every list item must be non-blank.
    ItemsRequired,
    /// Email address.
    Email,
    /// Strong password.
    Password,
    /// Phone number.
    Phone,
    /// UUID string.
    Uuid,
    /// Job type vocabulary.
    JobType,
    /// Experience level vocabulary.
    ExperienceLevel,
    /// Application status vocabulary.
    ApplicationStatus,
    /// Job status vocabulary.
    JobStatus,
    /// http(s) URL.
    Url,
    /// Salary range such as `50k-75k`.
    SalaryRange,
    /// Settable only by administrators.
    AdminOnly,
    /// Settable only by recruiters and administrators.
    RecruiterOnly,
    /// Must name the caller.
    SameUser,
    /// Must name the caller's organization.
    SameCompany,
    /// An unrecognized rule name.
    Unknown(String),
}

impl Rule {
    /// The rule's tag name.
    pub fn name(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::MinLen(_) => "min",
            Self::MaxLen(_) => "max",
            Self::ItemsRequired => "items_required",
            Self::Email => "email",
            Self::Password => "password",
            Self::Phone => "phone",
            Self::Uuid => "uuid",
            Self::JobType => "job_type",
            Self::ExperienceLevel => "experience_level",
            Self::ApplicationStatus => "application_status",
            Self::JobStatus => "job_status",
            Self::Url => "url",
            Self::SalaryRange => "salary_range",
            Self::AdminOnly => "admin_only",
            Self::RecruiterOnly => "recruiter_only",
            Self::SameUser => "same_user",
            Self::SameCompany => "same_company",
            Self::Unknown(name) => name,
        }
    }

    /// The rule's family.
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Required | Self::MinLen(_) | Self::MaxLen(_) | Self::ItemsRequired => {
                RuleKind::Shape
            }
            Self::Email
            | Self::Password
            | Self::Phone
            | Self::Uuid
            | Self::JobType
            | Self::ExperienceLevel
            | Self::ApplicationStatus
            | Self::JobStatus
            | Self::Url
            | Self::SalaryRange => RuleKind::Format,
            Self::AdminOnly | Self::RecruiterOnly | Self::SameUser | Self::SameCompany => {
                RuleKind::Role
            }
            Self::Unknown(_) => RuleKind::Unknown,
        }
    }

    /// Whether the rule consults the caller context.
    pub fn is_role_rule(&self) -> bool {
        self.kind() == RuleKind::Role
    }

    /// Evaluate the rule against one value.
    ///
    /// Format rules applied to a list check every item. Format rules on a
    /// value of the wrong shape (a flag, an id) fail, except [`Rule::Uuid`]
    /// which accepts an id as-is.
    pub fn evaluate(&self, value: &FieldValue<'_>, ctx: Option<&ValidationContext>) -> bool {
        match self {
            Self::Required => !value.is_default(),
            Self::MinLen(n) => length(value).is_some_and(|len| len >= *n),
            Self::MaxLen(n) => length(value).is_some_and(|len| len <= *n),
            Self::ItemsRequired => match value {
                FieldValue::List(items) => items.iter().all(|s| !s.trim().is_empty()),
                _ => true,
            },
            Self::Email => text_check(value, formats::is_email),
            Self::Password => text_check(value, formats::is_strong_password),
            Self::Phone => text_check(value, formats::is_phone),
            Self::Uuid => match value {
                FieldValue::Id(_) => true,
                other => text_check(other, formats::is_uuid),
            },
            Self::JobType => text_check(value, formats::is_job_type),
            Self::ExperienceLevel => text_check(value, formats::is_experience_level),
            Self::ApplicationStatus => text_check(value, formats::is_application_status),
            Self::JobStatus => text_check(value, formats::is_job_status),
            Self::Url => text_check(value, formats::is_url),
            Self::SalaryRange => text_check(value, formats::is_salary_range),
            Self::AdminOnly => policy::admin_only(ctx),
            Self::RecruiterOnly => policy::recruiter_only(ctx),
            Self::SameUser => policy::same_user(value, ctx),
            Self::SameCompany => policy::same_company(value, ctx),
            Self::Unknown(_) => false,
        }
    }

    /// Parse a comma-separated tag list such as `required,min=3,url`.
    pub fn parse_list(tags: &str) -> Result<Vec<Rule>, RuleParseError> {
        tags.split(',').map(str::parse).collect()
    }
}

/// Character count of text or item count of a list.
fn length(value: &FieldValue<'_>) -> Option<usize> {
    match value {
        FieldValue::Text(s) => Some(s.chars().count()),
        FieldValue::List(items) => Some(items.len()),
        _ => None,
    }
}

/// Apply a string predicate to text, or to every item of a list.
fn text_check(value: &FieldValue<'_>, check: fn(&str) -> bool) -> bool {
    match value {
        FieldValue::Text(s) => check(s),
        FieldValue::List(items) => items.iter().all(|s| check(s)),
        _ => false,
    }
}

fn parse_bound(rule: &str, param: Option<&str>) -> Result<usize, RuleParseError> {
    let param = param.ok_or_else(|| RuleParseError::MissingParameter(rule.to_string()))?;
    param
        .parse()
        .map_err(|_| RuleParseError::InvalidParameter {
            rule: rule.to_string(),
            param: param.to_string(),
        })
}

impl FromStr for Rule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RuleParseError::Empty);
        }
        let (name, param) = match s.split_once('=') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (s, None),
        };

        let rule = match name {
            "min" => return Ok(Self::MinLen(parse_bound(name, param)?)),
            "max" => return Ok(Self::MaxLen(parse_bound(name, param)?)),
            "required" => Self::Required,
            "items_required" => Self::ItemsRequired,
            "email" => Self::Email,
            "password" => Self::Password,
            "phone" => Self::Phone,
            "uuid" => Self::Uuid,
            "job_type" => Self::JobType,
            "experience_level" => Self::ExperienceLevel,
            "application_status" => Self::ApplicationStatus,
            "job_status" => Self::JobStatus,
            "url" => Self::Url,
            "salary_range" => Self::SalaryRange,
            "admin_only" => Self::AdminOnly,
            "recruiter_only" => Self::RecruiterOnly,
            "same_user" => Self::SameUser,
            "same_company" => Self::SameCompany,
            other => return Ok(Self::Unknown(other.to_string())),
        };

        if param.is_some() {
            return Err(RuleParseError::UnexpectedParameter(name.to_string()));
        }
        Ok(rule)
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MinLen(n) => write!(f, "min={n}"),
            Self::MaxLen(n) => write!(f, "max={n}"),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard_core::Role;
    use uuid::Uuid;

    #[test]
    fn parse_tag_list() {
        let rules = Rule::parse_list("required,min=3,max=100").unwrap();
        assert_eq!(rules, vec![Rule::Required, Rule::MinLen(3), Rule::MaxLen(100)]);
    }

    #[test]
    fn unknown_names_parse_to_unknown() {
        assert_eq!("iban".parse::<Rule>().unwrap(), Rule::Unknown("iban".into()));
        assert_eq!(Rule::Unknown("iban".into()).kind(), RuleKind::Unknown);
        assert!(!Rule::Unknown("iban".into()).evaluate(&FieldValue::Text("x"), None));
    }

    #[test]
    fn malformed_parameters_are_errors() {
        assert_eq!(
            "min".parse::<Rule>(),
            Err(RuleParseError::MissingParameter("min".into()))
        );
        assert!(matches!(
            "max=ten".parse::<Rule>(),
            Err(RuleParseError::InvalidParameter { .. })
        ));
        assert_eq!(
            "url=1".parse::<Rule>(),
            Err(RuleParseError::UnexpectedParameter("url".into()))
        );
        assert_eq!(Rule::parse_list("required,,url"), Err(RuleParseError::Empty));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for rule in [Rule::MinLen(50), Rule::SalaryRange, Rule::SameCompany] {
            assert_eq!(rule.to_string().parse::<Rule>().unwrap(), rule);
        }
    }

    #[test]
    fn kinds() {
        assert_eq!(Rule::Required.kind(), RuleKind::Shape);
        assert_eq!(Rule::Phone.kind(), RuleKind::Format);
        assert_eq!(Rule::SameUser.kind(), RuleKind::Role);
        assert!(Rule::AdminOnly.is_role_rule());
        assert!(!Rule::Url.is_role_rule());
    }

    #[test]
    fn min_counts_characters_not_bytes() {
        assert!(Rule::MinLen(3).evaluate(&FieldValue::Text("äöü"), None));
        assert!(!Rule::MaxLen(2).evaluate(&FieldValue::Text("äöü"), None));
    }

    #[test]
    fn length_rules_count_list_items() {
        let skills = vec!["rust".to_string()];
        assert!(Rule::MinLen(1).evaluate(&FieldValue::List(&skills), None));
        assert!(!Rule::MinLen(2).evaluate(&FieldValue::List(&skills), None));
    }

    #[test]
    fn format_rules_check_each_list_item() {
        let links = vec!["https://github.com/jane".to_string(), "nope".to_string()];
        assert!(!Rule::Url.evaluate(&FieldValue::List(&links), None));
        let links = vec!["https://github.com/jane".to_string()];
        assert!(Rule::Url.evaluate(&FieldValue::List(&links), None));
    }

    #[test]
    fn items_required_rejects_blank_items() {
        let skills = vec!["rust".to_string(), "  ".to_string()];
        assert!(!Rule::ItemsRequired.evaluate(&FieldValue::List(&skills), None));
    }

    #[test]
    fn uuid_rule_accepts_ids_and_text() {
        assert!(Rule::Uuid.evaluate(&FieldValue::Id(Uuid::new_v4()), None));
        assert!(Rule::Uuid.evaluate(&FieldValue::Text("67e55044-10b1-426f-9247-bb680e5fe0c8"), None));
        assert!(!Rule::Uuid.evaluate(&FieldValue::Text("42"), None));
    }

    #[test]
    fn role_rules_delegate_to_policy() {
        let ctx = ValidationContext::new(Role::Applicant, Uuid::new_v4(), Uuid::new_v4());
        assert!(!Rule::AdminOnly.evaluate(&FieldValue::Flag(true), Some(&ctx)));
        assert!(Rule::AdminOnly.evaluate(&FieldValue::Flag(true), None));
        assert!(Rule::SameUser.evaluate(&FieldValue::Id(ctx.caller_id()), Some(&ctx)));
    }
}
