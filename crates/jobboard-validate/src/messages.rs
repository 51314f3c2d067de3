//! # Error Messages
//!
//! User-facing text for each rule, and the field-name normalization applied
//! to every reported error.

use crate::rule::Rule;
use crate::schema::FieldValue;

/// Reported when a role rule runs under a fail-closed validator without a
/// caller context.
pub const CONTEXT_REQUIRED: &str = "This field requires an authenticated caller";

/// Message for a failing `rule` on `value`.
pub fn for_rule(rule: &Rule, value: &FieldValue<'_>) -> String {
    let text = match rule {
        Rule::Required => "This field is required",
        Rule::MinLen(n) => {
            return match value {
                FieldValue::List(_) => format!("Must contain at least {n} items"),
                _ => format!("Must be at least {n} characters long"),
            }
        }
        Rule::MaxLen(n) => {
            return match value {
                FieldValue::List(_) => format!("Must contain at most {n} items"),
                _ => format!("Must be at most {n} characters long"),
            }
        }
        Rule::ItemsRequired => "Items must not be blank",
        Rule::Email => "Invalid email format",
        Rule::Password => {
            "Password must be at least 8 characters long and contain at least one uppercase \
             letter, one lowercase letter, one number, and one special character"
        }
        Rule::Phone => "Invalid phone number format",
        Rule::Uuid => "Invalid UUID format",
        Rule::JobType => {
            "Invalid job type. Must be one of: full-time, part-time, contract, internship, \
             freelance, remote"
        }
        Rule::ExperienceLevel => {
            "Invalid experience level. Must be one of: entry, junior, mid, senior, lead, executive"
        }
        Rule::ApplicationStatus => {
            "Invalid application status. Must be one of: pending, reviewed, accepted, rejected"
        }
        Rule::JobStatus => "Invalid job status. Must be one of: active, inactive, closed, draft",
        Rule::Url => "Invalid URL format",
        Rule::SalaryRange => "Invalid salary range format. Example: 50000-75000 or 50k-75k",
        Rule::AdminOnly => "This field can only be modified by administrators",
        Rule::RecruiterOnly => "This field can only be modified by recruiters",
        Rule::SameUser => "You can only modify your own resources",
        Rule::SameCompany => "You can only manage resources that belong to your company",
        Rule::Unknown(name) => return format!("Failed validation on {name}"),
    };
    text.to_string()
}

/// Convert a declared field name to snake_case.
///
/// An underscore goes in wherever a lowercase letter or digit is followed by
/// an uppercase letter, and before the last capital of an acronym that runs
/// into a word, so `ResumeURL` becomes `resume_url` and `URLPath` becomes
/// `url_path`. Names that are already snake_case come back unchanged.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_examples() {
        assert_eq!(to_snake_case("FullName"), "full_name");
        assert_eq!(to_snake_case("ResumeURL"), "resume_url");
        assert_eq!(to_snake_case("JobID"), "job_id");
        assert_eq!(to_snake_case("URLPath"), "url_path");
        assert_eq!(to_snake_case("salaryRange"), "salary_range");
        assert_eq!(to_snake_case("Email"), "email");
        assert_eq!(to_snake_case("Address2Line"), "address2_line");
    }

    #[test]
    fn snake_case_is_idempotent() {
        for name in ["cover_letter", "company_id", "title", "resume_url"] {
            assert_eq!(to_snake_case(name), name);
            assert_eq!(to_snake_case(&to_snake_case(name)), name);
        }
    }

    #[test]
    fn role_messages_are_specific() {
        let v = FieldValue::Flag(true);
        assert_eq!(
            for_rule(&Rule::AdminOnly, &v),
            "This field can only be modified by administrators"
        );
        assert!(for_rule(&Rule::RecruiterOnly, &v).contains("recruiters"));
        assert!(for_rule(&Rule::SameCompany, &v).contains("company"));
    }

    #[test]
    fn unknown_rule_gets_generic_message() {
        assert_eq!(
            for_rule(&Rule::Unknown("iban".into()), &FieldValue::Missing),
            "Failed validation on iban"
        );
    }

    #[test]
    fn length_message_depends_on_value_shape() {
        let items = vec!["a".to_string()];
        assert_eq!(
            for_rule(&Rule::MinLen(2), &FieldValue::List(&items)),
            "Must contain at least 2 items"
        );
        assert_eq!(
            for_rule(&Rule::MinLen(50), &FieldValue::Text("short")),
            "Must be at least 50 characters long"
        );
    }

    #[test]
    fn password_message_is_one_sentence() {
        let msg = for_rule(&Rule::Password, &FieldValue::Text("x"));
        assert!(msg.starts_with("Password must be at least 8 characters long"));
        assert!(msg.contains("uppercase letter, one lowercase letter"));
    }
}
