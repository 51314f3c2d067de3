//! # Format Predicates
//!
//! Context-free checks over a single string value. Membership checks for
//! the domain vocabularies delegate to the `FromStr` impls in
//! `jobboard-core`, so both layers accept exactly the same words.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use jobboard_core::{ApplicationStatus, ExperienceLevel, JobStatus, JobType};

/// Characters that satisfy the password special-character class.
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Minimum password length in bytes.
pub const PASSWORD_MIN_LEN: usize = 8;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("valid phone regex"));

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(http|https)://[a-zA-Z0-9\-.]+\.[a-zA-Z]{2,}(/\S*)?$").expect("valid url regex")
});

static SALARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+k?-\d+k?$").expect("valid salary regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9\-]+(\.[a-zA-Z0-9\-]+)*\.[a-zA-Z]{2,}$")
        .expect("valid email regex")
});

/// At least eight characters with an ASCII uppercase letter, an ASCII
/// lowercase letter, a digit and one of [`PASSWORD_SPECIALS`].
pub fn is_strong_password(value: &str) -> bool {
    value.len() >= PASSWORD_MIN_LEN
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

/// E.164-like: optional `+`, no leading zero, 2 to 15 digits.
pub fn is_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Parses as a UUID.
pub fn is_uuid(value: &str) -> bool {
    Uuid::parse_str(value).is_ok()
}

/// `http` or `https` URL with a dotted host and a top-level domain.
pub fn is_url(value: &str) -> bool {
    URL_RE.is_match(value)
}

/// `<n>[k]-<n>[k]`, case-insensitive, e.g. `50000-75000` or `50K-75K`.
pub fn is_salary_range(value: &str) -> bool {
    SALARY_RE.is_match(&value.to_ascii_lowercase())
}

/// `local@domain.tld`.
pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Member of the job type vocabulary, any case.
pub fn is_job_type(value: &str) -> bool {
    value.parse::<JobType>().is_ok()
}

/// Member of the experience level vocabulary, any case.
pub fn is_experience_level(value: &str) -> bool {
    value.parse::<ExperienceLevel>().is_ok()
}

/// Member of the application status vocabulary, any case.
pub fn is_application_status(value: &str) -> bool {
    value.parse::<ApplicationStatus>().is_ok()
}

/// Member of the job status vocabulary, any case.
pub fn is_job_status(value: &str) -> bool {
    value.parse::<JobStatus>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_examples() {
        assert!(is_strong_password("Abcdef1!"));
        assert!(!is_strong_password("abcdef1!"));
        assert!(!is_strong_password("ABCDEF1!"));
        assert!(!is_strong_password("Abcdefg!"));
        assert!(!is_strong_password("Abcdefg1"));
        assert!(!is_strong_password("Abc1!"));
    }

    #[test]
    fn password_special_must_come_from_the_set() {
        assert!(!is_strong_password("Abcdef1_"));
        assert!(is_strong_password("Abcdef1{"));
    }

    #[test]
    fn phone_examples() {
        assert!(is_phone("+14155552671"));
        assert!(is_phone("4915123456789"));
        assert!(!is_phone("+0123456"));
        assert!(!is_phone("1"));
        assert!(!is_phone("555-1234"));
        assert!(!is_phone("+1234567890123456"));
    }

    #[test]
    fn uuid_examples() {
        assert!(is_uuid("67e55044-10b1-426f-9247-bb680e5fe0c8"));
        assert!(!is_uuid("not-a-uuid"));
        assert!(!is_uuid(""));
    }

    #[test]
    fn url_examples() {
        assert!(is_url("https://example.com"));
        assert!(is_url("http://cdn.example.co.uk/files/cv.pdf"));
        assert!(!is_url("ftp://example.com"));
        assert!(!is_url("https://localhost"));
        assert!(!is_url("example.com"));
    }

    #[test]
    fn salary_range_examples() {
        assert!(is_salary_range("50000-75000"));
        assert!(is_salary_range("50k-75k"));
        assert!(is_salary_range("50K-75K"));
        assert!(!is_salary_range("50000"));
        assert!(!is_salary_range("abc-def"));
        assert!(!is_salary_range("50k - 75k"));
    }

    #[test]
    fn email_examples() {
        assert!(is_email("jane.doe+jobs@example.com"));
        assert!(!is_email("jane.doe@"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("jane@example"));
    }

    #[test]
    fn vocabularies_are_case_insensitive() {
        assert!(is_job_type("REMOTE"));
        assert!(!is_job_type("onsite"));
        assert!(is_experience_level("Lead"));
        assert!(!is_experience_level("intern"));
        assert!(is_application_status("Reviewed"));
        assert!(!is_application_status("withdrawn"));
        assert!(is_job_status("DRAFT"));
        assert!(!is_job_status("archived"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn password_matches_its_definition(p in "[ -~]{0,16}") {
                let expected = p.len() >= 8
                    && p.chars().any(|c| c.is_ascii_uppercase())
                    && p.chars().any(|c| c.is_ascii_lowercase())
                    && p.chars().any(|c| c.is_ascii_digit())
                    && p.chars().any(|c| "!@#$%^&*(),.?\":{}|<>".contains(c));
                prop_assert_eq!(is_strong_password(&p), expected);
            }

            #[test]
            fn any_digit_range_is_a_salary_range(lo in 0u32..1_000_000, hi in 0u32..1_000_000, k in any::<bool>()) {
                let suffix = if k { "K" } else { "" };
                let range = format!("{lo}{suffix}-{hi}{suffix}");
                prop_assert!(is_salary_range(&range));
            }

            #[test]
            fn generated_uuids_pass(bytes in any::<[u8; 16]>()) {
                let id = Uuid::from_bytes(bytes);
                prop_assert!(is_uuid(&id.to_string()));
            }
        }
    }
}
