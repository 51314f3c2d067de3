//! # Shared Validator Behaviour
//!
//! One validator instance is shared by every request handler. These tests
//! drive it from many threads with contradictory caller contexts, repeat
//! validations to check determinism, and check that independent violations
//! are all reported.

use std::sync::{Arc, Barrier};
use std::thread;

use jobboard_validate::{FieldValue, Role, Rule, Schema, Validate, ValidationContext, Validator};
use once_cell::sync::Lazy;
use proptest::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct ProfileUpdate {
    user_id: Uuid,
    full_name: String,
    phone: String,
    verified: bool,
}

impl Validate for ProfileUpdate {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<ProfileUpdate>> = Lazy::new(|| {
            Schema::<ProfileUpdate>::builder()
                .field("UserID", |p| FieldValue::Id(p.user_id), [Rule::SameUser])
                .field(
                    "FullName",
                    |p| p.full_name.as_str().into(),
                    [Rule::Required, Rule::MinLen(2), Rule::MaxLen(100)],
                )
                .field(
                    "Phone",
                    |p| p.phone.as_str().into(),
                    [Rule::Phone, Rule::MaxLen(16)],
                )
                .field("Verified", |p| p.verified.into(), [Rule::AdminOnly])
                .build()
        });
        &SCHEMA
    }
}

fn update_for(user_id: Uuid) -> ProfileUpdate {
    ProfileUpdate {
        user_id,
        full_name: "Jane Doe".into(),
        phone: "+14155552671".into(),
        verified: true,
    }
}

// =========================================================================
// Concurrency
// =========================================================================

#[test]
fn concurrent_contradictory_contexts_do_not_leak() {
    let validator = Arc::new(Validator::new());
    let target = Uuid::new_v4();
    let record = Arc::new(update_for(target));
    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let validator = Arc::clone(&validator);
            let record = Arc::clone(&record);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let admin = i % 2 == 0;
                let ctx = if admin {
                    ValidationContext::new(Role::Admin, Uuid::new_v4(), Uuid::new_v4())
                } else {
                    ValidationContext::new(Role::Applicant, Uuid::new_v4(), Uuid::new_v4())
                };
                barrier.wait();
                let mut outcomes = Vec::new();
                for _ in 0..200 {
                    outcomes.push(validator.validate_with_role(&*record, &ctx));
                }
                (admin, outcomes)
            })
        })
        .collect();

    for handle in handles {
        let (admin, outcomes) = handle.join().unwrap();
        for outcome in outcomes {
            if admin {
                assert!(outcome.is_ok(), "admin context saw a foreign result");
            } else {
                let errors = outcome.unwrap_err();
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["user_id", "verified"]);
            }
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_tasks_observe_only_their_own_context() {
    let validator = Arc::new(Validator::new());
    let mut tasks = Vec::new();

    for i in 0..64 {
        let validator = Arc::clone(&validator);
        tasks.push(tokio::spawn(async move {
            let caller = Uuid::new_v4();
            let role = if i % 3 == 0 { Role::Recruiter } else { Role::Applicant };
            let ctx = ValidationContext::new(role, caller, Uuid::new_v4());
            let mut own = update_for(caller);
            own.verified = false;
            tokio::task::yield_now().await;
            validator.validate_with_role(&own, &ctx)
        }));
    }

    for task in tasks {
        assert!(task.await.unwrap().is_ok());
    }
}

// =========================================================================
// Totality and determinism
// =========================================================================

#[test]
fn three_violations_across_two_fields_yield_three_errors() {
    let record = ProfileUpdate {
        user_id: Uuid::nil(),
        full_name: "J".into(),
        phone: "call me maybe, any time".into(),
        verified: false,
    };
    let errors = Validator::new().validate(&record).unwrap_err();
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["full_name", "phone", "phone"]);
}

#[test]
fn errors_follow_declaration_order() {
    let record = ProfileUpdate {
        user_id: Uuid::new_v4(),
        full_name: "J".repeat(101),
        phone: "abc".into(),
        verified: true,
    };
    let ctx = ValidationContext::new(Role::Recruiter, Uuid::new_v4(), Uuid::new_v4());
    let errors = Validator::new().validate_with_role(&record, &ctx).unwrap_err();
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["user_id", "full_name", "phone", "verified"]);
}

#[test]
fn same_user_matrix() {
    let caller = Uuid::new_v4();
    let mut own = update_for(caller);
    own.verified = false;
    let mut foreign = update_for(Uuid::new_v4());
    foreign.verified = false;
    let validator = Validator::new();

    for role in [Role::Applicant, Role::Recruiter, Role::Admin] {
        let ctx = ValidationContext::new(role, caller, Uuid::new_v4());
        assert!(validator.validate_with_role(&own, &ctx).is_ok());
    }
    let applicant = ValidationContext::new(Role::Applicant, caller, Uuid::new_v4());
    assert!(validator.validate_with_role(&foreign, &applicant).is_err());
    let admin = ValidationContext::new(Role::Admin, caller, Uuid::new_v4());
    assert!(validator.validate_with_role(&foreign, &admin).is_ok());
}

proptest! {
    #[test]
    fn validation_is_idempotent(
        name in ".{0,120}",
        phone in "[+0-9a-z]{0,18}",
        verified in any::<bool>(),
    ) {
        let record = ProfileUpdate {
            user_id: Uuid::new_v4(),
            full_name: name,
            phone,
            verified,
        };
        let validator = Validator::new();
        let first = validator.validate(&record);
        let second = validator.validate(&record);
        prop_assert_eq!(first, second);

        let ctx = ValidationContext::new(Role::Recruiter, Uuid::new_v4(), Uuid::new_v4());
        let first = validator.validate_with_role(&record, &ctx);
        let second = validator.validate_with_role(&record, &ctx);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn no_context_never_reports_role_errors(verified in any::<bool>()) {
        let mut record = update_for(Uuid::new_v4());
        record.verified = verified;
        prop_assert!(Validator::new().validate(&record).is_ok());
    }
}
