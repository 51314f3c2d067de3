//! # Authorization Policy
//!
//! The role rules. Each takes the caller context as an `Option`: with no
//! context every rule passes, so a constraint table can also be used for
//! unauthenticated shape checks. With a context present the rule denies
//! unless the caller is allowed, and administrators are always allowed.

use uuid::Uuid;

use jobboard_core::Role;

use crate::context::ValidationContext;
use crate::schema::FieldValue;

/// Only administrators may set the field.
pub fn admin_only(ctx: Option<&ValidationContext>) -> bool {
    match ctx {
        None => true,
        Some(ctx) => ctx.role() == Role::Admin,
    }
}

/// Recruiters and administrators may set the field.
pub fn recruiter_only(ctx: Option<&ValidationContext>) -> bool {
    match ctx {
        None => true,
        Some(ctx) => ctx.role().at_least(Role::Recruiter),
    }
}

/// The field must name the caller, unless the caller is an administrator.
pub fn same_user(value: &FieldValue<'_>, ctx: Option<&ValidationContext>) -> bool {
    match ctx {
        None => true,
        Some(ctx) => ctx.is_admin() || refers_to(value, ctx.caller_id()),
    }
}

/// The field must name the caller's organization, unless the caller is an
/// administrator.
pub fn same_company(value: &FieldValue<'_>, ctx: Option<&ValidationContext>) -> bool {
    match ctx {
        None => true,
        Some(ctx) => ctx.is_admin() || refers_to(value, ctx.organization_id()),
    }
}

/// Whether `value` is, or textually parses to, `id`.
fn refers_to(value: &FieldValue<'_>, id: Uuid) -> bool {
    match value {
        FieldValue::Id(v) => *v == id,
        FieldValue::Text(s) => Uuid::parse_str(s).map(|v| v == id).unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role) -> (ValidationContext, Uuid, Uuid) {
        let caller = Uuid::new_v4();
        let org = Uuid::new_v4();
        (ValidationContext::new(role, caller, org), caller, org)
    }

    #[test]
    fn every_rule_passes_without_context() {
        let stranger = FieldValue::Id(Uuid::new_v4());
        assert!(admin_only(None));
        assert!(recruiter_only(None));
        assert!(same_user(&stranger, None));
        assert!(same_company(&stranger, None));
    }

    #[test]
    fn admin_only_requires_admin() {
        assert!(admin_only(Some(&ctx(Role::Admin).0)));
        assert!(!admin_only(Some(&ctx(Role::Recruiter).0)));
        assert!(!admin_only(Some(&ctx(Role::Applicant).0)));
    }

    #[test]
    fn recruiter_only_admits_recruiters_and_admins() {
        assert!(recruiter_only(Some(&ctx(Role::Recruiter).0)));
        assert!(recruiter_only(Some(&ctx(Role::Admin).0)));
        assert!(!recruiter_only(Some(&ctx(Role::Applicant).0)));
    }

    #[test]
    fn same_user_matches_caller_for_any_role() {
        for role in [Role::Applicant, Role::Recruiter, Role::Admin] {
            let (c, caller, _) = ctx(role);
            assert!(same_user(&FieldValue::Id(caller), Some(&c)));
            assert!(same_user(&FieldValue::Text(&caller.to_string()), Some(&c)));
        }
    }

    #[test]
    fn same_user_mismatch_fails_unless_admin() {
        let other = FieldValue::Id(Uuid::new_v4());
        assert!(!same_user(&other, Some(&ctx(Role::Applicant).0)));
        assert!(!same_user(&other, Some(&ctx(Role::Recruiter).0)));
        assert!(same_user(&other, Some(&ctx(Role::Admin).0)));
    }

    #[test]
    fn same_company_compares_organization() {
        let (c, caller, org) = ctx(Role::Recruiter);
        assert!(same_company(&FieldValue::Id(org), Some(&c)));
        assert!(!same_company(&FieldValue::Id(caller), Some(&c)));
        assert!(!same_company(&FieldValue::Text("not-a-uuid"), Some(&c)));
        assert!(same_company(&FieldValue::Id(caller), Some(&ctx(Role::Admin).0)));
    }
}
