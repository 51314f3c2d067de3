//! # Struct Validator
//!
//! Walks a request type's constraint table and collects every failure.
//!
//! ## Evaluation order
//!
//! Fields in declaration order, rules in declaration order within a field.
//! No rule stops evaluation of the others.
//!
//! ## Absent values
//!
//! When a field holds its zero value (empty string, `None`, `false`, empty
//! list) only [`Rule::Required`] is checked. Format, length and role rules
//! apply to values that were actually supplied, so an optional field left
//! out raises nothing and a required one left out raises exactly one error.
//!
//! ## Context policy
//!
//! The validator stores no caller state. [`Validator::validate`] runs role
//! rules with no context; under [`ContextPolicy::FailOpen`] they pass, under
//! [`ContextPolicy::FailClosed`] each one on a supplied value fails.

use crate::context::ValidationContext;
use crate::error::{ValidationError, ValidationErrors};
use crate::messages;
use crate::rule::{Rule, RuleKind};
use crate::schema::{Schema, Validate};

/// What role rules do when no caller context is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContextPolicy {
    /// Role rules pass without a context.
    #[default]
    FailOpen,
    /// Role rules fail without a context.
    FailClosed,
}

/// Evaluates constraint tables. Holds only its policy, so one instance can
/// be shared freely across threads and tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Validator {
    policy: ContextPolicy,
}

impl Validator {
    /// A fail-open validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// A validator whose role rules fail when no context is supplied.
    pub fn fail_closed() -> Self {
        Self {
            policy: ContextPolicy::FailClosed,
        }
    }

    /// The configured context policy.
    pub fn policy(&self) -> ContextPolicy {
        self.policy
    }

    /// Check `record` without a caller context.
    pub fn validate<T: Validate>(&self, record: &T) -> Result<(), ValidationErrors> {
        self.check(T::schema(), record, None).into_result()
    }

    /// Check `record` on behalf of the caller described by `ctx`. The
    /// context is only borrowed for this call.
    pub fn validate_with_role<T: Validate>(
        &self,
        record: &T,
        ctx: &ValidationContext,
    ) -> Result<(), ValidationErrors> {
        self.check(T::schema(), record, Some(ctx)).into_result()
    }

    /// Run `schema` against `record` and return every failure.
    pub fn check<T>(
        &self,
        schema: &Schema<T>,
        record: &T,
        ctx: Option<&ValidationContext>,
    ) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        for field in schema.fields() {
            let value = field.read(record);
            let supplied = !value.is_default();

            for rule in field.rules() {
                if !supplied && *rule != Rule::Required {
                    continue;
                }

                if rule.kind() == RuleKind::Role
                    && ctx.is_none()
                    && self.policy == ContextPolicy::FailClosed
                {
                    errors.push(ValidationError::new(field.name(), messages::CONTEXT_REQUIRED));
                    continue;
                }

                if !rule.evaluate(&value, ctx) {
                    errors.push(ValidationError::new(
                        field.name(),
                        messages::for_rule(rule, &value),
                    ));
                }
            }
        }

        if !errors.is_empty() {
            tracing::debug!(
                failures = errors.len(),
                with_context = ctx.is_some(),
                "request validation failed"
            );
        }

        errors
    }
}
