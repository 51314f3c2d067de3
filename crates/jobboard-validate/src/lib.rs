#![deny(missing_docs)]

//! # jobboard-validate: Role-Aware Request Validation
//!
//! Checks incoming request records against a statically declared constraint
//! table and reports every violation at once as an ordered list of
//! `{field, message}` pairs.
//!
//! ## Design Principles
//!
//! 1. **Constraints are data.** Each request type implements [`Validate`] by
//!    returning a [`Schema`]: an ordered table of field name, accessor and
//!    rule list, built once and cached in a static. There is no runtime
//!    reflection and no string-keyed dispatch; [`Rule`] is a closed enum with
//!    one evaluator per variant.
//!
//! 2. **Context is a parameter, not state.** A [`ValidationContext`] (caller
//!    role, caller id, organization id) is passed by reference into each
//!    call and never stored on the [`Validator`]. One validator can be shared
//!    across threads without locking.
//!
//! 3. **Total aggregation.** Every failing rule on every field produces one
//!    [`ValidationError`], in declaration order. Nothing short-circuits.
//!
//! 4. **Role rules fail open without a context.** `admin_only`,
//!    `recruiter_only`, `same_user` and `same_company` pass when validation
//!    runs without a caller, so one table serves both shape checks and
//!    authorization checks. [`Validator::fail_closed`] turns that off.

pub mod context;
pub mod error;
pub mod formats;
pub mod messages;
pub mod policy;
pub mod rule;
pub mod schema;
pub mod validator;

pub use context::{Role, ValidationContext};
pub use error::{RuleParseError, ValidationError, ValidationErrors};
pub use messages::to_snake_case;
pub use rule::{Rule, RuleKind};
pub use schema::{Accessor, FieldValue, Schema, SchemaBuilder, Validate};
pub use validator::{ContextPolicy, Validator};
