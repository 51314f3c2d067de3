//! # Error Hierarchy
//!
//! Structured errors for the foundational types, built with `thiserror`.

use thiserror::Error;

/// Errors raised while interpreting wire values as domain types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The value is not a member of a closed vocabulary.
    #[error("invalid {kind}: \"{value}\" (expected one of: {expected})")]
    UnknownVariant {
        /// Vocabulary name, e.g. "job type".
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Comma-separated list of accepted values.
        expected: &'static str,
    },

    /// A role string did not name a known role.
    #[error("unknown role: \"{0}\"")]
    UnknownRole(String),
}
