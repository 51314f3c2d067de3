//! # Validation Errors
//!
//! [`ValidationErrors`] is the aggregate a failed validation returns: one
//! [`ValidationError`] per failing rule, in field then rule declaration
//! order, never deduplicated. [`RuleParseError`] covers malformed rule
//! declarations, which are a programming error rather than user input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One failing constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Wire name of the field, in snake_case.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl ValidationError {
    /// Create an error for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found in one validation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// An empty set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// A set holding a single error.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![ValidationError::new(field, message)])
    }

    /// Append one error.
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Append every error of `other`, keeping order.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    /// Rewrite every field as `prefix[index].field`, for errors found in
    /// one element of a nested list.
    pub fn nested(self, prefix: &str, index: usize) -> Self {
        Self(
            self.0
                .into_iter()
                .map(|e| ValidationError {
                    field: format!("{prefix}[{index}].{}", e.field),
                    message: e.message,
                })
                .collect(),
        )
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Errors reported against `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.0.iter().filter(move |e| e.field == field)
    }

    /// Borrow the underlying list.
    pub fn as_slice(&self) -> &[ValidationError] {
        &self.0
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A rule declaration that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleParseError {
    /// The declaration list contained an empty entry, e.g. `"required,,url"`.
    #[error("empty rule name in declaration")]
    Empty,

    /// A length rule was declared without its bound.
    #[error("rule \"{0}\" requires a parameter (e.g. {0}=3)")]
    MissingParameter(String),

    /// A rule parameter was not a valid value.
    #[error("rule \"{rule}\" has an invalid parameter \"{param}\"")]
    InvalidParameter {
        /// Rule name.
        rule: String,
        /// The rejected parameter text.
        param: String,
    },

    /// A parameter was given to a rule that takes none.
    #[error("rule \"{0}\" does not take a parameter")]
    UnexpectedParameter(String),
}
