//! Per-parameter failure records.
//!
//! A request that fails validation yields a list of violations for every
//! offending parameter. Each violation is tagged with what went wrong so
//! callers can branch on the code and show the message.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constraint::Constraint;

/// What kind of check produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// A required parameter was absent and had no default.
    Missing,
    /// The raw input could not be converted to the declared kind.
    Coercion,
    Range,
    Length,
    Enum,
    ListOf,
    ObjectShape,
    RequiredFields,
}

impl ViolationCode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Coercion => "coercion",
            Self::Range => "range",
            Self::Length => "length",
            Self::Enum => "enum",
            Self::ListOf => "list_of",
            Self::ObjectShape => "object_shape",
            Self::RequiredFields => "required_fields",
        }
    }

    /// Code for a failed constraint of the given variant.
    #[must_use]
    pub fn of(constraint: &Constraint) -> Self {
        match constraint {
            Constraint::Range { .. } => Self::Range,
            Constraint::Length { .. } => Self::Length,
            Constraint::Enum { .. } => Self::Enum,
            Constraint::ListOf { .. } => Self::ListOf,
            Constraint::ObjectShape { .. } => Self::ObjectShape,
            Constraint::RequiredFields { .. } => Self::RequiredFields,
        }
    }

    /// Whether the violation came from running a constraint, as opposed to
    /// a missing value or failed coercion.
    #[must_use]
    pub fn is_constraint(&self) -> bool {
        !matches!(self, Self::Missing | Self::Coercion)
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reason a parameter was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub code: ViolationCode,
    pub message: Cow<'static, str>,
}

impl Violation {
    pub fn new(code: ViolationCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A required parameter with no value and no default.
    #[must_use]
    pub fn missing() -> Self {
        Self::new(ViolationCode::Missing, "missing required parameter")
    }

    /// The raw input could not be read as `expected`.
    #[must_use]
    pub fn coercion(expected: &str) -> Self {
        Self::new(
            ViolationCode::Coercion,
            format!("coercion error: expected {expected}"),
        )
    }

    /// Runs `constraint` against `value`, returning the violation if it fails.
    #[must_use]
    pub fn from_check(constraint: &Constraint, value: &Value) -> Option<Self> {
        constraint
            .explain(value)
            .map(|message| Self::new(ViolationCode::of(constraint), message))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
