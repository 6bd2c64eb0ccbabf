use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeclarationError;

/// The declared type of a parameter, determining how raw input is coerced.
///
/// Serialized as a plain string. Any string that is not one of the built-in
/// names is a named format (`"date-time"`, `"email"`, `"uuid"`), which is
/// carried as a string and only surfaces as a documentation hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeKind {
    String,
    Boolean,
    Integer,
    Number,
    Object,
    Array,
    /// Free-form mapping without declared properties.
    Dictionary,
    File,
    Format(String),
}

impl TypeKind {
    /// Named-format kind.
    #[must_use]
    pub fn format(name: impl Into<String>) -> Self {
        Self::Format(name.into())
    }

    /// String identifier for serialization and logging.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Object => "object",
            Self::Array => "array",
            Self::Dictionary => "dictionary",
            Self::File => "file",
            Self::Format(name) => name,
        }
    }

    /// The Swagger `type` keyword for this kind.
    #[must_use]
    pub fn swagger_type(&self) -> &'static str {
        match self {
            Self::String | Self::Format(_) => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Object | Self::Dictionary => "object",
            Self::Array => "array",
            Self::File => "file",
        }
    }

    /// The Swagger `format` keyword, only set for named formats.
    #[must_use]
    pub fn swagger_format(&self) -> Option<&str> {
        match self {
            Self::Format(name) => Some(name),
            _ => None,
        }
    }

    /// What a successful coercion produces, for error messages.
    #[must_use]
    pub fn expected(&self) -> &'static str {
        match self {
            Self::String | Self::Format(_) => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Object | Self::Dictionary => "object",
            Self::Array => "array",
            Self::File => "file upload",
        }
    }

    /// Whether the kind is parsed from JSON text.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Object | Self::Array | Self::Dictionary)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeKind {
    type Err = DeclarationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" => return Err(DeclarationError::EmptyKind),
            "string" => Self::String,
            "boolean" => Self::Boolean,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "object" => Self::Object,
            "array" => Self::Array,
            "dictionary" => Self::Dictionary,
            "file" => Self::File,
            other => Self::Format(other.to_owned()),
        })
    }
}

impl TryFrom<String> for TypeKind {
    type Error = DeclarationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeKind> for String {
    fn from(kind: TypeKind) -> Self {
        kind.as_str().to_owned()
    }
}
