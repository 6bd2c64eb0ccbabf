/// A constraint that can never be satisfied as written.
///
/// Raised while a route is being declared, never while a request is being
/// validated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintError {
    /// `Range` with `min` above `max`.
    #[error("range minimum {min} is above maximum {max}")]
    InvertedRange { min: String, max: String },

    /// `Length` with `min` above `max`.
    #[error("length minimum {min} is above maximum {max}")]
    InvertedLength { min: usize, max: usize },

    /// `Enum` without any allowed value.
    #[error("enumeration has no allowed values")]
    EmptyEnum,
}

impl ConstraintError {
    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvertedRange { .. } => "CONSTRAINT_INVERTED_RANGE",
            Self::InvertedLength { .. } => "CONSTRAINT_INVERTED_LENGTH",
            Self::EmptyEnum => "CONSTRAINT_EMPTY_ENUM",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = ConstraintError::InvertedRange {
            min: "10".into(),
            max: "1".into(),
        };
        assert_eq!(err.to_string(), "range minimum 10 is above maximum 1");

        let err = ConstraintError::InvertedLength { min: 5, max: 2 };
        assert_eq!(err.to_string(), "length minimum 5 is above maximum 2");

        assert_eq!(
            ConstraintError::EmptyEnum.to_string(),
            "enumeration has no allowed values"
        );
    }

    #[test]
    fn codes_are_prefixed() {
        for err in [
            ConstraintError::InvertedRange {
                min: String::new(),
                max: String::new(),
            },
            ConstraintError::InvertedLength { min: 0, max: 0 },
            ConstraintError::EmptyEnum,
        ] {
            assert!(err.code().starts_with("CONSTRAINT_"), "{err:?}");
        }
    }
}
