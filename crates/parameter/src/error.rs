use routeguard_validator::ConstraintError;

/// A route or parameter declaration that is inconsistent with itself.
///
/// Raised while routes are being declared and bound. Fatal to startup;
/// never produced by request validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationError {
    /// A type name was empty.
    #[error("type name must not be empty")]
    EmptyKind,

    /// A top-level parameter has no name.
    #[error("{location} parameter has an empty name")]
    EmptyName { location: String },

    /// `properties` were given for a kind other than `object`.
    #[error("`{param}` declares properties but has kind `{kind}`")]
    PropertiesOnNonObject { param: String, kind: String },

    /// An `item` schema was given for a kind other than `array`.
    #[error("`{param}` declares an item schema but has kind `{kind}`")]
    ItemOnNonArray { param: String, kind: String },

    /// Two properties of one object share a name.
    #[error("`{param}` declares property `{property}` more than once")]
    DuplicateProperty { param: String, property: String },

    /// Two parameters of one route share a name.
    #[error("parameter `{name}` is declared more than once")]
    DuplicateParameter { name: String },

    /// Path parameters are always present, so they must be required.
    #[error("path parameter `{name}` must be required")]
    OptionalPathParameter { name: String },

    /// A path parameter has no `{placeholder}` in the route path.
    #[error("path parameter `{name}` does not appear in `{path}`")]
    UnknownPathParameter { name: String, path: String },

    /// File uploads cannot carry value constraints.
    #[error("file parameter `{param}` cannot carry constraints")]
    ConstraintOnFile { param: String },

    /// A constraint that no value could satisfy.
    #[error("`{param}` has an invalid constraint: {source}")]
    InvalidConstraint {
        param: String,
        #[source]
        source: ConstraintError,
    },

    /// The declared default cannot be coerced to the declared kind.
    #[error("default of `{param}` is not a valid {expected}")]
    InvalidDefault { param: String, expected: String },

    /// The route path template cannot be turned into a matcher.
    #[error("invalid route path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },
}

impl DeclarationError {
    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyKind => "DECL_EMPTY_KIND",
            Self::EmptyName { .. } => "DECL_EMPTY_NAME",
            Self::PropertiesOnNonObject { .. } => "DECL_PROPERTIES_ON_NON_OBJECT",
            Self::ItemOnNonArray { .. } => "DECL_ITEM_ON_NON_ARRAY",
            Self::DuplicateProperty { .. } => "DECL_DUPLICATE_PROPERTY",
            Self::DuplicateParameter { .. } => "DECL_DUPLICATE_PARAMETER",
            Self::OptionalPathParameter { .. } => "DECL_OPTIONAL_PATH_PARAMETER",
            Self::UnknownPathParameter { .. } => "DECL_UNKNOWN_PATH_PARAMETER",
            Self::ConstraintOnFile { .. } => "DECL_CONSTRAINT_ON_FILE",
            Self::InvalidConstraint { .. } => "DECL_INVALID_CONSTRAINT",
            Self::InvalidDefault { .. } => "DECL_INVALID_DEFAULT",
            Self::InvalidPath { .. } => "DECL_INVALID_PATH",
        }
    }
}
