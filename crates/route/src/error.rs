use routeguard_parameter::prelude::{DeclarationError, ValidationFailure};
use serde_json::Value;

use crate::method::Method;

/// A request turned away because its parameters failed validation.
///
/// Hosts encode this as a 400 response with [`Rejection::body`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("request rejected: {failure}")]
pub struct Rejection {
    failure: ValidationFailure,
}

impl Rejection {
    /// HTTP status for rejected requests.
    pub const STATUS: u16 = 400;

    #[must_use]
    pub fn new(failure: ValidationFailure) -> Self {
        Self { failure }
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        Self::STATUS
    }

    /// `{"parameters": {name: reason}}`.
    #[must_use]
    pub fn body(&self) -> Value {
        self.failure.to_payload()
    }

    #[must_use]
    pub fn failure(&self) -> &ValidationFailure {
        &self.failure
    }
}

impl From<ValidationFailure> for Rejection {
    fn from(failure: ValidationFailure) -> Self {
        Self::new(failure)
    }
}

/// Failure to serve a request through a [`RouteTable`](crate::RouteTable).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// No route is registered for this method and path.
    #[error("no route for {method} {path}")]
    NotFound { method: Method, path: String },

    #[error(transparent)]
    Rejected(#[from] Rejection),
}

impl RouteError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "ROUTE_NOT_FOUND",
            Self::Rejected(_) => "ROUTE_REJECTED",
        }
    }

    /// HTTP status the host should answer with.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Rejected(rejection) => rejection.status(),
        }
    }
}

/// Failure to add a route during startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A route with the same method and path is already registered.
    #[error("route {method} {path} is registered more than once")]
    DuplicateRoute { method: Method, path: String },

    #[error(transparent)]
    Declaration(#[from] DeclarationError),
}

impl RegistryError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateRoute { .. } => "REGISTRY_DUPLICATE_ROUTE",
            Self::Declaration(inner) => inner.code(),
        }
    }
}
