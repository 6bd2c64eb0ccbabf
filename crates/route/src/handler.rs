//! Handlers and the request-scoped context they receive.

use indexmap::IndexMap;
use routeguard_parameter::prelude::ParameterBag;
use serde::Serialize;
use serde_json::Value;

/// Per-request state handed to a handler once validation has passed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    path: String,
    path_args: IndexMap<String, String>,
    args: ParameterBag,
}

impl RequestContext {
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        path_args: IndexMap<String, String>,
        args: ParameterBag,
    ) -> Self {
        Self {
            path: path.into(),
            path_args,
            args,
        }
    }

    /// The declared path template of the route being served.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw path segments captured for the route's placeholders.
    #[must_use]
    pub fn path_args(&self) -> &IndexMap<String, String> {
        &self.path_args
    }

    /// The validated parameters.
    #[must_use]
    pub fn args(&self) -> &ParameterBag {
        &self.args
    }
}

/// What a handler answers: a status code and a JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// `200` with the given body.
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    /// Serializes `body` into a `200` reply.
    ///
    /// # Errors
    ///
    /// Returns the serialization error if `body` cannot be represented as JSON.
    pub fn json<T: Serialize>(body: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(body).map(Self::ok)
    }
}

/// Application code serving one route.
///
/// Implemented for every `Fn(&RequestContext) -> Reply` that can be shared
/// between threads.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: &RequestContext) -> Reply;
}

impl<F> Handler for F
where
    F: Fn(&RequestContext) -> Reply + Send + Sync + 'static,
{
    fn call(&self, ctx: &RequestContext) -> Reply {
        self(ctx)
    }
}
