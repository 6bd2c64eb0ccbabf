//! The wrapper chain around a bound handler.
//!
//! Binding a route builds the innermost step, which validates the request
//! and calls the handler. Each [`Layer`] added afterwards wraps the chain
//! built so far, so the last layer added runs first.

use std::sync::Arc;

use routeguard_parameter::prelude::{RawRequest, RequestValidator, ValidationResult};
use tracing::{debug, info, info_span, warn};

use crate::error::Rejection;
use crate::handler::{Handler, Reply, RequestContext};
use crate::method::Method;

/// One step of a bound route's call chain.
pub trait Endpoint: Send + Sync {
    /// Serves a request, or rejects it.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] when the request parameters fail validation.
    fn call(&self, request: RawRequest) -> Result<Reply, Rejection>;
}

/// Identity of the route a layer is being applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteInfo<'a> {
    pub method: Method,
    pub path: &'a str,
    pub endpoint: &'a str,
}

/// A transformation applied to a bound route at registration time.
pub trait Layer: Send + Sync + 'static {
    /// Short name recorded in the route's layer list.
    fn name(&self) -> &'static str;

    /// Wraps `inner`, returning the new outermost step.
    fn wrap(&self, route: RouteInfo<'_>, inner: Arc<dyn Endpoint>) -> Arc<dyn Endpoint>;
}

/// Innermost step: validate, then call the handler.
pub(crate) struct Validate {
    pub(crate) path: String,
    pub(crate) validator: Arc<RequestValidator>,
    pub(crate) handler: Arc<dyn Handler>,
}

impl Validate {
    pub(crate) const NAME: &'static str = "validate";
}

impl Endpoint for Validate {
    fn call(&self, request: RawRequest) -> Result<Reply, Rejection> {
        match self.validator.validate_request(&request) {
            ValidationResult::Ok(args) => {
                debug!(path = %self.path, params = args.len(), "request accepted");
                let ctx = RequestContext::new(self.path.clone(), request.path_args(), args);
                Ok(self.handler.call(&ctx))
            }
            ValidationResult::Failed(failure) => {
                let rejected: Vec<&str> = failure.names().collect();
                warn!(path = %self.path, params = ?rejected, "request rejected");
                Err(Rejection::new(failure))
            }
        }
    }
}

/// Runs every request of the route inside an `info` span and logs the
/// outcome status.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceLayer;

impl Layer for TraceLayer {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn wrap(&self, route: RouteInfo<'_>, inner: Arc<dyn Endpoint>) -> Arc<dyn Endpoint> {
        Arc::new(Traced {
            method: route.method,
            path: route.path.to_owned(),
            endpoint: route.endpoint.to_owned(),
            inner,
        })
    }
}

struct Traced {
    method: Method,
    path: String,
    endpoint: String,
    inner: Arc<dyn Endpoint>,
}

impl Endpoint for Traced {
    fn call(&self, request: RawRequest) -> Result<Reply, Rejection> {
        let span = info_span!(
            "request",
            method = %self.method,
            path = %self.path,
            endpoint = %self.endpoint,
        );
        let _entered = span.enter();

        let outcome = self.inner.call(request);
        match &outcome {
            Ok(reply) => info!(status = reply.status, "request served"),
            Err(rejection) => info!(status = rejection.status(), "request served"),
        }
        outcome
    }
}
