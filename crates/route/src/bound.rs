use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use routeguard_parameter::prelude::{DeclarationError, RawInput, RawRequest, RequestValidator};
use tracing::debug;

use crate::error::Rejection;
use crate::handler::{Handler, Reply};
use crate::layer::{Endpoint, Layer, RouteInfo, Validate};
use crate::method::Method;
use crate::spec::RouteSpec;

impl RouteSpec {
    /// Checks the declaration and wraps `handler` with request validation.
    ///
    /// Constraints are compiled once here. The returned route holds the
    /// unwrapped handler as [`BoundRoute::original`] and can take further
    /// wrappers with [`BoundRoute::layer`].
    ///
    /// # Errors
    ///
    /// Returns the first [`DeclarationError`] found in the declaration.
    pub fn bind<H: Handler>(self, handler: H) -> Result<BoundRoute, DeclarationError> {
        let (validator, matcher) = self.compile()?;
        let validator = Arc::new(validator);
        let original: Arc<dyn Handler> = Arc::new(handler);
        let endpoint = std::any::type_name::<H>().to_owned();

        let chain: Arc<dyn Endpoint> = Arc::new(Validate {
            path: self.path.clone(),
            validator: Arc::clone(&validator),
            handler: Arc::clone(&original),
        });

        debug!(
            method = %self.method,
            path = %self.path,
            endpoint = %endpoint,
            params = validator.params().len(),
            "route bound"
        );

        Ok(BoundRoute {
            spec: Arc::new(self),
            endpoint,
            original,
            validator,
            matcher,
            layers: vec![Validate::NAME],
            chain,
        })
    }
}

/// A route declaration joined with its handler and wrapper chain.
///
/// Cheap to clone; all parts are shared.
#[derive(Clone)]
pub struct BoundRoute {
    spec: Arc<RouteSpec>,
    endpoint: String,
    original: Arc<dyn Handler>,
    validator: Arc<RequestValidator>,
    matcher: Regex,
    layers: Vec<&'static str>,
    chain: Arc<dyn Endpoint>,
}

impl BoundRoute {
    /// Wraps the current chain with `layer`.
    #[must_use]
    pub fn layer<L: Layer>(mut self, layer: L) -> Self {
        let route = RouteInfo {
            method: self.spec.method,
            path: &self.spec.path,
            endpoint: &self.endpoint,
        };
        self.chain = layer.wrap(route, Arc::clone(&self.chain));
        self.layers.push(layer.name());
        self
    }

    #[must_use]
    pub fn spec(&self) -> &RouteSpec {
        &self.spec
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.spec.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.spec.path
    }

    /// Type name of the handler this route was bound with.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The handler as passed to [`RouteSpec::bind`], without any wrapper.
    #[must_use]
    pub fn original(&self) -> &Arc<dyn Handler> {
        &self.original
    }

    #[must_use]
    pub fn validator(&self) -> &RequestValidator {
        &self.validator
    }

    /// Names of the applied wrappers, innermost first.
    #[must_use]
    pub fn layers(&self) -> &[&'static str] {
        &self.layers
    }

    /// Runs the request through the whole chain.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] when validation fails or a layer turns the
    /// request away.
    pub fn call(&self, request: RawRequest) -> Result<Reply, Rejection> {
        self.chain.call(request)
    }

    /// Matches a concrete request path, returning the placeholder values.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<IndexMap<String, String>> {
        let caps = self.matcher.captures(path)?;
        Some(
            self.matcher
                .capture_names()
                .flatten()
                .filter_map(|name| {
                    caps.name(name)
                        .map(|m| (name.to_owned(), m.as_str().to_owned()))
                })
                .collect(),
        )
    }

    /// Fills the path inputs of `request` from a concrete path.
    ///
    /// Values already present in the request are kept.
    pub(crate) fn fill_path(&self, path: &str, request: &mut RawRequest) -> bool {
        let Some(args) = self.match_path(path) else {
            return false;
        };
        for (name, value) in args {
            request
                .path
                .entry(name)
                .or_insert_with(|| RawInput::Text(value));
        }
        true
    }
}

impl fmt::Debug for BoundRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundRoute")
            .field("method", &self.spec.method)
            .field("path", &self.spec.path)
            .field("endpoint", &self.endpoint)
            .field("layers", &self.layers)
            .finish_non_exhaustive()
    }
}
