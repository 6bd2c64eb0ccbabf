//! Startup-time route collection and the frozen table served from.

use indexmap::IndexMap;
use routeguard_parameter::prelude::RawRequest;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::bound::BoundRoute;
use crate::config::ApiConfig;
use crate::error::{RegistryError, RouteError};
use crate::handler::{Handler, Reply};
use crate::method::Method;
use crate::spec::RouteSpec;

type RouteKey = (String, Method);

/// Collects bound routes while the application starts.
///
/// Consumed by [`RouteRegistry::freeze`]; nothing can be registered once
/// the table exists.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: IndexMap<RouteKey, BoundRoute>,
}

impl RouteRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an already bound route.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateRoute`] if the method and path are
    /// already taken.
    pub fn register(&mut self, route: BoundRoute) -> Result<&mut Self, RegistryError> {
        let key = (route.path().to_owned(), route.method());
        if self.routes.contains_key(&key) {
            return Err(RegistryError::DuplicateRoute {
                method: route.method(),
                path: route.path().to_owned(),
            });
        }

        debug!(
            method = %route.method(),
            path = route.path(),
            endpoint = route.endpoint(),
            "route registered"
        );
        self.routes.insert(key, route);
        Ok(self)
    }

    /// Binds `handler` to `spec` and registers the result.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Declaration`] for an inconsistent declaration
    /// and [`RegistryError::DuplicateRoute`] for a taken method and path.
    pub fn route<H: Handler>(
        &mut self,
        spec: RouteSpec,
        handler: H,
    ) -> Result<&mut Self, RegistryError> {
        let route = spec.bind(handler)?;
        self.register(route)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Ends registration.
    #[must_use]
    pub fn freeze(self) -> RouteTable {
        info!(routes = self.routes.len(), "route table frozen");
        RouteTable {
            routes: self.routes,
        }
    }
}

/// Immutable set of routes, shared between request workers.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: IndexMap<RouteKey, BoundRoute>,
}

impl RouteTable {
    /// Looks a route up by method and declared path template.
    #[must_use]
    pub fn get(&self, method: Method, path: &str) -> Option<&BoundRoute> {
        self.routes.get(&(path.to_owned(), method))
    }

    /// Routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &BoundRoute> {
        self.routes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Finds the route for `path` and runs the request through it.
    ///
    /// `path` may be the declared template itself or a concrete path such
    /// as `/users/42`; in the latter case placeholder values are added to
    /// the request's path inputs.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NotFound`] when no route matches and
    /// [`RouteError::Rejected`] when validation fails.
    pub fn dispatch(
        &self,
        method: Method,
        path: &str,
        mut request: RawRequest,
    ) -> Result<Reply, RouteError> {
        if let Some(route) = self.get(method, path) {
            return Ok(route.call(request)?);
        }

        let route = self
            .routes()
            .filter(|route| route.method() == method)
            .find(|route| route.fill_path(path, &mut request))
            .ok_or_else(|| RouteError::NotFound {
                method,
                path: path.to_owned(),
            })?;
        Ok(route.call(request)?)
    }

    /// The complete API document.
    #[must_use]
    pub fn document(&self, config: &ApiConfig) -> Value {
        let mut paths: Map<String, Value> = Map::new();
        for route in self.routes() {
            let operations = paths
                .entry(route.path().to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(operations) = operations {
                operations.insert(
                    route.method().operation_key().to_owned(),
                    route.spec().to_documentation(),
                );
            }
        }

        let mut info = Map::new();
        info.insert("title".to_owned(), Value::String(config.title.clone()));
        info.insert("version".to_owned(), Value::String(config.version.clone()));

        let mut doc = Map::new();
        doc.insert("swagger".to_owned(), Value::String("2.0".to_owned()));
        doc.insert("info".to_owned(), Value::Object(info));
        doc.insert(
            "basePath".to_owned(),
            Value::String(config.base_path.clone()),
        );
        doc.insert("paths".to_owned(), Value::Object(paths));
        Value::Object(doc)
    }
}
