//! # routeguard-route
//!
//! One declaration per route drives request validation and API
//! documentation.
//!
//! ## Quick Start
//!
//! ```
//! use routeguard_route::prelude::*;
//! use serde_json::json;
//!
//! let mut registry = RouteRegistry::new();
//! registry
//!     .route(
//!         RouteSpec::new("/items", "list items").query(
//!             ParamSchema::integer("limit")
//!                 .with_default(20)
//!                 .with_constraint(Constraint::range(1, 100)),
//!         ),
//!         |ctx: &RequestContext| Reply::ok(ctx.args().to_json()),
//!     )
//!     .unwrap();
//! let table = registry.freeze();
//!
//! let reply = table.dispatch(Method::Get, "/items", RawRequest::new()).unwrap();
//! assert_eq!(reply.body, json!({"limit": 20}));
//!
//! let err = table
//!     .dispatch(Method::Get, "/items", RawRequest::new().with_query("limit", "500"))
//!     .unwrap_err();
//! assert_eq!(err.status(), 400);
//! ```
//!
//! The host framework owns the HTTP server: it turns each request into a
//! [`RawRequest`](routeguard_parameter::prelude::RawRequest), calls
//! [`RouteTable::dispatch`] and encodes the [`Reply`] or [`RouteError`].

mod bound;
mod config;
mod docs;
mod error;
mod handler;
mod layer;
mod method;
mod registry;
mod response;
mod spec;

pub use bound::BoundRoute;
pub use config::ApiConfig;
pub use docs::{Placement, schema_documentation};
pub use error::{RegistryError, Rejection, RouteError};
pub use handler::{Handler, Reply, RequestContext};
pub use layer::{Endpoint, Layer, RouteInfo, TraceLayer};
pub use method::{Method, UnknownMethod};
pub use registry::{RouteRegistry, RouteTable};
pub use response::ResponseSpec;
pub use spec::{BodyKind, RouteSpec};

pub mod prelude {
    pub use crate::{
        ApiConfig, BodyKind, BoundRoute, Handler, Layer, Method, RegistryError, Rejection, Reply,
        RequestContext, ResponseSpec, RouteError, RouteRegistry, RouteSpec, RouteTable,
        TraceLayer,
    };

    pub use routeguard_parameter::prelude::*;
}
