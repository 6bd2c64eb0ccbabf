//! # routeguard-parameter
//!
//! Declared request parameters and their request-time validation.
//!
//! A route declares each parameter as a [`ParamSchema`](schema::ParamSchema)
//! tree. At declaration time the tree is checked and compiled into a flat
//! list of [`Constraint`](routeguard_validator::Constraint)s; at request time
//! [`RequestValidator`](request::RequestValidator) coerces raw input to the
//! declared kinds and runs the compiled constraints, collecting every failure
//! instead of stopping at the first.

pub mod coerce;
pub mod compile;
pub mod error;
pub mod input;
pub mod kind;
pub mod location;
pub mod request;
pub mod schema;
pub mod values;

pub mod prelude {
    pub use crate::compile::{CompiledParam, compile};
    pub use crate::error::DeclarationError;
    pub use crate::input::{FileUpload, RawInput, RawInputs, RawRequest};
    pub use crate::kind::TypeKind;
    pub use crate::location::ParamLocation;
    pub use crate::request::{RequestValidator, ValidationFailure, ValidationResult};
    pub use crate::schema::ParamSchema;
    pub use crate::values::{ParamValue, ParameterBag};

    pub use routeguard_validator::{Constraint, Violation, ViolationCode};
}
