//! # routeguard-validator
//!
//! Pure predicates over JSON values, used to check request parameters after
//! they have been coerced to their declared kind.
//!
//! ## Quick Start
//!
//! ```
//! use routeguard_validator::Constraint;
//! use serde_json::json;
//!
//! let limit = Constraint::range(1, 100);
//! assert!(limit.check(&json!(20)));
//! assert!(!limit.check(&json!(500)));
//! assert_eq!(limit.explain(&json!(500)).as_deref(), Some("exceeds maximum"));
//! ```
//!
//! ## Variants
//!
//! - **Scalar**: [`Constraint::Range`], [`Constraint::Length`], [`Constraint::Enum`]
//! - **Structural**: [`Constraint::ListOf`], [`Constraint::ObjectShape`],
//!   [`Constraint::RequiredFields`]
//!
//! Structural variants are normally synthesized from a parameter schema
//! rather than written by hand.

pub mod constraint;
pub mod error;
pub mod number;
pub mod violation;

pub use constraint::{Constraint, describe_all};
pub use error::ConstraintError;
pub use violation::{Violation, ViolationCode};
