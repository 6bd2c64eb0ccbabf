//! Request-time validation of raw input against compiled parameters.

use std::fmt;

use indexmap::IndexMap;
use routeguard_validator::Violation;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::coerce;
use crate::compile::{CompiledParam, compile_route};
use crate::error::DeclarationError;
use crate::input::{RawInput, RawInputs, RawRequest};
use crate::location::ParamLocation;
use crate::schema::ParamSchema;
use crate::values::{ParamValue, ParameterBag};

/// Validates requests against the parameters of one route.
///
/// Built once per route at declaration time and shared read-only between
/// requests.
///
/// # Examples
///
/// ```
/// use routeguard_parameter::prelude::*;
///
/// let validator = RequestValidator::new([(
///     ParamLocation::Query,
///     ParamSchema::integer("limit")
///         .with_default(20)
///         .with_constraint(Constraint::range(1, 100)),
/// )])
/// .unwrap();
///
/// let bag = validator.validate(&RawInputs::new()).into_result().unwrap();
/// assert_eq!(bag.get_json("limit"), Some(&serde_json::json!(20)));
/// ```
#[derive(Debug, Clone)]
pub struct RequestValidator {
    params: Vec<CompiledParam>,
}

impl RequestValidator {
    /// Checks and compiles the given declarations.
    pub fn new<I>(params: I) -> Result<Self, DeclarationError>
    where
        I: IntoIterator<Item = (ParamLocation, ParamSchema)>,
    {
        Ok(Self {
            params: compile_route(params)?,
        })
    }

    /// The compiled parameters, in declaration order.
    #[must_use]
    pub fn params(&self) -> &[CompiledParam] {
        &self.params
    }

    /// Validates a flat name-to-value mapping, ignoring locations.
    #[must_use]
    pub fn validate(&self, raw: &RawInputs) -> ValidationResult {
        self.run(|param| raw.get(param.name()))
    }

    /// Validates a request, reading each parameter from its own location.
    #[must_use]
    pub fn validate_request(&self, raw: &RawRequest) -> ValidationResult {
        self.run(|param| raw.get(param.location, param.name()))
    }

    fn run<'a>(
        &self,
        lookup: impl Fn(&CompiledParam) -> Option<&'a RawInput>,
    ) -> ValidationResult {
        let mut bag = ParameterBag::new();
        let mut failure = ValidationFailure::default();

        for param in &self.params {
            let name = param.name();
            let supplied = lookup(param).filter(|raw| !raw.is_null());

            let value = match (supplied, &param.default) {
                (Some(raw), _) => match coerce::coerce(&param.schema, raw) {
                    Ok(value) => value,
                    Err(violation) => {
                        failure.push(name, violation);
                        continue;
                    }
                },
                (None, Some(default)) => ParamValue::Json(default.clone()),
                (None, None) if param.schema.required => {
                    failure.push(name, Violation::missing());
                    continue;
                }
                (None, None) => continue,
            };

            if let ParamValue::Json(json) = &value {
                let violations: Vec<Violation> = param
                    .constraints
                    .iter()
                    .filter_map(|constraint| Violation::from_check(constraint, json))
                    .collect();
                if !violations.is_empty() {
                    failure.extend(name, violations);
                    continue;
                }
            }

            bag.insert(name, value);
        }

        if failure.is_empty() {
            ValidationResult::Ok(bag)
        } else {
            ValidationResult::Failed(failure)
        }
    }
}

/// Outcome of validating one request.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Ok(ParameterBag),
    Failed(ValidationFailure),
}

impl ValidationResult {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn into_result(self) -> Result<ParameterBag, ValidationFailure> {
        match self {
            Self::Ok(bag) => Ok(bag),
            Self::Failed(failure) => Err(failure),
        }
    }
}

/// Every violation of a rejected request, grouped by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationFailure {
    violations: IndexMap<String, Vec<Violation>>,
}

impl ValidationFailure {
    pub fn push(&mut self, name: &str, violation: Violation) {
        self.violations
            .entry(name.to_owned())
            .or_default()
            .push(violation);
    }

    pub fn extend(&mut self, name: &str, violations: impl IntoIterator<Item = Violation>) {
        self.violations
            .entry(name.to_owned())
            .or_default()
            .extend(violations);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Violation]> {
        self.violations.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Names of the rejected parameters, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.violations.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Violation])> {
        self.violations
            .iter()
            .map(|(name, list)| (name.as_str(), list.as_slice()))
    }

    /// One reason per parameter, multiple violations joined with `"; "`.
    #[must_use]
    pub fn reasons(&self) -> IndexMap<String, String> {
        self.violations
            .iter()
            .map(|(name, list)| (name.clone(), join(list)))
            .collect()
    }

    /// The rejection body: `{"parameters": {name: reason}}`.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let parameters: Map<String, Value> = self
            .reasons()
            .into_iter()
            .map(|(name, reason)| (name, Value::String(reason)))
            .collect();
        let mut body = Map::new();
        body.insert("parameters".to_owned(), Value::Object(parameters));
        Value::Object(body)
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| &*v.message)
        .collect::<Vec<_>>()
        .join("; ")
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid parameters: ")?;
        for (i, (name, list)) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name} ({})", join(list))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}
