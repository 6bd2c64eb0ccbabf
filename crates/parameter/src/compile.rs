//! Derivation of the effective constraint list for a schema tree.

use std::collections::HashSet;

use indexmap::IndexMap;
use routeguard_validator::Constraint;
use serde_json::Value;

use crate::coerce;
use crate::error::DeclarationError;
use crate::kind::TypeKind;
use crate::location::ParamLocation;
use crate::schema::ParamSchema;

/// Compiles the constraints that apply to values of `schema`.
///
/// The declared constraints come first, in order. Arrays append a `ListOf`
/// built from the item schema. Objects append an `ObjectShape` built from
/// their properties and, when any property is required, get a
/// `RequiredFields` at the very front.
#[must_use]
pub fn compile(schema: &ParamSchema) -> Vec<Constraint> {
    let mut constraints = schema.constraints.clone();

    match schema.kind {
        TypeKind::Array => {
            if let Some(item) = schema.item() {
                constraints.push(Constraint::list_of(compile(item)));
            }
        }
        TypeKind::Object => {
            let fields: IndexMap<String, Vec<Constraint>> = schema
                .properties()
                .iter()
                .map(|property| (property.name.clone(), compile(property)))
                .collect();
            constraints.push(Constraint::object_shape(fields));

            let required: Vec<&str> = schema.required_properties().collect();
            if !required.is_empty() {
                constraints.insert(0, Constraint::required_fields(required));
            }
        }
        _ => {}
    }

    constraints
}

/// A declared parameter with its constraints compiled and default coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledParam {
    pub location: ParamLocation,
    pub schema: ParamSchema,
    pub constraints: Vec<Constraint>,
    /// The default, already coerced to the declared kind.
    pub default: Option<Value>,
}

impl CompiledParam {
    /// Checks one top-level declaration and compiles it.
    pub fn new(location: ParamLocation, schema: ParamSchema) -> Result<Self, DeclarationError> {
        if schema.name.is_empty() {
            return Err(DeclarationError::EmptyName {
                location: location.to_string(),
            });
        }
        schema.check()?;
        if location == ParamLocation::Path && !schema.required {
            return Err(DeclarationError::OptionalPathParameter {
                name: schema.name,
            });
        }

        let default = match &schema.default {
            Some(raw) => Some(coerce::coerce_default(&schema, raw).ok_or_else(|| {
                DeclarationError::InvalidDefault {
                    param: schema.name.clone(),
                    expected: schema.kind.expected().to_owned(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            location,
            constraints: compile(&schema),
            schema,
            default,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.schema.name
    }
}

/// Compiles every parameter of a route, rejecting names used twice.
///
/// Names must be unique across all locations since the validation bag is
/// keyed by name alone.
pub fn compile_route<I>(params: I) -> Result<Vec<CompiledParam>, DeclarationError>
where
    I: IntoIterator<Item = (ParamLocation, ParamSchema)>,
{
    let mut seen = HashSet::new();
    params
        .into_iter()
        .map(|(location, schema)| {
            if !seen.insert(schema.name.clone()) {
                return Err(DeclarationError::DuplicateParameter { name: schema.name });
            }
            CompiledParam::new(location, schema)
        })
        .collect()
}
