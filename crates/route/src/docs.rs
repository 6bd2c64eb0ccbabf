//! Swagger 2.0 style documentation derived from route declarations.
//!
//! Everything here is a pure function of the declaration; calling it twice
//! yields the same document.

use routeguard_parameter::prelude::{ParamLocation, ParamSchema, TypeKind};
use routeguard_validator::describe_all;
use serde_json::{Map, Value};

use crate::spec::{BodyKind, RouteSpec};

/// Where a schema sits in the document, which decides the keys it gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement<'a> {
    /// A top-level parameter: carries `name`, `in` and a boolean `required`.
    Parameter(&'a str),
    /// A property, item or body field inside a `schema` block. Carries no
    /// name; objects list their required properties instead.
    Nested,
}

/// Documentation entry for one parameter schema.
#[must_use]
pub fn schema_documentation(schema: &ParamSchema, placement: Placement<'_>) -> Value {
    let mut doc = Map::new();

    if let Placement::Parameter(location) = placement {
        doc.insert("name".to_owned(), Value::String(schema.name.clone()));
        doc.insert("in".to_owned(), Value::String(location.to_owned()));
    }

    doc.insert(
        "type".to_owned(),
        Value::String(schema.kind.swagger_type().to_owned()),
    );
    if let Some(format) = schema.kind.swagger_format() {
        doc.insert("format".to_owned(), Value::String(format.to_owned()));
    }
    if !schema.description.is_empty() {
        doc.insert(
            "description".to_owned(),
            Value::String(schema.description.clone()),
        );
    }
    if schema.required && matches!(placement, Placement::Parameter(_)) {
        doc.insert("required".to_owned(), Value::Bool(true));
    }
    if let Some(default) = &schema.default {
        doc.insert("default".to_owned(), default.clone());
    }

    doc.extend(describe_all(&schema.constraints));

    match schema.kind {
        TypeKind::Object => {
            doc.insert(
                "properties".to_owned(),
                Value::Object(properties(schema.properties())),
            );
            if placement == Placement::Nested {
                let required = required_names(schema.properties());
                if !required.is_empty() {
                    doc.insert("required".to_owned(), required.into());
                }
            }
        }
        TypeKind::Array => {
            if let Some(item) = schema.item() {
                doc.insert(
                    "items".to_owned(),
                    schema_documentation(item, Placement::Nested),
                );
            }
        }
        _ => {}
    }

    Value::Object(doc)
}

fn properties(schemas: &[ParamSchema]) -> Map<String, Value> {
    schemas
        .iter()
        .map(|p| (p.name.clone(), schema_documentation(p, Placement::Nested)))
        .collect()
}

fn required_names(schemas: &[ParamSchema]) -> Vec<Value> {
    schemas
        .iter()
        .filter(|p| p.required)
        .map(|p| Value::String(p.name.clone()))
        .collect()
}

fn parameter_list(schemas: &[ParamSchema], location: &str) -> impl Iterator<Item = Value> {
    schemas
        .iter()
        .map(move |p| schema_documentation(p, Placement::Parameter(location)))
}

impl RouteSpec {
    /// The operation object for this route.
    ///
    /// Header, path and query parameters are listed individually. A JSON
    /// body becomes a single `in: body` block whose schema holds the body
    /// parameters as properties; a multipart body lists its fields as
    /// `formData` parameters.
    #[must_use]
    pub fn to_documentation(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("tags".to_owned(), vec![Value::String(self.path.clone())].into());
        doc.insert(
            "description".to_owned(),
            Value::String(self.description.clone()),
        );
        doc.insert(
            "consumes".to_owned(),
            vec![Value::String(self.body_kind.content_type().to_owned())].into(),
        );

        let mut parameters: Vec<Value> = Vec::new();
        parameters.extend(parameter_list(
            &self.header_params,
            ParamLocation::Header.as_str(),
        ));
        parameters.extend(parameter_list(&self.path_params, ParamLocation::Path.as_str()));
        parameters.extend(parameter_list(
            &self.query_params,
            ParamLocation::Query.as_str(),
        ));

        if !self.body_params.is_empty() {
            match self.body_kind {
                BodyKind::Json => parameters.push(self.body_block()),
                BodyKind::Multipart => {
                    parameters.extend(parameter_list(&self.body_params, "formData"));
                }
            }
        }
        doc.insert("parameters".to_owned(), Value::Array(parameters));

        let responses: Map<String, Value> = self
            .responses
            .iter()
            .map(|r| (r.code.to_string(), r.to_documentation()))
            .collect();
        doc.insert("responses".to_owned(), Value::Object(responses));

        Value::Object(doc)
    }

    fn body_block(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_owned(), Value::String("object".to_owned()));
        schema.insert(
            "properties".to_owned(),
            Value::Object(properties(&self.body_params)),
        );
        let required = required_names(&self.body_params);
        if !required.is_empty() {
            schema.insert("required".to_owned(), required.into());
        }

        let mut block = Map::new();
        block.insert("name".to_owned(), Value::String(self.body_name.clone()));
        block.insert("in".to_owned(), Value::String("body".to_owned()));
        block.insert(
            "description".to_owned(),
            Value::String(self.body_description.clone()),
        );
        block.insert("schema".to_owned(), Value::Object(schema));
        Value::Object(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use routeguard_parameter::prelude::Constraint;
    use serde_json::json;

    #[test]
    fn top_level_parameter_entry() {
        let schema = ParamSchema::integer("limit")
            .with_description("page size")
            .with_default(20)
            .with_constraint(Constraint::range(1, 100));
        assert_eq!(
            schema_documentation(&schema, Placement::Parameter("query")),
            json!({
                "name": "limit",
                "in": "query",
                "type": "integer",
                "description": "page size",
                "required": true,
                "default": 20,
                "minimum": 1,
                "maximum": 100
            })
        );
    }

    #[test]
    fn optional_parameters_omit_required() {
        let schema = ParamSchema::string("fruit").optional();
        assert_eq!(
            schema_documentation(&schema, Placement::Parameter("query")),
            json!({"name": "fruit", "in": "query", "type": "string"})
        );
    }

    #[test]
    fn named_formats_are_strings() {
        let schema = ParamSchema::formatted("at", "date-time");
        assert_eq!(
            schema_documentation(&schema, Placement::Nested),
            json!({"type": "string", "format": "date-time"})
        );
    }

    #[test]
    fn nested_objects_list_required_properties() {
        let schema = ParamSchema::object("user")
            .with_property(ParamSchema::string("email"))
            .with_property(ParamSchema::integer("age").optional());
        assert_eq!(
            schema_documentation(&schema, Placement::Nested),
            json!({
                "type": "object",
                "properties": {
                    "email": {"type": "string"},
                    "age": {"type": "integer"}
                },
                "required": ["email"]
            })
        );
    }

    #[test]
    fn array_items() {
        let schema = ParamSchema::array(
            "tags",
            ParamSchema::string("").with_constraint(Constraint::length(1, 10)),
        )
        .optional();
        assert_eq!(
            schema_documentation(&schema, Placement::Nested),
            json!({
                "type": "array",
                "items": {"type": "string", "minLength": 1, "maxLength": 10}
            })
        );
    }

    #[test]
    fn enum_values() {
        let schema =
            ParamSchema::string("size").with_constraint(Constraint::one_of(["s", "m", "l"]));
        assert_eq!(
            schema_documentation(&schema, Placement::Nested)["enum"],
            json!(["s", "m", "l"])
        );
    }
}
