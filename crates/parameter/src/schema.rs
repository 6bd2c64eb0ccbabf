use std::collections::HashSet;
use std::sync::LazyLock;

use routeguard_validator::Constraint;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DeclarationError;
use crate::kind::TypeKind;

/// Item schema used by arrays declared without one.
static ANONYMOUS_OBJECT: LazyLock<ParamSchema> =
    LazyLock::new(|| ParamSchema::new("", TypeKind::Object));

/// The declared shape of one parameter, possibly nested.
///
/// `properties` is only meaningful for `object` kinds and `item` only for
/// `array` kinds. [`ParamSchema::check`] rejects declarations that break
/// this. An array declared without an item schema gets an anonymous
/// object-typed item.
///
/// Parameters are required unless marked [`optional`](ParamSchema::optional).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamSchema {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(rename = "type")]
    pub kind: TypeKind,

    #[serde(default = "required_by_default")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ParamSchema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Box<ParamSchema>>,
}

fn required_by_default() -> bool {
    true
}

impl ParamSchema {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            required: true,
            default: None,
            constraints: Vec::new(),
            properties: Vec::new(),
            item: None,
        }
    }

    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::String)
    }

    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Boolean)
    }

    #[must_use]
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Integer)
    }

    #[must_use]
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Number)
    }

    #[must_use]
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Object)
    }

    #[must_use]
    pub fn dictionary(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Dictionary)
    }

    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::File)
    }

    /// Array whose elements follow `item`.
    #[must_use]
    pub fn array(name: impl Into<String>, item: ParamSchema) -> Self {
        Self::new(name, TypeKind::Array).with_item(item)
    }

    /// String carrying a named-format hint such as `date-time`.
    #[must_use]
    pub fn formatted(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self::new(name, TypeKind::format(format))
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Add a child property (object kinds only).
    #[must_use]
    pub fn with_property(mut self, property: ParamSchema) -> Self {
        self.properties.push(property);
        self
    }

    /// Set the element schema (array kinds only).
    #[must_use]
    pub fn with_item(mut self, item: ParamSchema) -> Self {
        self.item = Some(Box::new(item));
        self
    }

    /// The element schema of an array.
    ///
    /// Arrays without a declared item yield an anonymous object schema.
    /// Non-array kinds yield `None` even if an item was (wrongly) set.
    #[must_use]
    pub fn item(&self) -> Option<&ParamSchema> {
        match self.kind {
            TypeKind::Array => Some(self.item.as_deref().unwrap_or(&*ANONYMOUS_OBJECT)),
            _ => None,
        }
    }

    /// The properties of an object. Empty for every other kind.
    #[must_use]
    pub fn properties(&self) -> &[ParamSchema] {
        match self.kind {
            TypeKind::Object => &self.properties,
            _ => &[],
        }
    }

    /// Names of the properties marked required, in declaration order.
    pub fn required_properties(&self) -> impl Iterator<Item = &str> {
        self.properties()
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }

    /// Checks this schema and every nested schema for self-consistency.
    pub fn check(&self) -> Result<(), DeclarationError> {
        self.check_at(&self.name)
    }

    fn check_at(&self, path: &str) -> Result<(), DeclarationError> {
        if !self.properties.is_empty() && self.kind != TypeKind::Object {
            return Err(DeclarationError::PropertiesOnNonObject {
                param: path.to_owned(),
                kind: self.kind.to_string(),
            });
        }
        if self.item.is_some() && self.kind != TypeKind::Array {
            return Err(DeclarationError::ItemOnNonArray {
                param: path.to_owned(),
                kind: self.kind.to_string(),
            });
        }
        if self.kind == TypeKind::File && !self.constraints.is_empty() {
            return Err(DeclarationError::ConstraintOnFile {
                param: path.to_owned(),
            });
        }
        for constraint in &self.constraints {
            constraint
                .verify()
                .map_err(|source| DeclarationError::InvalidConstraint {
                    param: path.to_owned(),
                    source,
                })?;
        }

        let mut seen = HashSet::new();
        for property in &self.properties {
            if !seen.insert(property.name.as_str()) {
                return Err(DeclarationError::DuplicateProperty {
                    param: path.to_owned(),
                    property: property.name.clone(),
                });
            }
            property.check_at(&format!("{path}.{}", property.name))?;
        }
        if let Some(item) = &self.item {
            item.check_at(&format!("{path}[]"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn new_is_required_with_no_extras() {
        let p = ParamSchema::string("fruit");
        assert_eq!(p.name, "fruit");
        assert!(p.required);
        assert!(p.default.is_none());
        assert!(p.constraints.is_empty());
        assert!(p.properties().is_empty());
        assert!(p.item().is_none());
    }

    #[test]
    fn array_without_item_defaults_to_anonymous_object() {
        let p = ParamSchema::new("rows", TypeKind::Array);
        let item = p.item().unwrap();
        assert_eq!(item.kind, TypeKind::Object);
        assert!(item.name.is_empty());
        assert!(p.check().is_ok());
    }

    #[test]
    fn required_properties_in_order() {
        let p = ParamSchema::object("user")
            .with_property(ParamSchema::string("email"))
            .with_property(ParamSchema::integer("age").optional())
            .with_property(ParamSchema::string("name"));
        let names: Vec<&str> = p.required_properties().collect();
        assert_eq!(names, vec!["email", "name"]);
    }

    #[test]
    fn check_rejects_properties_on_non_object() {
        let p = ParamSchema::integer("limit").with_property(ParamSchema::string("x"));
        assert_eq!(
            p.check(),
            Err(DeclarationError::PropertiesOnNonObject {
                param: "limit".into(),
                kind: "integer".into(),
            })
        );
        assert!(p.properties().is_empty());
    }

    #[test]
    fn check_rejects_item_on_non_array() {
        let p = ParamSchema::object("user").with_item(ParamSchema::string("x"));
        assert_eq!(
            p.check(),
            Err(DeclarationError::ItemOnNonArray {
                param: "user".into(),
                kind: "object".into(),
            })
        );
        assert!(p.item().is_none());
    }

    #[test]
    fn check_reports_nested_path() {
        let p = ParamSchema::array(
            "users",
            ParamSchema::object("")
                .with_property(ParamSchema::string("tags").with_item(ParamSchema::string(""))),
        );
        assert_eq!(
            p.check(),
            Err(DeclarationError::ItemOnNonArray {
                param: "users[].tags".into(),
                kind: "string".into(),
            })
        );
    }

    #[test]
    fn check_rejects_duplicate_properties() {
        let p = ParamSchema::object("user")
            .with_property(ParamSchema::string("email"))
            .with_property(ParamSchema::string("email"));
        assert_eq!(
            p.check(),
            Err(DeclarationError::DuplicateProperty {
                param: "user".into(),
                property: "email".into(),
            })
        );
    }

    #[test]
    fn check_rejects_constraints_on_files() {
        let p = ParamSchema::file("avatar").with_constraint(Constraint::max_length(10));
        assert_eq!(
            p.check(),
            Err(DeclarationError::ConstraintOnFile {
                param: "avatar".into(),
            })
        );
    }

    #[test]
    fn check_rejects_inverted_constraints() {
        let p = ParamSchema::integer("limit").with_constraint(Constraint::range(100, 1));
        assert_eq!(p.check().unwrap_err().code(), "DECL_INVALID_CONSTRAINT");
    }

    #[test]
    fn deserializes_from_declaration_document() {
        let p: ParamSchema = serde_json::from_value(json!({
            "name": "limit",
            "type": "integer",
            "default": 20,
            "constraints": [{"constraint": "range", "min": 1, "max": 100}]
        }))
        .unwrap();

        assert_eq!(
            p,
            ParamSchema::integer("limit")
                .with_default(20)
                .with_constraint(Constraint::range(1, 100))
        );
    }

    #[test]
    fn rejects_unknown_declaration_keys() {
        let result = serde_json::from_value::<ParamSchema>(json!({
            "name": "limit",
            "type": "integer",
            "maximum": 3
        }));
        assert!(result.is_err());
    }
}
