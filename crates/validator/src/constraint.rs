use std::cmp::Ordering;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::ConstraintError;
use crate::number;

/// A single pass/fail predicate over a coerced parameter value.
///
/// Scalar variants are authored on a schema. Structural variants
/// (`ListOf`, `ObjectShape`, `RequiredFields`) are derived from the
/// schema's shape by the constraint compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "constraint", rename_all = "snake_case")]
pub enum Constraint {
    /// Inclusive numeric bounds.
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<Number>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<Number>,
    },

    /// Inclusive bounds on string length (in chars) or array length.
    Length {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },

    /// Value must equal one of the listed values.
    Enum { values: Vec<Value> },

    /// Every array element must satisfy all item constraints.
    ListOf { item_constraints: Vec<Constraint> },

    /// Fields present in both the value and the table must satisfy their
    /// constraints. Fields outside the table are ignored.
    ObjectShape {
        fields: IndexMap<String, Vec<Constraint>>,
    },

    /// Every listed name must be a key of the object.
    RequiredFields { names: IndexSet<String> },
}

impl Constraint {
    /// Require a number within an inclusive range.
    #[must_use]
    pub fn range(min: impl Into<Number>, max: impl Into<Number>) -> Self {
        Self::Range {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    /// Require a number of at least `min`.
    #[must_use]
    pub fn min(min: impl Into<Number>) -> Self {
        Self::Range {
            min: Some(min.into()),
            max: None,
        }
    }

    /// Require a number of at most `max`.
    #[must_use]
    pub fn max(max: impl Into<Number>) -> Self {
        Self::Range {
            min: None,
            max: Some(max.into()),
        }
    }

    /// Float bounds. Non-finite bounds are treated as absent.
    #[must_use]
    pub fn range_f64(min: Option<f64>, max: Option<f64>) -> Self {
        Self::Range {
            min: min.and_then(number::from_f64),
            max: max.and_then(number::from_f64),
        }
    }

    /// Require a length within an inclusive range.
    #[must_use]
    pub fn length(min: usize, max: usize) -> Self {
        Self::Length {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Require a length of at least `min`.
    #[must_use]
    pub fn min_length(min: usize) -> Self {
        Self::Length {
            min: Some(min),
            max: None,
        }
    }

    /// Require a length of at most `max`.
    #[must_use]
    pub fn max_length(max: usize) -> Self {
        Self::Length {
            min: None,
            max: Some(max),
        }
    }

    /// Require one of the given values. Duplicates are dropped, first
    /// occurrence wins; `2` and `2.0` count as the same value.
    #[must_use]
    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Enum {
            values: dedup(values.into_iter().map(Into::into)),
        }
    }

    /// Apply the same constraint list to every array element.
    #[must_use]
    pub fn list_of(item_constraints: Vec<Constraint>) -> Self {
        Self::ListOf { item_constraints }
    }

    /// Check known fields of an object.
    #[must_use]
    pub fn object_shape(fields: IndexMap<String, Vec<Constraint>>) -> Self {
        Self::ObjectShape { fields }
    }

    /// Require the given keys to be present.
    #[must_use]
    pub fn required_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::RequiredFields {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Short name of the variant, used to tag violations.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Range { .. } => "range",
            Self::Length { .. } => "length",
            Self::Enum { .. } => "enum",
            Self::ListOf { .. } => "list_of",
            Self::ObjectShape { .. } => "object_shape",
            Self::RequiredFields { .. } => "required_fields",
        }
    }

    /// Whether `value` satisfies this constraint. Never panics.
    #[must_use]
    pub fn check(&self, value: &Value) -> bool {
        self.failure(value).is_none()
    }

    /// Why `value` fails this constraint, or `None` when it passes.
    #[must_use]
    pub fn explain(&self, value: &Value) -> Option<String> {
        self.failure(value).map(|f| f.to_string())
    }

    /// Documentation fragment in Swagger keyword form.
    #[must_use]
    pub fn describe(&self) -> Map<String, Value> {
        let mut doc = Map::new();
        match self {
            Self::Range { min, max } => {
                if let Some(min) = min {
                    doc.insert("minimum".into(), Value::Number(min.clone()));
                }
                if let Some(max) = max {
                    doc.insert("maximum".into(), Value::Number(max.clone()));
                }
            }
            Self::Length { min, max } => {
                if let Some(min) = min {
                    doc.insert("minLength".into(), Value::from(*min));
                }
                if let Some(max) = max {
                    doc.insert("maxLength".into(), Value::from(*max));
                }
            }
            Self::Enum { values } => {
                doc.insert("enum".into(), Value::Array(dedup(values.iter().cloned())));
            }
            Self::ListOf { item_constraints } => {
                doc.insert("items".into(), Value::Object(describe_all(item_constraints)));
            }
            Self::ObjectShape { fields } => {
                let properties = fields
                    .iter()
                    .map(|(name, constraints)| {
                        (name.clone(), Value::Object(describe_all(constraints)))
                    })
                    .collect();
                doc.insert("properties".into(), Value::Object(properties));
            }
            Self::RequiredFields { names } => {
                if !names.is_empty() {
                    let names = names.iter().cloned().map(Value::String).collect();
                    doc.insert("required".into(), Value::Array(names));
                }
            }
        }
        doc
    }

    /// Rejects constraints no value could ever satisfy.
    pub fn verify(&self) -> Result<(), ConstraintError> {
        match self {
            Self::Range {
                min: Some(min),
                max: Some(max),
            } if number::compare(min, max) == Some(Ordering::Greater) => {
                Err(ConstraintError::InvertedRange {
                    min: min.to_string(),
                    max: max.to_string(),
                })
            }
            Self::Length {
                min: Some(min),
                max: Some(max),
            } if min > max => Err(ConstraintError::InvertedLength {
                min: *min,
                max: *max,
            }),
            Self::Enum { values } if values.is_empty() => Err(ConstraintError::EmptyEnum),
            Self::ListOf { item_constraints } => {
                item_constraints.iter().try_for_each(Constraint::verify)
            }
            Self::ObjectShape { fields } => fields
                .values()
                .flatten()
                .try_for_each(Constraint::verify),
            _ => Ok(()),
        }
    }

    fn failure<'a>(&'a self, value: &Value) -> Option<Failure<'a>> {
        match self {
            Self::Range { min, max } => {
                let Value::Number(actual) = value else {
                    return Some(Failure::Expected("number"));
                };
                if min
                    .as_ref()
                    .is_some_and(|min| number::compare(actual, min) == Some(Ordering::Less))
                {
                    return Some(Failure::BelowMinimum);
                }
                if max
                    .as_ref()
                    .is_some_and(|max| number::compare(actual, max) == Some(Ordering::Greater))
                {
                    return Some(Failure::AboveMaximum);
                }
                None
            }
            Self::Length { min, max } => {
                let len = match value {
                    Value::String(s) => s.chars().count(),
                    Value::Array(items) => items.len(),
                    _ => return Some(Failure::Expected("string or array")),
                };
                if min.is_some_and(|min| len < min) {
                    return Some(Failure::TooShort);
                }
                if max.is_some_and(|max| len > max) {
                    return Some(Failure::TooLong);
                }
                None
            }
            Self::Enum { values } => (!values.iter().any(|allowed| same_value(allowed, value)))
                .then_some(Failure::NotAllowed),
            Self::ListOf { item_constraints } => {
                let Value::Array(items) = value else {
                    return Some(Failure::Expected("array"));
                };
                items.iter().enumerate().find_map(|(index, item)| {
                    first_failure(item_constraints, item).map(|inner| Failure::Element {
                        index,
                        inner: Box::new(inner),
                    })
                })
            }
            Self::ObjectShape { fields } => {
                let Value::Object(object) = value else {
                    return Some(Failure::Expected("object"));
                };
                fields.iter().find_map(|(name, constraints)| {
                    let field = object.get(name)?;
                    first_failure(constraints, field).map(|inner| Failure::Field {
                        name: name.as_str(),
                        inner: Box::new(inner),
                    })
                })
            }
            Self::RequiredFields { names } => {
                let Value::Object(object) = value else {
                    return Some(Failure::Expected("object"));
                };
                let missing: Vec<&str> = names
                    .iter()
                    .filter(|name| !object.contains_key(name.as_str()))
                    .map(String::as_str)
                    .collect();
                (!missing.is_empty()).then_some(Failure::MissingFields(missing))
            }
        }
    }
}

/// JSON equality, except that numbers compare by value.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => number::compare(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}

fn dedup(values: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::new();
    for value in values {
        if !unique.iter().any(|seen| same_value(seen, &value)) {
            unique.push(value);
        }
    }
    unique
}

/// Merges the documentation fragments of a constraint list.
///
/// Later fragments overwrite earlier keys.
#[must_use]
pub fn describe_all(constraints: &[Constraint]) -> Map<String, Value> {
    let mut doc = Map::new();
    for constraint in constraints {
        doc.extend(constraint.describe());
    }
    doc
}

fn first_failure<'a>(constraints: &'a [Constraint], value: &Value) -> Option<Failure<'a>> {
    constraints.iter().find_map(|c| c.failure(value))
}

#[derive(Debug)]
enum Failure<'a> {
    Expected(&'static str),
    BelowMinimum,
    AboveMaximum,
    TooShort,
    TooLong,
    NotAllowed,
    Element { index: usize, inner: Box<Failure<'a>> },
    Field { name: &'a str, inner: Box<Failure<'a>> },
    MissingFields(Vec<&'a str>),
}

impl fmt::Display for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected(kind) => write!(f, "expected {kind}"),
            Self::BelowMinimum => f.write_str("below minimum"),
            Self::AboveMaximum => f.write_str("exceeds maximum"),
            Self::TooShort => f.write_str("shorter than minimum length"),
            Self::TooLong => f.write_str("longer than maximum length"),
            Self::NotAllowed => f.write_str("not one of the allowed values"),
            Self::Element { index, inner } => write!(f, "element at index {index}: {inner}"),
            Self::Field { name, inner } => write!(f, "field `{name}`: {inner}"),
            Self::MissingFields(names) => {
                write!(f, "missing required field(s): {}", names.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(1), true)]
    #[case(json!(50), true)]
    #[case(json!(100), true)]
    #[case(json!(0), false)]
    #[case(json!(101), false)]
    #[case(json!(99.5), true)]
    #[case(json!(100.5), false)]
    #[case(json!("50"), false)]
    fn range_is_inclusive(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(Constraint::range(1, 100).check(&value), expected);
    }

    #[test]
    fn open_ended_ranges() {
        assert!(Constraint::min(0).check(&json!(i64::MAX)));
        assert!(!Constraint::min(0).check(&json!(-1)));
        assert!(Constraint::max(10).check(&json!(-1000)));
        assert!(!Constraint::max(10).check(&json!(11)));
        assert!(Constraint::Range { min: None, max: None }.check(&json!(7)));
    }

    #[test]
    fn range_f64_drops_non_finite_bounds() {
        let c = Constraint::range_f64(Some(f64::NAN), Some(1.5));
        assert_eq!(
            c,
            Constraint::Range {
                min: None,
                max: Number::from_f64(1.5),
            }
        );
        assert!(c.check(&json!(-3)));
        assert!(!c.check(&json!(2)));
    }

    #[test]
    fn range_explains_direction() {
        let c = Constraint::range(1, 100);
        assert_eq!(c.explain(&json!(500)).as_deref(), Some("exceeds maximum"));
        assert_eq!(c.explain(&json!(0)).as_deref(), Some("below minimum"));
        assert_eq!(c.explain(&json!("x")).as_deref(), Some("expected number"));
        assert_eq!(c.explain(&json!(50)), None);
    }

    #[rstest]
    #[case(json!("a"), true)]
    #[case(json!("ten chars!"), true)]
    #[case(json!(""), false)]
    #[case(json!("eleven char"), false)]
    #[case(json!(["x"]), true)]
    #[case(json!([]), false)]
    #[case(json!(5), false)]
    fn length_checks_strings_and_arrays(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(Constraint::length(1, 10).check(&value), expected);
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let c = Constraint::max_length(3);
        assert!(c.check(&json!("äöü")));
        assert!(!c.check(&json!("äöüß")));
    }

    #[test]
    fn enum_membership_and_dedup() {
        let c = Constraint::one_of(["apple", "pear", "apple"]);
        assert_eq!(
            c,
            Constraint::Enum {
                values: vec![json!("apple"), json!("pear")],
            }
        );
        assert!(c.check(&json!("pear")));
        assert!(!c.check(&json!("plum")));
        assert_eq!(
            c.explain(&json!("plum")).as_deref(),
            Some("not one of the allowed values")
        );
    }

    #[test]
    fn enum_compares_numbers_by_value() {
        let c = Constraint::one_of([1, 2]);
        assert!(c.check(&json!(2.0)));
        assert!(c.check(&json!(1)));
        assert!(!c.check(&json!(2.5)));
        assert!(!c.check(&json!("2")));

        let c = Constraint::one_of([json!(1), json!(1.0), json!(3)]);
        assert_eq!(
            c,
            Constraint::Enum {
                values: vec![json!(1), json!(3)],
            }
        );
    }

    #[test]
    fn deserialized_enum_documents_unique_values() {
        let c: Constraint =
            serde_json::from_value(json!({"constraint": "enum", "values": [1, 1, 2.0, 2, "a"]}))
                .unwrap();
        assert_eq!(Value::Object(c.describe()), json!({"enum": [1, 2.0, "a"]}));
        assert!(c.check(&json!(2)));
    }

    #[test]
    fn list_of_applies_every_constraint_to_every_element() {
        let c = Constraint::list_of(vec![Constraint::range(0, 10)]);
        assert!(c.check(&json!([])));
        assert!(c.check(&json!([0, 5, 10])));
        assert!(!c.check(&json!([1, 5, 20])));
        assert_eq!(
            c.explain(&json!([1, 5, 20])).as_deref(),
            Some("element at index 2: exceeds maximum")
        );
        assert_eq!(c.explain(&json!({})).as_deref(), Some("expected array"));
    }

    #[test]
    fn list_of_does_not_truncate_on_length_mismatch() {
        // One constraint list, many elements: every element is checked.
        let c = Constraint::list_of(vec![Constraint::min_length(2)]);
        assert!(!c.check(&json!(["ab", "cd", "ef", "g"])));
    }

    #[test]
    fn object_shape_ignores_unknown_and_absent_fields() {
        let mut fields = IndexMap::new();
        fields.insert("age".to_owned(), vec![Constraint::range(0, 150)]);
        let c = Constraint::object_shape(fields);

        assert!(c.check(&json!({})));
        assert!(c.check(&json!({"extra": "whatever"})));
        assert!(c.check(&json!({"age": 30})));
        assert!(!c.check(&json!({"age": 200})));
        assert_eq!(
            c.explain(&json!({"age": 200})).as_deref(),
            Some("field `age`: exceeds maximum")
        );
        assert!(!c.check(&json!([1])));
    }

    #[test]
    fn required_fields_lists_every_missing_name() {
        let c = Constraint::required_fields(["email", "name"]);
        assert!(c.check(&json!({"email": "a@b.com", "name": "A"})));
        assert_eq!(
            c.explain(&json!({})).as_deref(),
            Some("missing required field(s): email, name")
        );
        assert_eq!(c.explain(&json!("x")).as_deref(), Some("expected object"));
    }

    #[test]
    fn nested_explanations_compose() {
        let mut inner = IndexMap::new();
        inner.insert("port".to_owned(), vec![Constraint::range(1, 65535)]);
        let c = Constraint::list_of(vec![Constraint::object_shape(inner)]);

        assert_eq!(
            c.explain(&json!([{"port": 80}, {"port": 0}])).as_deref(),
            Some("element at index 1: field `port`: below minimum")
        );
    }

    #[test]
    fn describe_uses_swagger_keywords() {
        assert_eq!(
            Value::Object(Constraint::range(1, 100).describe()),
            json!({"minimum": 1, "maximum": 100})
        );
        assert_eq!(
            Value::Object(Constraint::length(1, 10).describe()),
            json!({"minLength": 1, "maxLength": 10})
        );
        assert_eq!(
            Value::Object(Constraint::one_of([1, 2]).describe()),
            json!({"enum": [1, 2]})
        );
        assert_eq!(
            Value::Object(Constraint::required_fields(["a"]).describe()),
            json!({"required": ["a"]})
        );
        assert!(Constraint::required_fields(Vec::<String>::new())
            .describe()
            .is_empty());
    }

    #[test]
    fn describe_structural_variants() {
        let mut fields = IndexMap::new();
        fields.insert("name".to_owned(), vec![Constraint::max_length(20)]);
        let c = Constraint::list_of(vec![Constraint::object_shape(fields)]);
        assert_eq!(
            Value::Object(c.describe()),
            json!({"items": {"properties": {"name": {"maxLength": 20}}}})
        );
    }

    #[test]
    fn describe_all_merges_in_order() {
        let merged = describe_all(&[Constraint::min(1), Constraint::max_length(4)]);
        assert_eq!(Value::Object(merged), json!({"minimum": 1, "maxLength": 4}));
    }

    #[test]
    fn verify_rejects_impossible_constraints() {
        assert_eq!(
            Constraint::range(10, 1).verify(),
            Err(ConstraintError::InvertedRange {
                min: "10".into(),
                max: "1".into(),
            })
        );
        assert_eq!(
            Constraint::length(5, 2).verify(),
            Err(ConstraintError::InvertedLength { min: 5, max: 2 })
        );
        assert_eq!(
            Constraint::one_of(Vec::<Value>::new()).verify(),
            Err(ConstraintError::EmptyEnum)
        );
        assert_eq!(
            Constraint::list_of(vec![Constraint::length(3, 1)]).verify(),
            Err(ConstraintError::InvertedLength { min: 3, max: 1 })
        );
        assert!(Constraint::range(1, 1).verify().is_ok());
    }

    #[test]
    fn serde_is_tagged_by_constraint() {
        let c = Constraint::range(1, 100);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json, json!({"constraint": "range", "min": 1, "max": 100}));

        let parsed: Constraint =
            serde_json::from_value(json!({"constraint": "length", "max": 8})).unwrap();
        assert_eq!(parsed, Constraint::max_length(8));
    }
}
