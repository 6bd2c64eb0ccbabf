//! Conversion of raw request input into typed JSON values.
//!
//! Coercion runs before any constraint. A value that cannot be read as its
//! declared kind yields a single `coercion` violation and the constraints of
//! that parameter are skipped.

use routeguard_validator::{Violation, number};
use serde_json::{Number, Value};

use crate::input::RawInput;
use crate::kind::TypeKind;
use crate::schema::ParamSchema;
use crate::values::ParamValue;

/// Coerces one raw input to the kind declared by `schema`.
pub fn coerce(schema: &ParamSchema, raw: &RawInput) -> Result<ParamValue, Violation> {
    let failed = || Violation::coercion(schema.kind.expected());

    match (&schema.kind, raw) {
        (TypeKind::File, RawInput::File(file)) => Ok(ParamValue::File(file.clone())),
        (TypeKind::File, _) | (_, RawInput::File(_)) => Err(failed()),
        (_, RawInput::Text(text)) => coerce_text(schema, text)
            .map(ParamValue::Json)
            .ok_or_else(failed),
        (TypeKind::Array, RawInput::List(entries)) => coerce_list(schema, entries)
            .map(ParamValue::Json)
            .ok_or_else(failed),
        (_, RawInput::List(entries)) => entries
            .first()
            .and_then(|first| coerce_text(schema, first))
            .map(ParamValue::Json)
            .ok_or_else(failed),
        (_, RawInput::Json(value)) => coerce_json(schema, value)
            .map(ParamValue::Json)
            .ok_or_else(failed),
    }
}

/// Coerces a declared default.
///
/// Defaults are written by the route author as JSON, so they go through the
/// same path as a JSON body field.
pub fn coerce_default(schema: &ParamSchema, default: &Value) -> Option<Value> {
    match schema.kind {
        TypeKind::File => None,
        _ => coerce_json(schema, default),
    }
}

/// Reads `text` as the declared kind.
pub fn coerce_text(schema: &ParamSchema, text: &str) -> Option<Value> {
    match &schema.kind {
        TypeKind::String | TypeKind::Format(_) => Some(Value::String(text.to_owned())),
        TypeKind::Boolean => Some(Value::Bool(parse_bool(text))),
        TypeKind::Integer => parse_integer(text).map(Value::Number),
        TypeKind::Number => parse_number(text).map(Value::Number),
        TypeKind::Object | TypeKind::Dictionary => {
            match serde_json::from_str::<Value>(text).ok()? {
                object @ Value::Object(_) => Some(object),
                _ => None,
            }
        }
        TypeKind::Array => match serde_json::from_str::<Value>(text).ok()? {
            array @ Value::Array(_) => Some(array),
            _ => None,
        },
        TypeKind::File => None,
    }
}

/// Accepts an already-structured value when its JSON type fits the kind.
///
/// JSON strings are re-read as text, so `"42"` is a valid integer.
pub fn coerce_json(schema: &ParamSchema, value: &Value) -> Option<Value> {
    match (&schema.kind, value) {
        (_, Value::String(text)) => coerce_text(schema, text),
        (TypeKind::String | TypeKind::Format(_), Value::Number(n)) => {
            Some(Value::String(n.to_string()))
        }
        (TypeKind::String | TypeKind::Format(_), Value::Bool(b)) => {
            Some(Value::String(b.to_string()))
        }
        (TypeKind::Boolean, Value::Bool(_))
        | (TypeKind::Number, Value::Number(_))
        | (TypeKind::Object | TypeKind::Dictionary, Value::Object(_))
        | (TypeKind::Array, Value::Array(_)) => Some(value.clone()),
        (TypeKind::Integer, Value::Number(n)) => integral(n).map(Value::Number),
        _ => None,
    }
}

/// Repeated text values, each read with the array's item kind.
fn coerce_list(schema: &ParamSchema, entries: &[String]) -> Option<Value> {
    let item = schema.item()?;
    entries
        .iter()
        .map(|entry| coerce_text(item, entry))
        .collect::<Option<Vec<_>>>()
        .map(Value::Array)
}

/// `true` and `yes` in any case are true; anything else is false.
#[must_use]
pub fn parse_bool(text: &str) -> bool {
    let text = text.trim();
    text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("yes")
}

/// Parses a signed integer, falling back to unsigned for large values.
#[must_use]
pub fn parse_integer(text: &str) -> Option<Number> {
    let text = text.trim();
    text.parse::<i64>()
        .map(Number::from)
        .or_else(|_| text.parse::<u64>().map(Number::from))
        .ok()
}

/// Parses a finite number. Integral text stays an integer.
#[must_use]
pub fn parse_number(text: &str) -> Option<Number> {
    parse_integer(text).or_else(|| {
        text.trim()
            .parse::<f64>()
            .ok()
            .and_then(number::from_f64)
    })
}

/// Integers pass; floats with no fractional part inside the exact-f64 range
/// are narrowed.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn integral(n: &Number) -> Option<Number> {
    const EXACT: f64 = 9_007_199_254_740_992.0;
    if n.is_i64() || n.is_u64() {
        return Some(n.clone());
    }
    n.as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() <= EXACT)
        .map(|f| Number::from(f as i64))
}
