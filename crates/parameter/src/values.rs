use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::input::FileUpload;

/// A validated parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Json(Value),
    File(FileUpload),
}

impl ParamValue {
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::File(_) => None,
        }
    }

    #[must_use]
    pub fn as_file(&self) -> Option<&FileUpload> {
        match self {
            Self::File(file) => Some(file),
            Self::Json(_) => None,
        }
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// The validation bag: every accepted parameter, keyed by name.
///
/// Only parameters that were supplied or have a default appear. Order
/// follows declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterBag {
    values: IndexMap<String, ParamValue>,
}

impl ParameterBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// The JSON value of `name`, if present and not a file.
    #[must_use]
    pub fn get_json(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(ParamValue::as_json)
    }

    /// The upload stored under `name`, if any.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&FileUpload> {
        self.get(name).and_then(ParamValue::as_file)
    }

    /// Deserializes the value of `name` into `T`.
    ///
    /// Returns `None` if the parameter is absent or a file.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Option<Result<T, serde_json::Error>> {
        self.get_json(name)
            .map(|value| serde_json::from_value(value.clone()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// JSON view of the bag. Files appear as their metadata.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(name, value)| {
                    let json = match value {
                        ParamValue::Json(v) => v.clone(),
                        ParamValue::File(file) => {
                            serde_json::to_value(file).unwrap_or(Value::Null)
                        }
                    };
                    (name.clone(), json)
                })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ParameterBag {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = indexmap::map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl FromIterator<(String, ParamValue)> for ParameterBag {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
