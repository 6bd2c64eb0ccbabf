//! Untyped request input, as handed over by the host's request parser.

use bytes::Bytes;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::location::ParamLocation;

/// An uploaded file, passed through to handlers without parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileUpload {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip)]
    pub bytes: Bytes,
}

impl FileUpload {
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size of the upload in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One raw parameter value before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// A single text value (query string, header, form field, path segment).
    Text(String),
    /// A repeated text value, e.g. `?tag=a&tag=b`.
    List(Vec<String>),
    /// A value that already arrived structured, e.g. a JSON body field.
    Json(Value),
    File(FileUpload),
}

impl RawInput {
    /// JSON `null` counts as an absent value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Json(Value::Null))
    }
}

impl From<&str> for RawInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for RawInput {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Value> for RawInput {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<FileUpload> for RawInput {
    fn from(file: FileUpload) -> Self {
        Self::File(file)
    }
}

/// Raw values keyed by parameter name.
pub type RawInputs = IndexMap<String, RawInput>;

/// Raw values split by where they were found in the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRequest {
    pub path: RawInputs,
    pub headers: RawInputs,
    pub query: RawInputs,
    pub body: RawInputs,
}

impl RawRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_path(mut self, name: impl Into<String>, value: impl Into<RawInput>) -> Self {
        self.path.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<RawInput>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<RawInput>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, name: impl Into<String>, value: impl Into<RawInput>) -> Self {
        self.body.insert(name.into(), value.into());
        self
    }

    /// Spread the fields of a parsed JSON body into body inputs.
    ///
    /// A body that is not a JSON object contributes nothing.
    #[must_use]
    pub fn with_json_body(mut self, body: Value) -> Self {
        if let Value::Object(fields) = body {
            self.body
                .extend(fields.into_iter().map(|(k, v)| (k, RawInput::Json(v))));
        }
        self
    }

    /// Looks up a value in one location. Header names match case-insensitively.
    #[must_use]
    pub fn get(&self, location: ParamLocation, name: &str) -> Option<&RawInput> {
        match location {
            ParamLocation::Path => self.path.get(name),
            ParamLocation::Query => self.query.get(name),
            ParamLocation::Body => self.body.get(name),
            ParamLocation::Header => self
                .headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value),
        }
    }

    /// Path values as plain text, for handlers that read route arguments.
    #[must_use]
    pub fn path_args(&self) -> IndexMap<String, String> {
        self.path
            .iter()
            .filter_map(|(name, value)| match value {
                RawInput::Text(text) => Some((name.clone(), text.clone())),
                RawInput::List(items) => items.first().map(|t| (name.clone(), t.clone())),
                RawInput::Json(Value::String(text)) => Some((name.clone(), text.clone())),
                RawInput::Json(other) => Some((name.clone(), other.to_string())),
                RawInput::File(_) => None,
            })
            .collect()
    }
}
