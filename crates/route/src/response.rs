use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// One documented response of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseSpec {
    pub code: u16,
    pub description: String,
    #[serde(default)]
    pub example: Value,
}

impl ResponseSpec {
    #[must_use]
    pub fn new(code: u16, description: impl Into<String>, example: Value) -> Self {
        Self {
            code,
            description: description.into(),
            example,
        }
    }

    /// Response whose example is `{"message": text}` and whose description
    /// is the text itself.
    #[must_use]
    pub fn message(code: u16, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            code,
            example: json!({ "message": text }),
            description: text,
        }
    }

    /// `{description, examples: {"application/json": example}}`.
    #[must_use]
    pub fn to_documentation(&self) -> Value {
        let mut examples = Map::new();
        examples.insert("application/json".to_owned(), self.example.clone());

        let mut doc = Map::new();
        doc.insert(
            "description".to_owned(),
            Value::String(self.description.clone()),
        );
        doc.insert("examples".to_owned(), Value::Object(examples));
        Value::Object(doc)
    }
}
