//! Documents as held by the document store
//!
//! A document is a JSON object carrying its identifier in the reserved
//! `_id` attribute. Everything else is free-form and may be indexed by
//! the search layer through field paths.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved attribute holding the document identifier
pub const ID_FIELD: &str = "_id";

/// A JSON document with a string `_id`
///
/// Serializes as the bare JSON object, so `{"_id": "1", "text": "..."}`
/// round-trips through serde unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Document {
    id: String,
    body: Map<String, Value>,
}

impl Document {
    /// Create a document from an id and a set of attributes
    ///
    /// Any `_id` present in `fields` is overwritten by `id`.
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        let id = id.into();
        let mut body = fields;
        body.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        Document { id, body }
    }

    /// Build a document from a JSON value
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocument` if the value is not an object or has no
    /// string `_id`.
    pub fn from_value(value: Value) -> Result<Self> {
        let body = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::InvalidDocument(format!(
                    "expected a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };
        let id = match body.get(ID_FIELD) {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            _ => {
                return Err(Error::InvalidDocument(
                    "document must have a non-empty string _id".to_string(),
                ))
            }
        };
        Ok(Document { id, body })
    }

    /// Document identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Top-level attribute lookup
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }

    /// All attributes, including `_id`
    pub fn fields(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Convert back into a JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }
}

impl TryFrom<Value> for Document {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Document::from_value(value)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        doc.into_value()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
