//! Field specifications and text extraction
//!
//! A field is named by a dotted path (`"deep.structure.text"`). Extraction
//! walks the document one segment at a time; whenever it meets an array it
//! maps the rest of the path over every element and joins the results, so
//! `"nested.array.aField"` reaches into arrays of objects.

use serde_json::Value;
use sift_core::{Document, Error, Result};

/// One indexed field: its name, parsed path and boost
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    path: Vec<String>,
    boost: f64,
}

impl FieldSpec {
    /// Create a field spec
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for an empty name or a boost that is not a
    /// positive finite number.
    pub fn new(name: impl Into<String>, boost: f64) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::bad_request("field names must not be empty"));
        }
        if !boost.is_finite() || boost <= 0.0 {
            return Err(Error::bad_request(format!(
                "boost for field '{}' must be a positive number, got {}",
                name, boost
            )));
        }
        let path = name.split('.').map(str::to_string).collect();
        Ok(FieldSpec { name, path, boost })
    }

    /// Field name as declared
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path segments
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Relative weight of matches in this field
    pub fn boost(&self) -> f64 {
        self.boost
    }

    /// True for a dotted path
    pub fn is_nested(&self) -> bool {
        self.path.len() > 1
    }

    /// Text to index for this field, or `None` if there is none
    pub fn extract(&self, doc: &Document) -> Option<String> {
        let root = if self.is_nested() {
            walk(doc.get(&self.path[0]), &self.path[1..])
        } else {
            doc.get(&self.name).cloned()
        };
        root.as_ref().and_then(to_text)
    }
}

/// Resolve `path` below `value`, fanning out over arrays
fn walk(value: Option<&Value>, path: &[String]) -> Option<Value> {
    let value = value?;
    let Some((head, rest)) = path.split_first() else {
        return Some(value.clone());
    };
    match value {
        Value::Array(items) => Some(Value::Array(
            items
                .iter()
                .map(|item| walk(Some(item), path).unwrap_or(Value::Null))
                .collect(),
        )),
        Value::Object(map) => walk(map.get(head), rest),
        _ => None,
    }
}

/// Flatten an extracted value into indexable text
///
/// `null`, `false`, `0`, objects and empty strings have no text. Array
/// elements are joined with spaces.
fn to_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null | Value::Bool(false) | Value::Object(_) => return None,
        Value::Number(n) if n.as_f64() == Some(0.0) => return None,
        other => element_text(other),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn element_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Object(_) => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::Array(items) => items.iter().map(element_text).collect::<Vec<_>>().join(" "),
    }
}

/// Integers and whole floats both render without a fraction: `1.0` is `"1"`
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

/// Parse the `fields` option
///
/// Accepts an array of names (boost 1 each) or an object mapping names to
/// boosts. Declaration order is preserved.
///
/// # Errors
///
/// Returns `BadRequest` if fields are missing, empty, duplicated, or boosts
/// are not positive numbers.
pub fn parse_fields(value: &Value) -> Result<Vec<FieldSpec>> {
    let specs = match value {
        Value::Array(names) => names
            .iter()
            .map(|name| match name {
                Value::String(name) => FieldSpec::new(name.as_str(), 1.0),
                other => Err(Error::bad_request(format!(
                    "field names must be strings, got {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>>>()?,
        Value::Object(map) => map
            .iter()
            .map(|(name, boost)| {
                let boost = boost.as_f64().ok_or_else(|| {
                    Error::bad_request(format!("boost for field '{}' must be a number", name))
                })?;
                FieldSpec::new(name.as_str(), boost)
            })
            .collect::<Result<Vec<_>>>()?,
        _ => {
            return Err(Error::bad_request(
                "fields must be a list of names or a map of name to boost",
            ))
        }
    };
    validate_fields(specs)
}

/// Reject an empty or duplicated field list
pub fn validate_fields(specs: Vec<FieldSpec>) -> Result<Vec<FieldSpec>> {
    if specs.is_empty() {
        return Err(Error::bad_request("at least one field must be given"));
    }
    let mut seen = std::collections::HashSet::new();
    for spec in &specs {
        if !seen.insert(spec.name()) {
            return Err(Error::bad_request(format!(
                "field '{}' is listed more than once",
                spec.name()
            )));
        }
    }
    Ok(specs)
}
