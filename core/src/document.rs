use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// An externally identified record of named text fields. Fields keep their declaration order,
/// which fixes the order of the analyzed token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: String,
    fields: Vec<(String, String)>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), fields: Vec::new() }
    }

    pub fn with_field(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.fields.push((name.into(), text.into()));
        self
    }

    pub fn id(&self) -> &str { &self.id }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields().find(|(k, _)| *k == name).map(|(_, v)| v)
    }

    /// Builds a document from a JSON object. `id` may be a string or a number; every other
    /// string member becomes a field, in object order. Non-string members are skipped.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::InvalidDocument("expected a JSON object".into()));
        };
        let id = match map.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => return Err(Error::InvalidDocument(format!("unsupported id {other}"))),
            None => return Err(Error::InvalidDocument("missing id".into())),
        };
        let mut doc = Document::new(id);
        for (name, v) in map {
            if name == "id" { continue; }
            if let Value::String(text) = v {
                doc.fields.push((name, text));
            }
        }
        Ok(doc)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("id", &self.id)?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
