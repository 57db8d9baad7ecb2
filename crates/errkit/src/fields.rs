//! Structured logging fields collected from error chains.

use crate::{KV, Kind};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;

/// Value of a logging field.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Metadata value or kind name
    Value(JsonValue),
    /// Rendered frames, outermost first
    StackTrace(Vec<String>),
    /// Fields of a joined child
    Nested(Fields),
}

impl FieldValue {
    /// The plain value, if this is one.
    pub fn as_value(&self) -> Option<&JsonValue> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// The rendered frames, if this is a stack trace.
    pub fn as_stack_trace(&self) -> Option<&[String]> {
        match self {
            Self::StackTrace(frames) => Some(frames),
            _ => None,
        }
    }

    /// The nested fields, if this is a joined child.
    pub fn as_nested(&self) -> Option<&Fields> {
        match self {
            Self::Nested(fields) => Some(fields),
            _ => None,
        }
    }
}

impl From<&Kind> for FieldValue {
    fn from(kind: &Kind) -> Self {
        Self::Value(JsonValue::String(kind.as_str().to_string()))
    }
}

/// Ordered key/value fields for structured logging.
///
/// Keys may repeat; entries keep the order in which the chain was walked.
/// Serializes as a flat `[key, value, key, value, …]` sequence and
/// displays as that sequence in JSON.
///
/// ```
/// use errkit::{KV, Kind};
///
/// let err = errkit::new!("denied", Kind::new("auth"), KV::new("user", "ada"), errkit::NO_FRAME);
/// let fields = err.fields();
/// assert_eq!(fields.to_string(), r#"["user","ada","err_kind","auth"]"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<(String, FieldValue)>);

impl Fields {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Keys in order, repeats included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    /// The first entry for `key`.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, value)| value)
    }

    /// The fields as a JSON array of alternating keys and values.
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }

    pub(crate) fn push(&mut self, key: impl Into<String>, value: FieldValue) {
        self.0.push((key.into(), value));
    }

    pub(crate) fn extend_kvs(&mut self, kvs: &[KV]) {
        self.0.extend(
            kvs.iter()
                .map(|kv| (kv.key.clone(), FieldValue::Value(kv.value.clone()))),
        );
    }
}

impl Extend<(String, FieldValue)> for Fields {
    fn extend<I: IntoIterator<Item = (String, FieldValue)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Fields {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len() * 2))?;
        for (key, value) in &self.0 {
            seq.serialize_element(key)?;
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
