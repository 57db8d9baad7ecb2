//! Key/value metadata attached to errors.

use serde_json::Value as JsonValue;

/// A single metadata pair.
///
/// Pairs keep their insertion order and duplicate keys are retained.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct KV {
    /// Field name
    pub key: String,
    /// Field value
    pub value: JsonValue,
}

impl KV {
    /// Create a pair from anything convertible to a JSON value.
    ///
    /// ```
    /// use errkit::KV;
    ///
    /// let kv = KV::new("attempts", 3);
    /// assert_eq!(kv.value, serde_json::json!(3));
    /// ```
    pub fn new(key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K, V> From<(K, V)> for KV
where
    K: Into<String>,
    V: Into<JsonValue>,
{
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// Build a list of [`KV`] pairs from alternating keys and values.
///
/// ```
/// let pairs = errkit::kvs!("user" => "ada", "attempts" => 3);
/// assert_eq!(pairs.len(), 2);
/// assert_eq!(pairs[0].key, "user");
/// ```
#[macro_export]
macro_rules! kvs {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let pairs: ::std::vec::Vec<$crate::KV> = ::std::vec![$($crate::KV::new($key, $value)),*];
        pairs
    }};
}
