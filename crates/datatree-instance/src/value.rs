//! Instance value model.
//!
//! Mirrors the JSON data model, but arrays and objects sit behind [`Arc`] so
//! that cloning a value never copies its subtree. Zipper operations rely on
//! that: every crumb keeps shared handles to untouched siblings.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Number;

/// Member name, optionally qualified as `prefix:local`.
pub type QName = String;

/// Ordered sequence of values.
pub type Array = Arc<Vec<Value>>;

/// Mapping from qualified member names to values.
///
/// Insertion order is preserved; equality ignores it.
pub type Object = Arc<IndexMap<QName, Value>>;

/// A JSON-compatible instance value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Array),
    Object(Object),
}

impl Value {
    /// Build an array value from its entries.
    pub fn array(entries: Vec<Value>) -> Self {
        Value::Array(Arc::new(entries))
    }

    /// Build an object value from its members.
    pub fn object(members: IndexMap<QName, Value>) -> Self {
        Value::Object(Arc::new(members))
    }

    /// `true` for JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `true` for integers and floats alike.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// `true` for arrays, i.e. lists and leaf-lists.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// `true` for objects, i.e. containers and list entries.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// The string content, without quotes.
    ///
    /// ```
    /// use datatree_instance::Value;
    ///
    /// assert_eq!(Value::from("eth0").as_str(), Some("eth0"));
    /// assert_eq!(Value::from(1i64).as_str(), None);
    /// ```
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value of a number. Booleans and numeric strings are not
    /// coerced here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Shared handle to the entries of an array.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Shared handle to the members of an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Cheap identity check: containers must be the same allocation,
    /// scalars must be equal.
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => false,
            _ => self == other,
        }
    }

    /// Equality used for matching entries: like `==`, except that numbers
    /// compare by numeric value, so `1` matches `1.0`.
    ///
    /// ```
    /// use datatree_instance::Value;
    /// use serde_json::json;
    ///
    /// assert!(Value::from(json!([1, {"a": 2}])).matches(&Value::from(json!([1.0, {"a": 2.0}]))));
    /// assert_ne!(Value::from(json!(1)), Value::from(json!(1.0)));
    /// ```
    pub fn matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => numbers_match(a, b),
            (Value::Array(a), Value::Array(b)) => {
                Arc::ptr_eq(a, b)
                    || (a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.matches(y)))
            }
            (Value::Object(a), Value::Object(b)) => {
                Arc::ptr_eq(a, b)
                    || (a.len() == b.len()
                        && a.iter().all(|(k, x)| b.get(k).is_some_and(|y| x.matches(y))))
            }
            _ => self == other,
        }
    }

    /// Look up an object member. `None` for missing members and non-objects.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(name))
    }
}

impl fmt::Display for Value {
    /// Scalars print bare (strings without quotes); containers print as JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Array(_) | Value::Object(_) => {
                write!(f, "{}", serde_json::Value::from(self))
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        serde_json::Value::from(&value)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&serde_json::Value::from(self), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <serde_json::Value as serde::Deserialize>::deserialize(deserializer).map(Value::from)
    }
}

// Integers compare exactly; anything involving a float goes through f64.
fn numbers_match(a: &Number, b: &Number) -> bool {
    if a == b {
        return true;
    }
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    if a.is_f64() || b.is_f64() {
        return matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x == y);
    }
    false
}

/// Split a qualified name into its optional prefix and local part.
pub fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}
