//! The node contract and XPath scalar coercions.

use std::hash::Hash;

use datatree_instance::{Instance, Value};

/// A node that can be a member of a [`NodeSet`](crate::NodeSet).
pub trait XPathNode: Clone {
    /// Identity used to deduplicate node-sets.
    type Path: Eq + Hash + Clone;

    fn path(&self) -> Self::Path;

    fn value(&self) -> &Value;

    /// Internal nodes take no part in value comparisons.
    fn is_internal(&self) -> bool;

    /// XPath string-value of the node.
    fn string_value(&self) -> String {
        string_of(self.value())
    }
}

impl XPathNode for Instance {
    type Path = String;

    fn path(&self) -> String {
        self.pointer()
    }

    fn value(&self) -> &Value {
        Instance::value(self)
    }

    fn is_internal(&self) -> bool {
        matches!(Instance::value(self), Value::Object(_) | Value::Array(_))
    }
}

/// String form of a scalar value. Containers and null have none.
pub fn string_of(value: &Value) -> String {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
    }
}

/// Numeric coercion of a value; `None` where it has no numeric reading.
pub fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => parse_number(s),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parse a decimal number, ignoring surrounding whitespace.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_of() {
        assert_eq!(string_of(&Value::from(json!("x"))), "x");
        assert_eq!(string_of(&Value::from(json!(3))), "3");
        assert_eq!(string_of(&Value::from(json!(true))), "true");
        assert_eq!(string_of(&Value::from(json!([1]))), "");
    }

    #[test]
    fn test_number_of() {
        assert_eq!(number_of(&Value::from(json!(3))), Some(3.0));
        assert_eq!(number_of(&Value::from(json!(" 2.5 "))), Some(2.5));
        assert_eq!(number_of(&Value::from(json!(false))), Some(0.0));
        assert_eq!(number_of(&Value::from(json!("abc"))), None);
        assert_eq!(number_of(&Value::from(json!(null))), None);
    }

    #[test]
    fn test_instance_node() {
        let root = Instance::from_json(json!({"a": {"b": 1}}));
        assert!(root.is_internal());
        let b = root.member("a").and_then(|a| a.member("b")).unwrap();
        assert!(!b.is_internal());
        assert_eq!(b.path(), "/a/b");
        assert_eq!(b.string_value(), "1");
    }
}
