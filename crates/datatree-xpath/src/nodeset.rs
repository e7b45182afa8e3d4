//! XPath node-sets.

use std::fmt;

use datatree_instance::Value;
use indexmap::IndexMap;

use crate::node::{number_of, parse_number, XPathNode};

/// Result type of XPath expressions.
#[derive(Debug, Clone)]
pub enum XPathValue<N> {
    NodeSet(NodeSet<N>),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl<N: XPathNode> XPathValue<N> {
    /// Boolean coercion as per XPath 1.0.
    pub fn to_bool(&self) -> bool {
        match self {
            XPathValue::NodeSet(ns) => !ns.is_empty(),
            XPathValue::String(s) => !s.is_empty(),
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::Boolean(b) => *b,
        }
    }

    /// Numeric coercion as per XPath 1.0; NaN where there is none.
    pub fn to_number(&self) -> f64 {
        let n = match self {
            XPathValue::NodeSet(ns) => ns.to_number(),
            XPathValue::String(s) => parse_number(s),
            XPathValue::Number(n) => Some(*n),
            XPathValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        };
        n.unwrap_or(f64::NAN)
    }
}

impl<N: XPathNode> fmt::Display for XPathValue<N> {
    /// String coercion as per XPath 1.0.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XPathValue::NodeSet(ns) => f.write_str(&ns.to_string_value()),
            XPathValue::String(s) => f.write_str(s),
            XPathValue::Number(n) => write!(f, "{n}"),
            XPathValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl<N> From<NodeSet<N>> for XPathValue<N> {
    fn from(ns: NodeSet<N>) -> Self {
        XPathValue::NodeSet(ns)
    }
}

impl<N> From<&str> for XPathValue<N> {
    fn from(s: &str) -> Self {
        XPathValue::String(s.to_string())
    }
}

impl<N> From<String> for XPathValue<N> {
    fn from(s: String) -> Self {
        XPathValue::String(s)
    }
}

impl<N> From<f64> for XPathValue<N> {
    fn from(n: f64) -> Self {
        XPathValue::Number(n)
    }
}

impl<N> From<bool> for XPathValue<N> {
    fn from(b: bool) -> Self {
        XPathValue::Boolean(b)
    }
}

/// Scalar operand of a comparison.
#[derive(Debug, Clone, Copy)]
enum Literal<'a> {
    String(&'a str),
    Number(f64),
    Boolean(bool),
}

impl Literal<'_> {
    fn to_number(self) -> Option<f64> {
        match self {
            Literal::String(s) => parse_number(s),
            Literal::Number(n) => Some(n),
            Literal::Boolean(b) => Some(if b { 1.0 } else { 0.0 }),
        }
    }
}

/// Numeric reading of a number or boolean member. Strings don't count.
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(_) | Value::Bool(_) => number_of(value),
        _ => None,
    }
}

/// Ordered set of nodes, unique by path.
///
/// Adding a node whose path is already present replaces the earlier node
/// but keeps its position.
#[derive(Debug, Clone)]
pub struct NodeSet<N> {
    nodes: Vec<N>,
}

impl<N> Default for NodeSet<N> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<N: XPathNode> FromIterator<N> for NodeSet<N> {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        let mut index: IndexMap<N::Path, N> = IndexMap::new();
        for node in iter {
            index.insert(node.path(), node);
        }
        Self {
            nodes: index.into_values().collect(),
        }
    }
}

impl<N: XPathNode> From<Vec<N>> for NodeSet<N> {
    fn from(nodes: Vec<N>) -> Self {
        nodes.into_iter().collect()
    }
}

impl<N> IntoIterator for NodeSet<N> {
    type Item = N;
    type IntoIter = std::vec::IntoIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a, N> IntoIterator for &'a NodeSet<N> {
    type Item = &'a N;
    type IntoIter = std::slice::Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl<N: XPathNode> NodeSet<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first(&self) -> Option<&N> {
        self.nodes.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, N> {
        self.nodes.iter()
    }

    /// Nodes taking part in value comparisons.
    fn members(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter().filter(|n| !n.is_internal())
    }

    /// Union of the receiver and `other`; on equal paths the node from
    /// `other` wins.
    pub fn union(&self, other: &NodeSet<N>) -> NodeSet<N> {
        self.nodes.iter().chain(other.nodes.iter()).cloned().collect()
    }

    /// Apply `trans` to every node and merge the results.
    pub fn bind<F>(&self, mut trans: F) -> NodeSet<N>
    where
        F: FnMut(&N) -> NodeSet<N>,
    {
        self.nodes.iter().flat_map(|n| trans(n)).collect()
    }

    /// Numeric value of the first node, internal or not.
    ///
    /// `None` for an empty set or a first value without a numeric reading.
    pub fn to_number(&self) -> Option<f64> {
        number_of(self.first()?.value())
    }

    /// String value of the first node; empty for an empty set.
    pub fn to_string_value(&self) -> String {
        self.first().map(|n| n.string_value()).unwrap_or_default()
    }

    /// Against another node-set, each of its non-internal nodes is tried as a
    /// string operand.
    fn compare<F>(&self, target: &XPathValue<N>, op: F) -> bool
    where
        F: Fn(&Self, Literal<'_>) -> bool,
    {
        match target {
            XPathValue::NodeSet(ns) => ns
                .members()
                .any(|n| op(self, Literal::String(&n.string_value()))),
            XPathValue::String(s) => op(self, Literal::String(s)),
            XPathValue::Number(n) => op(self, Literal::Number(*n)),
            XPathValue::Boolean(b) => op(self, Literal::Boolean(*b)),
        }
    }

    fn equals_literal(&self, lit: Literal<'_>) -> bool {
        self.members().any(|n| match lit {
            Literal::String(s) => n.string_value() == s,
            _ => match numeric_value(n.value()) {
                Some(x) => Some(x) == lit.to_number(),
                None => false,
            },
        })
    }

    fn not_equals_literal(&self, lit: Literal<'_>) -> bool {
        self.members().any(|n| match lit {
            Literal::String(s) => n.string_value() != s,
            _ => match numeric_value(n.value()) {
                Some(x) => Some(x) != lit.to_number(),
                None => true,
            },
        })
    }

    fn ordering<F>(&self, target: &XPathValue<N>, cmp: F) -> bool
    where
        F: Fn(f64, f64) -> bool,
    {
        self.compare(target, |ns, lit| {
            let Some(rhs) = lit.to_number() else {
                return false;
            };
            ns.members()
                .filter_map(|n| number_of(n.value()))
                .any(|lhs| cmp(lhs, rhs))
        })
    }

    /// XPath `=`: true if any non-internal node matches.
    pub fn equals(&self, target: &XPathValue<N>) -> bool {
        self.compare(target, Self::equals_literal)
    }

    /// XPath `!=`: true if any non-internal node differs.
    pub fn not_equals(&self, target: &XPathValue<N>) -> bool {
        self.compare(target, Self::not_equals_literal)
    }

    /// XPath `>`. False if `target` has no numeric reading.
    pub fn greater_than(&self, target: &XPathValue<N>) -> bool {
        self.ordering(target, |a, b| a > b)
    }

    pub fn less_than(&self, target: &XPathValue<N>) -> bool {
        self.ordering(target, |a, b| a < b)
    }

    pub fn greater_or_equal(&self, target: &XPathValue<N>) -> bool {
        self.ordering(target, |a, b| a >= b)
    }

    pub fn less_or_equal(&self, target: &XPathValue<N>) -> bool {
        self.ordering(target, |a, b| a <= b)
    }
}
