//! Instance identifiers: sequences of selectors addressing a descendant.

use std::fmt;
use std::ops::Deref;

use indexmap::IndexMap;

use crate::error::InstanceError;
use crate::instance::Instance;
use crate::value::{QName, Value};

/// One addressing step of an [`InstancePath`].
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Object member by name: `/name`.
    MemberName(QName),
    /// Array entry by position: `[3]`.
    EntryIndex(usize),
    /// Leaf-list entry by value: `[.=v]`.
    EntryValue(Value),
    /// List entry by key members: `[k=v]`.
    EntryKeys(IndexMap<QName, Value>),
}

impl Selector {
    /// Return the part of `container` addressed by the receiver, if any.
    pub fn peek_step<'a>(&self, container: &'a Value) -> Option<&'a Value> {
        match self {
            Selector::MemberName(name) => container.get(name),
            Selector::EntryIndex(index) => container.as_array()?.get(*index),
            Selector::EntryValue(value) => container.as_array()?.iter().find(|en| en.matches(value)),
            Selector::EntryKeys(keys) => container
                .as_array()?
                .iter()
                .find(|en| keys_match(en, keys)),
        }
    }

    /// Return the instance below `inst` addressed by the receiver.
    pub fn goto_step(&self, inst: &Instance) -> Result<Instance, InstanceError> {
        match self {
            Selector::MemberName(name) => inst.member(name),
            Selector::EntryIndex(index) => inst.entry(*index),
            Selector::EntryValue(value) => {
                let Value::Array(arr) = inst.value() else {
                    return Err(InstanceError::type_error(inst, "entry of non-array"));
                };
                match arr.iter().position(|en| en.matches(value)) {
                    Some(index) => inst.entry(index),
                    None => Err(InstanceError::nonexistent(inst, format!("entry '{value}'"))),
                }
            }
            Selector::EntryKeys(keys) => inst.look_up(keys),
        }
    }
}

/// Entries that aren't objects or lack a key member don't match.
fn keys_match(entry: &Value, keys: &IndexMap<QName, Value>) -> bool {
    keys.iter().all(|(k, v)| entry.get(k).is_some_and(|ev| ev.matches(v)))
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::MemberName(name) => write!(f, "/{name}"),
            Selector::EntryIndex(index) => write!(f, "[{index}]"),
            Selector::EntryValue(value) => write!(f, "[.={value}]"),
            Selector::EntryKeys(keys) => {
                for (k, v) in keys {
                    write!(f, "[{k}={}]", serde_json::Value::from(v))?;
                }
                Ok(())
            }
        }
    }
}

/// Ordered sequence of selectors, relative to some instance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstancePath(Vec<Selector>);

impl InstancePath {
    /// An empty path, addressing the instance it is applied to.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `selector` in place.
    pub fn push(&mut self, selector: Selector) {
        self.0.push(selector);
    }

    /// Append a member step.
    ///
    /// ```
    /// use datatree_instance::InstancePath;
    ///
    /// let path = InstancePath::new().member("ietf-interfaces:interfaces").member("interface");
    /// assert_eq!(path.to_string(), "/ietf-interfaces:interfaces/interface");
    /// ```
    pub fn member(mut self, name: impl Into<QName>) -> Self {
        self.0.push(Selector::MemberName(name.into()));
        self
    }

    /// Append an entry step by position.
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(Selector::EntryIndex(index));
        self
    }

    /// Append a leaf-list entry step, matched by value.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.0.push(Selector::EntryValue(value.into()));
        self
    }

    /// Append a list entry step, matched by key members.
    ///
    /// ```
    /// use datatree_instance::InstancePath;
    ///
    /// let path = InstancePath::new().member("interface").keys([("name", "eth0")]);
    /// assert_eq!(path.to_string(), r#"/interface[name="eth0"]"#);
    /// ```
    pub fn keys<K, V, I>(mut self, keys: I) -> Self
    where
        K: Into<QName>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.0.push(Selector::EntryKeys(
            keys.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ));
        self
    }
}

impl Deref for InstancePath {
    type Target = [Selector];

    fn deref(&self) -> &[Selector] {
        &self.0
    }
}

impl From<Vec<Selector>> for InstancePath {
    fn from(selectors: Vec<Selector>) -> Self {
        Self(selectors)
    }
}

impl FromIterator<Selector> for InstancePath {
    fn from_iter<T: IntoIterator<Item = Selector>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a InstancePath {
    type Item = &'a Selector;
    type IntoIter = std::slice::Iter<'a, Selector>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sel in &self.0 {
            write!(f, "{sel}")?;
        }
        Ok(())
    }
}
