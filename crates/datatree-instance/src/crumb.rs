//! Zipper contexts.
//!
//! A crumb holds whatever is needed to rebuild one ancestor level around the
//! focused value. Both kinds keep a shared handle to the parent container as
//! it was when the focus moved into it, so descending and stepping between
//! siblings never copies the parent. A copy is made only when a parent is
//! rebuilt around a changed focus, or when entries are inserted.
//!
//! The trace is a persistent stack of crumbs: pushing shares the existing
//! stack as its tail, so deriving an instance never copies the ancestors.

use std::sync::Arc;

use crate::value::{Array, Object, QName, Value};

/// One level of reconstructable parent context.
#[derive(Debug, Clone, PartialEq)]
pub enum Crumb {
    Member(MemberCrumb),
    Entry(EntryCrumb),
}

impl Crumb {
    /// JSON pointer fragment of the focused value (unescaped).
    pub fn pointer_fragment(&self) -> String {
        match self {
            Crumb::Member(cr) => cr.name.clone(),
            Crumb::Entry(cr) => cr.index.to_string(),
        }
    }

    /// Put the focused value back and return the parent value.
    pub fn zip(&self, value: Value) -> Value {
        match self {
            Crumb::Member(cr) => cr.zip(value),
            Crumb::Entry(cr) => cr.zip(value),
        }
    }
}

/// Context of an object member.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberCrumb {
    pub name: QName,
    /// The parent object. It lacks `name` when the member is new.
    pub object: Object,
}

impl MemberCrumb {
    pub fn new(name: QName, object: Object) -> Self {
        Self { name, object }
    }

    /// Members of the parent other than the focused one.
    pub fn siblings(&self) -> impl Iterator<Item = (&QName, &Value)> {
        self.object.iter().filter(move |(k, _)| **k != self.name)
    }

    /// The parent object with `value` under `name`.
    ///
    /// An existing member keeps its position, a new one is appended. The
    /// stored object is shared as is when `value` is what it already holds.
    pub fn rebuild(&self, value: Value) -> Object {
        if self
            .object
            .get(&self.name)
            .is_some_and(|old| old.same_as(&value))
        {
            return Arc::clone(&self.object);
        }
        let mut res = (*self.object).clone();
        res.insert(self.name.clone(), value);
        Arc::new(res)
    }

    pub fn zip(&self, value: Value) -> Value {
        Value::Object(self.rebuild(value))
    }
}

/// Context of an array entry: the parent array and the focused index.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryCrumb {
    array: Array,
    index: usize,
}

impl EntryCrumb {
    /// `None` unless `index` addresses an entry of `array`.
    pub fn new(array: Array, index: usize) -> Option<Self> {
        (index < array.len()).then_some(Self { array, index })
    }

    /// Position of the focused entry.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The focused entry as stored in the parent array.
    pub fn focus(&self) -> &Value {
        &self.array[self.index]
    }

    /// Number of entries in the parent array.
    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Entries in front of the focused one.
    pub fn before(&self) -> &[Value] {
        &self.array[..self.index]
    }

    /// Entries behind the focused one.
    pub fn after(&self) -> &[Value] {
        &self.array[self.index + 1..]
    }

    /// The parent array with `value` at the focused index.
    pub fn rebuild(&self, value: Value) -> Array {
        if self.focus().same_as(&value) {
            return Arc::clone(&self.array);
        }
        let mut res = (*self.array).clone();
        res[self.index] = value;
        Arc::new(res)
    }

    /// Concatenate `before`, the focused entry and `after`.
    pub fn zip(&self, value: Value) -> Value {
        Value::Array(self.rebuild(value))
    }
}

#[derive(Debug)]
struct Link {
    crumb: Crumb,
    parent: Option<Arc<Link>>,
}

/// Persistent stack of crumbs, root-to-focus.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    head: Option<Arc<Link>>,
    len: usize,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The innermost crumb.
    pub fn last(&self) -> Option<&Crumb> {
        self.head.as_deref().map(|link| &link.crumb)
    }

    pub fn push(&self, crumb: Crumb) -> Self {
        Self {
            head: Some(Arc::new(Link {
                crumb,
                parent: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Split off the innermost crumb, returning it with the remaining trace.
    pub fn pop(&self) -> Option<(&Crumb, Self)> {
        let link = self.head.as_deref()?;
        Some((
            &link.crumb,
            Self {
                head: link.parent.clone(),
                len: self.len - 1,
            },
        ))
    }

    /// Swap the innermost crumb for `crumb`.
    pub fn replace_last(&self, crumb: Crumb) -> Self {
        match self.pop() {
            Some((_, rest)) => rest.push(crumb),
            None => self.push(crumb),
        }
    }

    /// Crumbs from the innermost outwards.
    pub fn iter_rev(&self) -> impl Iterator<Item = &Crumb> {
        std::iter::successors(self.head.as_deref(), |link| link.parent.as_deref())
            .map(|link| &link.crumb)
    }

    /// Crumbs root-to-focus.
    pub fn to_vec(&self) -> Vec<&Crumb> {
        let mut crumbs: Vec<&Crumb> = self.iter_rev().collect();
        crumbs.reverse();
        crumbs
    }
}

impl PartialEq for Trace {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter_rev().zip(other.iter_rev()).all(|(a, b)| a == b)
    }
}

impl Drop for Trace {
    fn drop(&mut self) {
        // Unlink uniquely owned tails iteratively so deep traces don't
        // overflow the stack on drop.
        let mut next = self.head.take();
        while let Some(link) = next {
            match Arc::try_unwrap(link) {
                Ok(mut link) => next = link.parent.take(),
                Err(_) => break,
            }
        }
    }
}
