//! Instance data implemented as a zipper.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::crumb::{Crumb, EntryCrumb, MemberCrumb, Trace};
use crate::error::InstanceError;
use crate::selector::InstancePath;
use crate::value::{split_qname, Array, QName, Value};

/// A focused value together with the context needed to rebuild its ancestors.
///
/// Instances are immutable: every operation returns a new instance and leaves
/// the receiver as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    value: Value,
    trace: Trace,
}

impl Instance {
    /// Create an instance focused on a document root.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            trace: Trace::new(),
        }
    }

    /// Create a root instance from a `serde_json` document.
    pub fn from_json(doc: serde_json::Value) -> Self {
        Self::new(Value::from(doc))
    }

    fn with_trace(value: Value, trace: Trace) -> Self {
        Self { value, trace }
    }

    /// The focused value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// The focused value as a `serde_json` document.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(&self.value)
    }

    /// Crumbs from the root down to the receiver.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// The most recent crumb, `None` at the top.
    pub fn crumb(&self) -> Option<&Crumb> {
        self.trace.last()
    }

    /// Number of levels below the document root.
    pub fn depth(&self) -> usize {
        self.trace.len()
    }

    pub fn is_top(&self) -> bool {
        self.trace.is_empty()
    }

    /// Namespace prefix of the nearest enclosing qualified member name.
    pub fn namespace(&self) -> Option<&str> {
        self.trace.iter_rev().find_map(|cr| match cr {
            Crumb::Member(cr) => split_qname(&cr.name).0,
            Crumb::Entry(_) => None,
        })
    }

    /// Name of the nearest enclosing member. For an array entry this is the
    /// name of the array.
    pub fn member_name(&self) -> Option<&str> {
        self.trace.iter_rev().find_map(|cr| match cr {
            Crumb::Member(cr) => Some(cr.name.as_str()),
            Crumb::Entry(_) => None,
        })
    }

    /// Pointer fragments of the receiver, root first.
    pub fn path_fragments(&self) -> Vec<String> {
        self.trace
            .to_vec()
            .into_iter()
            .map(Crumb::pointer_fragment)
            .collect()
    }

    /// JSON pointer of the receiver. The top instance is `/`.
    pub fn pointer(&self) -> String {
        let fragments: Vec<String> = self
            .path_fragments()
            .iter()
            .map(|f| escape_fragment(f))
            .collect();
        format!("/{}", fragments.join("/"))
    }

    /// Follow `path` from the receiver. Stops at the first failing step.
    pub fn goto(&self, path: &InstancePath) -> Result<Instance, InstanceError> {
        let mut inst = self.clone();
        for sel in path.iter() {
            log::trace!("goto {} from {}", sel, inst.pointer());
            inst = sel.goto_step(&inst)?;
        }
        Ok(inst)
    }

    /// Value at `path` below the receiver, without building a new instance.
    pub fn peek(&self, path: &InstancePath) -> Option<&Value> {
        path.iter().try_fold(&self.value, |val, sel| sel.peek_step(val))
    }

    /// Same context, different focused value.
    pub fn update(&self, value: Value) -> Instance {
        Self::with_trace(value, self.trace.clone())
    }

    /// Ascend to the parent instance.
    pub fn up(&self) -> Result<Instance, InstanceError> {
        match self.trace.pop() {
            Some((crumb, rest)) => Ok(Self::with_trace(crumb.zip(self.value.clone()), rest)),
            None => Err(InstanceError::nonexistent(self, "up of top")),
        }
    }

    /// Ascend all the way to the document root.
    pub fn top(&self) -> Instance {
        let mut inst = self.clone();
        while let Some((crumb, rest)) = inst.trace.pop() {
            inst = Self::with_trace(crumb.zip(inst.value.clone()), rest);
        }
        inst
    }

    /// Descend to the member `name` of the focused object.
    pub fn member(&self, name: &str) -> Result<Instance, InstanceError> {
        let Value::Object(obj) = &self.value else {
            return Err(InstanceError::type_error(self, "member of non-object"));
        };
        match obj.get_key_value(name) {
            Some((name, value)) => Ok(Self::with_trace(
                value.clone(),
                self.trace
                    .push(Crumb::Member(MemberCrumb::new(name.clone(), Arc::clone(obj)))),
            )),
            None => Err(InstanceError::nonexistent(self, format!("member {name}"))),
        }
    }

    /// Focus on a new member `name` of the focused object.
    ///
    /// The member is appended when the parent is rebuilt.
    pub fn new_member(&self, name: &str, value: Value) -> Result<Instance, InstanceError> {
        let Value::Object(obj) = &self.value else {
            return Err(InstanceError::type_error(self, "member of non-object"));
        };
        if obj.contains_key(name) {
            return Err(InstanceError::duplicate(self, name));
        }
        Ok(Self::with_trace(
            value,
            self.trace
                .push(Crumb::Member(MemberCrumb::new(name.to_string(), Arc::clone(obj)))),
        ))
    }

    /// Move the focus to the sibling member `name`.
    pub fn sibling(&self, name: &str) -> Result<Instance, InstanceError> {
        let Some(Crumb::Member(cr)) = self.crumb() else {
            return Err(InstanceError::type_error(self, "sibling of non-member"));
        };
        let Some((name, value)) = cr.siblings().find(|(k, _)| k.as_str() == name) else {
            return Err(InstanceError::nonexistent(self, format!("member {name}")));
        };
        let obj = cr.rebuild(self.value.clone());
        Ok(Self::with_trace(
            value.clone(),
            self.trace
                .replace_last(Crumb::Member(MemberCrumb::new(name.clone(), obj))),
        ))
    }

    fn array(&self, what: &str) -> Result<&Array, InstanceError> {
        match &self.value {
            Value::Array(arr) => Ok(arr),
            _ => Err(InstanceError::type_error(self, format!("{what} of non-array"))),
        }
    }

    fn entry_at(&self, array: &Array, index: usize) -> Option<Instance> {
        let cr = EntryCrumb::new(Arc::clone(array), index)?;
        Some(Self::with_trace(
            cr.focus().clone(),
            self.trace.push(Crumb::Entry(cr)),
        ))
    }

    /// Descend to the entry `index` of the focused array.
    pub fn entry(&self, index: usize) -> Result<Instance, InstanceError> {
        let arr = self.array("entry")?;
        self.entry_at(arr, index)
            .ok_or_else(|| InstanceError::nonexistent(self, format!("entry {index}")))
    }

    /// Descend to the first entry of the focused array.
    pub fn first_entry(&self) -> Result<Instance, InstanceError> {
        let arr = self.array("first entry")?;
        self.entry_at(arr, 0)
            .ok_or_else(|| InstanceError::nonexistent(self, "first of empty"))
    }

    /// Descend to the last entry of the focused array.
    pub fn last_entry(&self) -> Result<Instance, InstanceError> {
        let arr = self.array("last entry")?;
        arr.len()
            .checked_sub(1)
            .and_then(|last| self.entry_at(arr, last))
            .ok_or_else(|| InstanceError::nonexistent(self, "last of empty"))
    }

    /// Descend to the first entry whose members match all `keys`.
    ///
    /// Entries are scanned in order; an entry that lacks one of the key
    /// members ends the scan. Numbers match by numeric value.
    pub fn look_up(&self, keys: &IndexMap<QName, Value>) -> Result<Instance, InstanceError> {
        let Value::Array(arr) = &self.value else {
            return Err(InstanceError::type_error(self, "lookup on non-list"));
        };
        for (index, en) in arr.iter().enumerate() {
            let mut matched = true;
            for (k, v) in keys {
                let Value::Object(en) = en else {
                    return Err(InstanceError::type_error(self, "lookup on non-list"));
                };
                match en.get(k) {
                    Some(ev) if ev.matches(v) => {}
                    Some(_) => {
                        matched = false;
                        break;
                    }
                    None => return Err(InstanceError::nonexistent(self, "entry lookup failed")),
                }
            }
            if matched {
                if let Some(inst) = self.entry_at(arr, index) {
                    return Ok(inst);
                }
            }
        }
        Err(InstanceError::nonexistent(self, "entry lookup failed"))
    }

    fn entry_crumb(&self, what: &str) -> Result<&EntryCrumb, InstanceError> {
        match self.crumb() {
            Some(Crumb::Entry(cr)) => Ok(cr),
            _ => Err(InstanceError::type_error(self, format!("{what} non-entry"))),
        }
    }

    // Same parent, focus moved to `index` of the rebuilt array.
    fn step_to(&self, cr: &EntryCrumb, index: usize) -> Option<Instance> {
        if index >= cr.len() {
            return None;
        }
        let cr = EntryCrumb::new(cr.rebuild(self.value.clone()), index)?;
        Some(Self::with_trace(
            cr.focus().clone(),
            self.trace.replace_last(Crumb::Entry(cr)),
        ))
    }

    // Focus on `value`, inserted at `index` of the rebuilt array.
    fn insert_at(&self, cr: &EntryCrumb, index: usize, value: Value) -> Option<Instance> {
        let mut entries = Arc::unwrap_or_clone(cr.rebuild(self.value.clone()));
        entries.insert(index.min(entries.len()), value.clone());
        let cr = EntryCrumb::new(Arc::new(entries), index)?;
        Some(Self::with_trace(value, self.trace.replace_last(Crumb::Entry(cr))))
    }

    /// Move the focus to the following entry.
    pub fn next(&self) -> Result<Instance, InstanceError> {
        let cr = self.entry_crumb("next of")?;
        self.step_to(cr, cr.index() + 1)
            .ok_or_else(|| InstanceError::nonexistent(self, "next of last"))
    }

    /// Move the focus to the preceding entry.
    pub fn previous(&self) -> Result<Instance, InstanceError> {
        let cr = self.entry_crumb("previous of")?;
        cr.index()
            .checked_sub(1)
            .and_then(|index| self.step_to(cr, index))
            .ok_or_else(|| InstanceError::nonexistent(self, "previous of first"))
    }

    /// Insert `value` in front of the focused entry and focus on it.
    pub fn insert_before(&self, value: Value) -> Result<Instance, InstanceError> {
        let cr = self.entry_crumb("insert before")?;
        self.insert_at(cr, cr.index(), value)
            .ok_or_else(|| InstanceError::type_error(self, "insert before non-entry"))
    }

    /// Insert `value` behind the focused entry and focus on it.
    pub fn insert_after(&self, value: Value) -> Result<Instance, InstanceError> {
        let cr = self.entry_crumb("insert after")?;
        self.insert_at(cr, cr.index() + 1, value)
            .ok_or_else(|| InstanceError::type_error(self, "insert after non-entry"))
    }
}

/// Escape a pointer fragment per RFC 6901.
fn escape_fragment(fragment: &str) -> String {
    if !fragment.contains('/') && !fragment.contains('~') {
        return fragment.to_string();
    }
    fragment.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn root(doc: serde_json::Value) -> Instance {
        Instance::from_json(doc)
    }

    #[test]
    fn test_pointer() {
        let inst = root(json!({"a": [0, 1, {"b/c": 2}]}));
        assert_eq!(inst.pointer(), "/");
        let inst = inst.member("a").unwrap().entry(2).unwrap();
        assert_eq!(inst.pointer(), "/a/2");
        assert_eq!(inst.member("b/c").unwrap().pointer(), "/a/2/b~1c");
    }

    #[test]
    fn test_namespace() {
        let inst = root(json!({"ietf-interfaces:interfaces": {"interface": [{"name": "eth0"}]}}));
        assert_eq!(inst.namespace(), None);
        let intf = inst
            .member("ietf-interfaces:interfaces")
            .unwrap()
            .member("interface")
            .unwrap();
        assert_eq!(intf.namespace(), Some("ietf-interfaces"));
        let name = intf.entry(0).unwrap().member("name").unwrap();
        assert_eq!(name.namespace(), Some("ietf-interfaces"));
        assert_eq!(name.member_name(), Some("name"));
        assert_eq!(intf.entry(0).unwrap().member_name(), Some("interface"));
        assert_eq!(inst.member_name(), None);

        let nested = name.update(Value::from(json!({"ex:x": 1}))).member("ex:x").unwrap();
        assert_eq!(nested.namespace(), Some("ex"));
    }

    #[test]
    fn test_member_does_not_touch_source() {
        let inst = root(json!({"x": 1, "y": 2}));
        let x = inst.member("x").unwrap();
        assert_eq!(x.value(), &Value::from(1i64));
        assert!(inst.value().get("x").is_some());
        assert_eq!(x.up().unwrap().value(), inst.value());
    }

    #[test]
    fn test_member_errors() {
        let inst = root(json!({"x": [1]}));
        assert!(matches!(
            inst.member("z"),
            Err(InstanceError::NonexistentInstance { .. })
        ));
        let arr = inst.member("x").unwrap();
        assert!(matches!(
            arr.member("x"),
            Err(InstanceError::InstanceTypeError { .. })
        ));
    }

    #[test]
    fn test_member_order_roundtrip() {
        let inst = root(json!({"a": 1, "b": 2, "c": 3}));
        let top = inst.member("b").unwrap().update(Value::from(20i64)).top();
        assert_eq!(top.to_json().to_string(), r#"{"a":1,"b":20,"c":3}"#);
    }

    #[test]
    fn test_new_member() {
        let inst = root(json!({"a": 1}));
        let b = inst.new_member("b", Value::from("v")).unwrap();
        assert_eq!(b.pointer(), "/b");
        let top = b.up().unwrap();
        assert_eq!(top.member("b").unwrap().value(), &Value::from("v"));
        let err = inst.new_member("a", Value::Null).unwrap_err();
        assert!(matches!(err, InstanceError::DuplicateMember { .. }));
        assert_eq!(err.to_string(), "[/] member a");
    }

    #[test]
    fn test_sibling() {
        let inst = root(json!({"a": 1, "b": 2, "c": 3}));
        let b = inst.member("b").unwrap();
        let c = b.sibling("c").unwrap().update(Value::from(30i64));
        assert_eq!(c.pointer(), "/c");
        let a = c.sibling("a").unwrap();
        assert_eq!(a.value(), &Value::from(1i64));
        assert_eq!(a.top().to_json().to_string(), r#"{"a":1,"b":2,"c":30}"#);

        assert!(matches!(
            b.sibling("b"),
            Err(InstanceError::NonexistentInstance { .. })
        ));
        assert!(matches!(
            inst.sibling("a"),
            Err(InstanceError::InstanceTypeError { .. })
        ));
        let en = root(json!([1, 2])).entry(0).unwrap();
        assert!(matches!(
            en.sibling("a"),
            Err(InstanceError::InstanceTypeError { .. })
        ));
    }

    #[test]
    fn test_entries() {
        let inst = root(json!([10, 20, 30]));
        assert_eq!(inst.first_entry().unwrap().value(), &Value::from(10i64));
        let last = inst.last_entry().unwrap();
        assert_eq!(last.value(), &Value::from(30i64));
        assert_eq!(last.pointer(), "/2");
        assert!(matches!(
            inst.entry(3),
            Err(InstanceError::NonexistentInstance { .. })
        ));

        let empty = root(json!([]));
        assert_eq!(empty.first_entry().unwrap_err().to_string(), "[/] first of empty");
        assert_eq!(empty.last_entry().unwrap_err().to_string(), "[/] last of empty");
        assert!(matches!(
            root(json!({})).entry(0),
            Err(InstanceError::InstanceTypeError { .. })
        ));
    }

    #[test]
    fn test_next_previous() {
        let inst = root(json!([10, 20, 30]));
        let second = inst.entry(1).unwrap();
        let third = second.next().unwrap();
        assert_eq!(third.value(), &Value::from(30i64));
        assert_eq!(third.pointer(), "/2");
        assert_eq!(third.next().unwrap_err().to_string(), "[/2] next of last");
        let first = second.previous().unwrap();
        assert_eq!(first.pointer(), "/0");
        assert!(matches!(
            first.previous(),
            Err(InstanceError::NonexistentInstance { .. })
        ));
        assert_eq!(third.up().unwrap().value(), inst.value());

        assert!(matches!(inst.next(), Err(InstanceError::InstanceTypeError { .. })));
        let member = root(json!({"a": 1})).member("a").unwrap();
        assert!(matches!(
            member.previous(),
            Err(InstanceError::InstanceTypeError { .. })
        ));
    }

    #[test]
    fn test_insert() {
        let inst = root(json!([1, 2, 3]));
        let before = inst.entry(1).unwrap().insert_before(Value::from(9i64)).unwrap();
        assert_eq!(before.pointer(), "/1");
        assert_eq!(before.up().unwrap().to_json(), json!([1, 9, 2, 3]));
        let after = inst.entry(1).unwrap().insert_after(Value::from(9i64)).unwrap();
        assert_eq!(after.pointer(), "/2");
        assert_eq!(after.up().unwrap().to_json(), json!([1, 2, 9, 3]));
        assert_eq!(
            inst.insert_after(Value::Null).unwrap_err().to_string(),
            "[/] insert after non-entry"
        );
    }

    #[test]
    fn test_look_up() {
        let inst = root(json!([
            {"id": 1, "v": "a"},
            {"id": 3, "v": "b"},
            {"id": 3, "v": "c"}
        ]));
        let keys: IndexMap<QName, Value> = [("id".to_string(), Value::from(3i64))].into_iter().collect();
        let found = inst.look_up(&keys).unwrap();
        assert_eq!(found.pointer(), "/1");
        assert_eq!(found.value().get("v"), Some(&Value::from("b")));

        let missing: IndexMap<QName, Value> = [("id".to_string(), Value::from(7i64))].into_iter().collect();
        assert!(matches!(
            inst.look_up(&missing),
            Err(InstanceError::NonexistentInstance { .. })
        ));
        assert!(matches!(
            root(json!([{"other": 3}, {"id": 3}])).look_up(&keys),
            Err(InstanceError::NonexistentInstance { .. })
        ));
        assert!(matches!(
            root(json!([1, 2])).look_up(&keys),
            Err(InstanceError::InstanceTypeError { .. })
        ));
        assert!(matches!(
            root(json!({"id": 3})).look_up(&keys),
            Err(InstanceError::InstanceTypeError { .. })
        ));
    }

    #[test]
    fn test_up_of_top() {
        let err = root(json!(null)).up().unwrap_err();
        assert!(matches!(err, InstanceError::NonexistentInstance { .. }));
        assert_eq!(err.to_string(), "[/] up of top");
        assert!(err.instance().is_top());
    }
}
