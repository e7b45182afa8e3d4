//! Node-set producing steps over [`Instance`] nodes, for use with
//! [`NodeSet::bind`].
//!
//! An array-valued member stands for a list or leaf-list: its entries, not
//! the array itself, are the nodes on the child axis.

use datatree_instance::{Instance, Value};

use crate::nodeset::NodeSet;

fn push_expanded(inst: Instance, out: &mut Vec<Instance>) {
    if !inst.value().is_array() {
        out.push(inst);
        return;
    }
    let mut entry = inst.first_entry().ok();
    while let Some(en) = entry {
        entry = en.next().ok();
        out.push(en);
    }
}

fn children(inst: &Instance) -> Vec<Instance> {
    let mut out = Vec::new();
    match inst.value() {
        Value::Object(obj) => {
            for name in obj.keys() {
                if let Ok(member) = inst.member(name) {
                    push_expanded(member, &mut out);
                }
            }
        }
        Value::Array(_) => push_expanded(inst.clone(), &mut out),
        _ => {}
    }
    out
}

/// The receiver itself.
pub fn self_node(inst: &Instance) -> NodeSet<Instance> {
    NodeSet::from(vec![inst.clone()])
}

/// Children in document order.
pub fn child_nodes(inst: &Instance) -> NodeSet<Instance> {
    NodeSet::from(children(inst))
}

/// All descendants in document order.
pub fn descendant_nodes(inst: &Instance) -> NodeSet<Instance> {
    let mut out = Vec::new();
    let mut stack: Vec<Instance> = children(inst).into_iter().rev().collect();
    while let Some(current) = stack.pop() {
        stack.extend(children(&current).into_iter().rev());
        out.push(current);
    }
    NodeSet::from(out)
}

/// The parent node; empty at the top. Entries report the node holding the
/// whole list as their parent.
pub fn parent_nodes(inst: &Instance) -> NodeSet<Instance> {
    let Ok(parent) = inst.up() else {
        return NodeSet::new();
    };
    if parent.value().is_array() && !parent.is_top() {
        return parent.up().map(|grand| NodeSet::from(vec![grand])).unwrap_or_default();
    }
    NodeSet::from(vec![parent])
}
