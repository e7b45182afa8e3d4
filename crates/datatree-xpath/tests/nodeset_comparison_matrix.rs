use datatree_instance::{Instance, InstancePath, Value};
use datatree_xpath::{child_nodes, descendant_nodes, parent_nodes, self_node, NodeSet, XPathNode, XPathValue};
use serde_json::json;

fn doc() -> Instance {
    Instance::from_json(json!({
        "interfaces": {
            "interface": [
                {"name": "eth0", "mtu": 1500, "enabled": true},
                {"name": "eth1", "mtu": 9000, "enabled": false},
                {"name": "lo", "mtu": "65536"}
            ]
        },
        "dns": ["1", "2"]
    }))
}

fn select(root: &Instance, names: &[&str]) -> NodeSet<Instance> {
    names.iter().fold(self_node(root), |ns, name| {
        ns.bind(|n| named(child_nodes(n), name))
    })
}

fn named(ns: NodeSet<Instance>, name: &str) -> NodeSet<Instance> {
    ns.into_iter()
        .filter(|n| n.member_name() == Some(name))
        .collect()
}

fn s(v: &str) -> XPathValue<Instance> {
    XPathValue::from(v)
}

#[test]
fn child_steps_compose_with_bind() {
    let root = doc();
    let mtus = select(&root, &["interfaces", "interface", "mtu"]);
    let paths: Vec<String> = mtus.iter().map(XPathNode::path).collect();
    assert_eq!(
        paths,
        vec![
            "/interfaces/interface/0/mtu",
            "/interfaces/interface/1/mtu",
            "/interfaces/interface/2/mtu",
        ]
    );
}

#[test]
fn string_comparisons_are_or_across_members() {
    let dns = select(&doc(), &["dns"]);
    assert_eq!(dns.len(), 2);
    assert!(dns.equals(&s("2")));
    assert!(!dns.equals(&s("3")));
    assert!(dns.not_equals(&s("1")));
}

#[test]
fn numeric_comparisons_coerce_members() {
    let mtus = select(&doc(), &["interfaces", "interface", "mtu"]);
    assert!(mtus.equals(&XPathValue::Number(9000.0)));
    assert!(mtus.equals(&s("65536")));
    assert!(mtus.greater_than(&s("60000")));
    assert!(mtus.less_or_equal(&XPathValue::Number(1500.0)));
    assert!(!mtus.less_than(&XPathValue::Number(1500.0)));
    assert!(!mtus.greater_than(&s("abc")));
    assert_eq!(mtus.to_number(), Some(1500.0));
    assert_eq!(mtus.to_string_value(), "1500");
}

#[test]
fn internal_nodes_never_compare() {
    let root = doc();
    let entries = select(&root, &["interfaces", "interface"]);
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(XPathNode::is_internal));
    for target in [s(""), s("eth0"), XPathValue::Number(0.0), XPathValue::Boolean(true)] {
        assert!(!entries.equals(&target));
        assert!(!entries.not_equals(&target));
        assert!(!entries.greater_or_equal(&target));
    }
    // first-element coercion still looks at the internal node
    assert_eq!(entries.to_string_value(), "");
    assert_eq!(entries.to_number(), None);
}

#[test]
fn nodeset_against_nodeset() {
    let root = doc();
    let names = select(&root, &["interfaces", "interface", "name"]);
    let wanted = NodeSet::from(vec![Instance::from_json(json!({"x": "lo"}))
        .member("x")
        .expect("x")]);
    assert!(names.equals(&XPathValue::from(wanted)));

    let mtus = select(&root, &["interfaces", "interface", "mtu"]);
    let dns = select(&root, &["dns"]);
    assert!(mtus.greater_than(&XPathValue::from(dns.clone())));
    assert!(!mtus.less_than(&XPathValue::from(dns)));
}

#[test]
fn union_keeps_other_on_shared_path() {
    let root = doc();
    let path = InstancePath::new().member("dns").index(0);
    let original = root.goto(&path).expect("dns 0");
    let edited = original.update(Value::from("9"));

    let left = NodeSet::from(vec![original.clone(), root.goto(&InstancePath::new().member("dns").index(1)).expect("dns 1")]);
    let right = NodeSet::from(vec![edited]);
    let u = left.union(&right);
    assert_eq!(u.len(), 2);
    assert_eq!(u.first().map(|n| n.value().clone()), Some(Value::from("9")));
    assert_eq!(u.first().map(XPathNode::path), Some(original.pointer()));
}

#[test]
fn descendant_and_parent_axes() {
    let root = doc();
    let enabled = named(descendant_nodes(&root), "enabled");
    assert_eq!(enabled.len(), 2);
    assert!(enabled.equals(&XPathValue::Boolean(false)));

    let owners = enabled.bind(parent_nodes);
    assert_eq!(owners.len(), 2);
    let names = owners.bind(|n| named(child_nodes(n), "name"));
    assert!(names.equals(&s("eth1")));
    assert!(!names.equals(&s("lo")));
}

#[test]
fn axes_cover_long_lists() {
    let servers: Vec<String> = (0..20_000).map(|i| format!("server-{i}")).collect();
    let root = Instance::from_json(json!({"dns": {"server": servers}}));
    let dns = root.member("dns").expect("dns");

    let children = child_nodes(&dns);
    assert_eq!(children.len(), 20_000);
    assert_eq!(children.first().map(XPathNode::path), Some("/dns/server/0".to_string()));
    assert!(children.equals(&s("server-19999")));
    assert!(!children.equals(&s("server-20000")));

    assert_eq!(descendant_nodes(&root).len(), 20_001);
}
