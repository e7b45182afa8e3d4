//! XPath 1.0 node-sets and comparison semantics.
//!
//! Node-sets are what path expressions evaluate to. Comparing a node-set
//! with a value is true as soon as one of its non-internal nodes satisfies
//! the comparison, with XPath's type coercions applied per node.
//!
//! # Example
//!
//! ```
//! use datatree_instance::Instance;
//! use datatree_xpath::{child_nodes, self_node, XPathValue};
//! use serde_json::json;
//!
//! let root = Instance::from_json(json!({"mtu": [1500, 9000]}));
//! let mtus = self_node(&root).bind(child_nodes);
//! assert_eq!(mtus.len(), 2);
//! assert!(mtus.equals(&XPathValue::from("9000")));
//! assert!(mtus.greater_than(&XPathValue::Number(5000.0)));
//! assert!(!mtus.less_than(&XPathValue::from("abc")));
//! ```

mod axes;
pub use axes::{child_nodes, descendant_nodes, parent_nodes, self_node};

mod node;
pub use node::{number_of, parse_number, string_of, XPathNode};

mod nodeset;
pub use nodeset::{NodeSet, XPathValue};
