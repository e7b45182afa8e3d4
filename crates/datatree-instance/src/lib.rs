//! Immutable navigation over JSON-encoded instance data.
//!
//! An [`Instance`] is a zipper: a focused value plus a trace of crumbs from
//! which all ancestors can be rebuilt. Navigation and edits return new
//! instances; nothing is ever modified in place, and untouched subtrees are
//! shared between the old and the new instance.
//!
//! # Example
//!
//! ```
//! use datatree_instance::{Instance, InstancePath};
//! use serde_json::json;
//!
//! let root = Instance::from_json(json!({"a": [10, 20, 30]}));
//! let inst = root.goto(&InstancePath::new().member("a").index(1)).unwrap();
//! assert_eq!(inst.pointer(), "/a/1");
//!
//! let next = inst.next().unwrap();
//! assert_eq!(next.to_json(), json!(30));
//! assert_eq!(next.top().to_json(), json!({"a": [10, 20, 30]}));
//! ```

pub mod crumb;
pub mod error;
pub mod instance;
pub mod selector;
pub mod value;

pub use crumb::{Crumb, EntryCrumb, MemberCrumb, Trace};
pub use error::InstanceError;
pub use instance::Instance;
pub use selector::{InstancePath, Selector};
pub use value::{split_qname, Array, Object, QName, Value};
