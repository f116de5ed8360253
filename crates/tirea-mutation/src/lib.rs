//! Path-addressed mutation descriptors shadowing the shape of JSON documents.
//!
//! `tirea-mutation` keeps one descriptor (a dirty flag, a `{dirty, touched}`
//! pair, any `T`) per leaf of a target document, in a separate tree of the
//! same shape. The target is never modified.
//!
//! # Core Concepts
//!
//! - **MutatedAttribute**: the shadow tree; mappings, sequences and descriptor leaves
//! - **Path**: dot/bracket addressing, e.g. `"name.firstname"` or `"roles[1]"`
//! - **Path engine**: pure copy-on-write reads and writes on shadow trees
//! - **MutationTracker**: owns a template and a live state; clear/reset/set/get
//!
//! # Quick Start
//!
//! ```
//! use tirea_mutation::{InitialMutation, MutationConfig, MutationTracker};
//! use serde_json::json;
//!
//! let user = json!({"name": {"firstname": "John", "lastname": "Doe"}, "address": "x"});
//! let config = MutationConfig::new(false)
//!     .with_initial_mutation(InitialMutation::new(["name.firstname"], true));
//!
//! let mut tracker = MutationTracker::new(&user, config).unwrap();
//! assert_eq!(tracker.get_descriptor("name.firstname").unwrap(), Some(true));
//!
//! tracker.set_mutated_by_attribute_name(true, "address").unwrap();
//! tracker.clear();
//! assert_eq!(tracker.get_descriptor("address").unwrap(), Some(false));
//! assert_eq!(tracker.get_descriptor("z.q").unwrap(), None);
//! ```
//!
//! # Using the path engine directly
//!
//! ```
//! use tirea_mutation::{parse_path, set_all_attributes_muted, set_attribute_mutated};
//! use serde_json::json;
//!
//! let tree = set_all_attributes_muted(&json!({"a": {"b": 1, "c": 2}}), &false);
//! let path = parse_path("a.b").unwrap();
//! let updated = set_attribute_mutated(&tree, Some(true.into()), &path).unwrap();
//!
//! assert_eq!(updated.to_value().unwrap(), json!({"a": {"b": true, "c": false}}));
//! assert_eq!(tree.to_value().unwrap(), json!({"a": {"b": false, "c": false}}));
//! ```

mod attribute;
mod config;
mod error;
mod mutation;
mod path;
mod shape;
mod tracker;

pub use attribute::MutatedAttribute;
pub use config::{InitialMutation, MutationConfig};
pub use error::{MutationError, MutationResult};
pub use mutation::{
    get_attribute, get_attribute_mutation, set_all_attributes_muted, set_attribute_mutated,
    set_attribute_mutated_multiple, MAX_SEQUENCE_GROWTH,
};
pub use path::{parse_path, IntoPath, Path, Seg};
pub use shape::{Shape, ShapeNode};
pub use tracker::MutationTracker;

// Re-export serde_json::Value for convenience
pub use serde_json::Value;
