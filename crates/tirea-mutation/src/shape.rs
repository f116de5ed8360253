//! Read-only view of a document's shape for mirroring.
//!
//! [`Shape`] is implemented for `serde_json::Value` and for shadow trees
//! themselves. Callers can implement it for their own graphs; nodes are
//! identified by address, so shared (`Rc`) or cyclic structures are mirrored
//! without looping.

use crate::MutatedAttribute;
use serde_json::Value;

/// One level of a [`Shape`].
pub enum ShapeNode<'a, S> {
    /// Keyed children.
    Mapping(Vec<(&'a str, &'a S)>),
    /// Ordered children; `None` marks a hole.
    Sequence(Vec<Option<&'a S>>),
    /// A leaf, mirrored as a descriptor.
    Leaf,
}

/// A document whose shape can be mirrored into a shadow tree.
pub trait Shape: Sized {
    /// Expose this node's children.
    fn node(&self) -> ShapeNode<'_, Self>;

    /// Returns true if this node has children to recurse into.
    fn is_container(&self) -> bool {
        !matches!(self.node(), ShapeNode::Leaf)
    }
}

impl Shape for Value {
    fn node(&self) -> ShapeNode<'_, Self> {
        match self {
            Value::Object(map) => {
                ShapeNode::Mapping(map.iter().map(|(k, v)| (k.as_str(), v)).collect())
            }
            Value::Array(items) => ShapeNode::Sequence(items.iter().map(Some).collect()),
            _ => ShapeNode::Leaf,
        }
    }

    fn is_container(&self) -> bool {
        self.is_object() || self.is_array()
    }
}

impl<T> Shape for MutatedAttribute<T> {
    fn node(&self) -> ShapeNode<'_, Self> {
        match self {
            MutatedAttribute::Mapping(map) => {
                ShapeNode::Mapping(map.iter().map(|(k, v)| (k.as_str(), v)).collect())
            }
            MutatedAttribute::Sequence(items) => {
                ShapeNode::Sequence(items.iter().map(Option::as_ref).collect())
            }
            MutatedAttribute::Descriptor(_) => ShapeNode::Leaf,
        }
    }

    fn is_container(&self) -> bool {
        MutatedAttribute::is_container(self)
    }
}
