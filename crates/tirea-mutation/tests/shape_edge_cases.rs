//! Shape mirroring edge cases: shared and cyclic nodes in custom shapes.

use serde_json::json;
use std::cell::OnceCell;
use std::rc::Rc;
use tirea_mutation::{
    set_all_attributes_muted, MutatedAttribute, MutationConfig, MutationTracker, Shape, ShapeNode,
};

/// Graph node whose children can be shared between parents or point back up.
#[derive(Default)]
struct GraphNode {
    leaf: bool,
    children: OnceCell<Vec<(String, Rc<GraphNode>)>>,
}

impl GraphNode {
    fn leaf() -> Rc<Self> {
        Rc::new(GraphNode {
            leaf: true,
            children: OnceCell::new(),
        })
    }

    fn object(children: Vec<(&str, Rc<GraphNode>)>) -> Rc<Self> {
        let node = Rc::new(GraphNode::default());
        node.link(children);
        node
    }

    fn link(&self, children: Vec<(&str, Rc<GraphNode>)>) {
        let children = children
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert!(self.children.set(children).is_ok(), "children already linked");
    }
}

impl Shape for GraphNode {
    fn node(&self) -> ShapeNode<'_, Self> {
        if self.leaf {
            return ShapeNode::Leaf;
        }
        let entries = self
            .children
            .get()
            .map(|children| {
                children
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_ref()))
                    .collect()
            })
            .unwrap_or_default();
        ShapeNode::Mapping(entries)
    }
}

#[test]
fn test_shared_node_is_mirrored_once() {
    let shared = GraphNode::object(vec![("city", GraphNode::leaf())]);
    let root = GraphNode::object(vec![
        ("billing", shared.clone()),
        ("shipping", shared),
        ("name", GraphNode::leaf()),
    ]);

    let tree = set_all_attributes_muted(root.as_ref(), &false);

    // "billing" is visited first and claims the shared node.
    assert_eq!(
        tree.to_value().unwrap(),
        json!({"billing": {"city": false}, "name": false})
    );
}

#[test]
fn test_cycle_terminates() {
    let root = Rc::new(GraphNode::default());
    let child = Rc::new(GraphNode::default());
    child.link(vec![("parent", root.clone()), ("value", GraphNode::leaf())]);
    root.link(vec![("child", child), ("me", root.clone())]);

    let tree = set_all_attributes_muted(root.as_ref(), &0u8);
    assert_eq!(tree.to_value().unwrap(), json!({"child": {"value": 0}}));

    // The cycle keeps the nodes alive; the test process reclaims them.
}

#[test]
fn test_tracker_over_custom_shape() {
    let shared = GraphNode::object(vec![("city", GraphNode::leaf())]);
    let root = GraphNode::object(vec![("home", shared.clone()), ("work", shared)]);

    let mut tracker = MutationTracker::from_shape(root.as_ref(), MutationConfig::new(false)).unwrap();
    assert_eq!(tracker.get_descriptor("home.city").unwrap(), Some(false));
    assert_eq!(tracker.get_descriptor("work.city").unwrap(), None);

    tracker.set_mutated_by_attribute_name(true, "work.city").unwrap();
    assert_eq!(
        tracker.get_mutated_by_attribute_name("work").unwrap(),
        Some(MutatedAttribute::Mapping(
            [("city".to_string(), MutatedAttribute::Descriptor(true))]
                .into_iter()
                .collect()
        ))
    );
}

#[test]
fn test_json_duplicates_are_not_aliases() {
    // Equal JSON subtrees are distinct allocations and are mirrored separately.
    let tree = set_all_attributes_muted(
        &json!({"a": {"x": 1}, "b": {"x": 1}, "c": [[1], [1]]}),
        &true,
    );
    assert_eq!(
        tree.to_value().unwrap(),
        json!({"a": {"x": true}, "b": {"x": true}, "c": [[true], [true]]})
    );
}
