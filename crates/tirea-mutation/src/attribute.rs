//! The shadow tree: one mutation descriptor per leaf of a target document.

use crate::path::{Path, Seg};
use crate::MutationResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A node of a shadow tree mirroring the shape of a target document.
///
/// Every leaf of the target becomes a [`Descriptor`](Self::Descriptor);
/// every nested object or array becomes a nested mapping or sequence.
///
/// Sequence slots are `Option`s: a `None` slot is a hole, left behind when an
/// index is unset or when an aliased node was dropped while mirroring.
///
/// Serialized untagged: descriptors as `T`, mappings as JSON objects,
/// sequences as JSON arrays with `null` holes.
///
/// # Examples
///
/// ```
/// use tirea_mutation::{set_all_attributes_muted, MutatedAttribute};
/// use serde_json::json;
///
/// let target = json!({"name": {"first": "John"}, "roles": ["reader"]});
/// let tree = set_all_attributes_muted(&target, &false);
///
/// assert_eq!(tree.to_value().unwrap(), json!({"name": {"first": false}, "roles": [false]}));
/// assert_eq!(tree.get("roles").and_then(|r| r.at(0)), Some(&MutatedAttribute::Descriptor(false)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MutatedAttribute<T> {
    /// Mirror of a nested object.
    Mapping(BTreeMap<String, MutatedAttribute<T>>),
    /// Mirror of a nested array.
    Sequence(Vec<Option<MutatedAttribute<T>>>),
    /// Descriptor standing in for a leaf.
    Descriptor(T),
}

impl<T> Default for MutatedAttribute<T> {
    fn default() -> Self {
        MutatedAttribute::Mapping(BTreeMap::new())
    }
}

impl<T> MutatedAttribute<T> {
    /// An empty mapping.
    #[inline]
    pub fn mapping() -> Self {
        MutatedAttribute::Mapping(BTreeMap::new())
    }

    /// An empty sequence.
    #[inline]
    pub fn sequence() -> Self {
        MutatedAttribute::Sequence(Vec::new())
    }

    /// The container to synthesize in front of `next`: a sequence for an
    /// index segment, a mapping otherwise.
    #[inline]
    pub fn container_for(next: &Seg) -> Self {
        if next.is_index() {
            Self::sequence()
        } else {
            Self::mapping()
        }
    }

    /// Returns true for mappings and sequences.
    #[inline]
    pub fn is_container(&self) -> bool {
        !matches!(self, MutatedAttribute::Descriptor(_))
    }

    /// The descriptor, if this node is a leaf.
    #[inline]
    pub fn descriptor(&self) -> Option<&T> {
        match self {
            MutatedAttribute::Descriptor(d) => Some(d),
            _ => None,
        }
    }

    /// Consume the node, returning the descriptor if it is a leaf.
    #[inline]
    pub fn into_descriptor(self) -> Option<T> {
        match self {
            MutatedAttribute::Descriptor(d) => Some(d),
            _ => None,
        }
    }

    /// Child of a mapping by key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            MutatedAttribute::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Child of a sequence by index. Holes read as absent.
    #[inline]
    pub fn at(&self, index: usize) -> Option<&Self> {
        match self {
            MutatedAttribute::Sequence(items) => items.get(index).and_then(Option::as_ref),
            _ => None,
        }
    }

    /// Resolve one path segment against this node.
    ///
    /// An index against a mapping addresses its decimal key; a key against a
    /// sequence or anything against a descriptor resolves to nothing.
    pub fn child(&self, seg: &Seg) -> Option<&Self> {
        match (self, seg) {
            (MutatedAttribute::Mapping(map), Seg::Key(key)) => map.get(key),
            (MutatedAttribute::Mapping(map), Seg::Index(i)) => map.get(&i.to_string()),
            (MutatedAttribute::Sequence(_), Seg::Index(i)) => self.at(*i),
            _ => None,
        }
    }

    /// Resolve a whole path against this node.
    pub fn lookup(&self, path: &Path) -> Option<&Self> {
        path.iter().try_fold(self, |node, seg| node.child(seg))
    }

    /// Every descriptor in the tree with its path, in depth-first order.
    pub fn descriptors(&self) -> Vec<(Path, &T)> {
        let mut out = Vec::new();
        collect_descriptors(self, Path::root(), &mut out);
        out
    }
}

impl<T: Serialize> MutatedAttribute<T> {
    /// Convert the tree into a JSON value.
    pub fn to_value(&self) -> MutationResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn collect_descriptors<'a, T>(
    node: &'a MutatedAttribute<T>,
    at: Path,
    out: &mut Vec<(Path, &'a T)>,
) {
    match node {
        MutatedAttribute::Descriptor(d) => out.push((at, d)),
        MutatedAttribute::Mapping(map) => {
            for (key, child) in map {
                collect_descriptors(child, at.with_segment(Seg::key(key.as_str())), out);
            }
        }
        MutatedAttribute::Sequence(items) => {
            for (i, child) in items.iter().enumerate() {
                if let Some(child) = child {
                    collect_descriptors(child, at.with_segment(Seg::index(i)), out);
                }
            }
        }
    }
}

impl<T> From<T> for MutatedAttribute<T> {
    fn from(descriptor: T) -> Self {
        MutatedAttribute::Descriptor(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    fn sample() -> MutatedAttribute<bool> {
        let mut name = BTreeMap::new();
        name.insert("first".to_string(), MutatedAttribute::Descriptor(true));
        let mut root = BTreeMap::new();
        root.insert("name".to_string(), MutatedAttribute::Mapping(name));
        root.insert(
            "roles".to_string(),
            MutatedAttribute::Sequence(vec![
                Some(MutatedAttribute::Descriptor(false)),
                None,
                Some(MutatedAttribute::Descriptor(true)),
            ]),
        );
        MutatedAttribute::Mapping(root)
    }

    #[test]
    fn test_lookup() {
        let tree = sample();
        assert_eq!(
            tree.lookup(&path!("name", "first")),
            Some(&MutatedAttribute::Descriptor(true))
        );
        assert_eq!(
            tree.lookup(&path!("roles", 0)),
            Some(&MutatedAttribute::Descriptor(false))
        );
        assert_eq!(tree.lookup(&path!("roles", 1)), None, "holes read as absent");
        assert_eq!(tree.lookup(&path!("roles", "x")), None);
        assert_eq!(tree.lookup(&path!("name", "first", "deeper")), None);
        assert_eq!(tree.lookup(&Path::root()), Some(&tree));
    }

    #[test]
    fn test_index_against_mapping_uses_decimal_key() {
        let mut map = BTreeMap::new();
        map.insert("2".to_string(), MutatedAttribute::Descriptor(7));
        let tree = MutatedAttribute::Mapping(map);
        assert_eq!(tree.child(&Seg::index(2)), Some(&MutatedAttribute::Descriptor(7)));
    }

    #[test]
    fn test_descriptors_enumerates_leaves() {
        let tree = sample();
        let leaves: Vec<(String, bool)> = tree
            .descriptors()
            .into_iter()
            .map(|(p, d)| (p.to_string(), *d))
            .collect();
        assert_eq!(
            leaves,
            vec![
                ("name.first".to_string(), true),
                ("roles[0]".to_string(), false),
                ("roles[2]".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_serialize_untagged_with_holes() {
        assert_eq!(
            sample().to_value().unwrap(),
            json!({"name": {"first": true}, "roles": [false, null, true]})
        );
    }

    #[test]
    fn test_deserialize_prefers_containers() {
        let tree: MutatedAttribute<bool> =
            serde_json::from_value(json!({"name": {"first": true}, "roles": [false, null, true]}))
                .unwrap();
        assert_eq!(tree, sample());
    }

    #[test]
    fn test_deserialize_object_descriptors() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Validation {
            dirty: bool,
            touched: bool,
        }

        let tree: MutatedAttribute<Validation> =
            serde_json::from_value(json!({"address": {"dirty": true, "touched": false}})).unwrap();
        assert_eq!(
            tree.get("address").and_then(MutatedAttribute::descriptor),
            Some(&Validation {
                dirty: true,
                touched: false
            })
        );
    }
}
