//! Path engine: shape mirroring and copy-on-write reads and writes on shadow
//! trees.
//!
//! All functions are pure: the input tree is never modified. Writes return a
//! [`Cow`] that borrows the input when the write would not change anything,
//! so callers comparing by address can skip work.
//!
//! ```text
//! tree' = set_attribute_mutated(tree, value, path)?
//! ```

use crate::path::{Path, Seg};
use crate::shape::{Shape, ShapeNode};
use crate::{MutatedAttribute, MutationError, MutationResult};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

/// Read the node at `path`, falling back to `default` when it is absent.
///
/// Traversal stops as soon as a node is missing (or a descriptor is reached
/// with segments left over). Falsy descriptors such as `false` or `0` are
/// present values and are returned as-is.
///
/// # Examples
///
/// ```
/// use tirea_mutation::{get_attribute, parse_path, set_all_attributes_muted, MutatedAttribute};
/// use serde_json::json;
///
/// let tree = set_all_attributes_muted(&json!({"address": "x"}), &false);
/// let fallback = MutatedAttribute::Descriptor(true);
///
/// let address = parse_path("address").unwrap();
/// assert_eq!(get_attribute(&tree, &address, Some(&fallback)), Some(&MutatedAttribute::Descriptor(false)));
///
/// let missing = parse_path("z.q").unwrap();
/// assert_eq!(get_attribute(&tree, &missing, Some(&fallback)), Some(&fallback));
/// assert_eq!(get_attribute(&tree, &missing, None), None);
/// ```
pub fn get_attribute<'a, T>(
    model: &'a MutatedAttribute<T>,
    path: &Path,
    default: Option<&'a MutatedAttribute<T>>,
) -> Option<&'a MutatedAttribute<T>> {
    model.lookup(path).or(default)
}

/// Mirror the shape of `model`, stamping every leaf with `value`.
///
/// Containers become same-kind containers and are recursed into. Each
/// container is recorded by address before recursing and a container seen
/// before is skipped: it is dropped from mappings and left as a hole in
/// sequences. This stops cycles in [`Shape`] graphs, and it also means an
/// aliased sub-object is mirrored only at its first position.
///
/// A non-container `model` mirrors to an empty mapping.
pub fn set_all_attributes_muted<S: Shape, T: Clone>(model: &S, value: &T) -> MutatedAttribute<T> {
    let mut visited: HashSet<*const S> = HashSet::new();
    visited.insert(model as *const S);
    mirror(model, value, &mut visited)
}

fn mirror<S: Shape, T: Clone>(
    node: &S,
    value: &T,
    visited: &mut HashSet<*const S>,
) -> MutatedAttribute<T> {
    match node.node() {
        ShapeNode::Mapping(entries) => MutatedAttribute::Mapping(
            entries
                .into_iter()
                .filter_map(|(key, child)| {
                    mirror_child(child, value, visited).map(|m| (key.to_owned(), m))
                })
                .collect::<BTreeMap<_, _>>(),
        ),
        ShapeNode::Sequence(items) => MutatedAttribute::Sequence(
            items
                .into_iter()
                .map(|item| item.and_then(|child| mirror_child(child, value, visited)))
                .collect(),
        ),
        ShapeNode::Leaf => MutatedAttribute::mapping(),
    }
}

fn mirror_child<S: Shape, T: Clone>(
    child: &S,
    value: &T,
    visited: &mut HashSet<*const S>,
) -> Option<MutatedAttribute<T>> {
    if !child.is_container() {
        return Some(MutatedAttribute::Descriptor(value.clone()));
    }
    if !visited.insert(child as *const S) {
        tracing::trace!("skipping already mirrored container");
        return None;
    }
    Some(mirror(child, value, visited))
}

/// How many slots a single write may add past the end of a sequence.
///
/// Writes further out fail with [`MutationError::IndexOutOfRange`].
pub const MAX_SEQUENCE_GROWTH: usize = 1 << 16;

/// Write `value` at `path`, returning the updated tree.
///
/// `None` is the unset marker: it removes a mapping key or leaves a hole in a
/// sequence. Missing spine containers are synthesized: a sequence when the
/// segment applied to them is an index, a mapping otherwise. A descriptor on
/// the spine, or a sequence addressed by a key, is replaced the same way.
/// Writing past the end of a sequence leaves holes in the skipped slots.
///
/// Returns `Cow::Borrowed(model)` when the path already holds `value`.
///
/// # Errors
///
/// [`MutationError::IndexOutOfRange`] when the write would add more than
/// [`MAX_SEQUENCE_GROWTH`] slots to a sequence. `model` is unaffected.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
/// use tirea_mutation::{parse_path, set_all_attributes_muted, set_attribute_mutated, MutatedAttribute};
/// use serde_json::json;
///
/// let tree = set_all_attributes_muted(&json!({"roles": ["reader", "writer"]}), &false);
/// let roles_1 = parse_path("roles[1]").unwrap();
///
/// let updated = set_attribute_mutated(&tree, Some(true.into()), &roles_1).unwrap();
/// assert_eq!(updated.to_value().unwrap(), json!({"roles": [false, true]}));
/// assert_eq!(tree.to_value().unwrap(), json!({"roles": [false, false]}));
///
/// let unchanged = set_attribute_mutated(&tree, Some(false.into()), &roles_1).unwrap();
/// assert!(matches!(unchanged, Cow::Borrowed(_)));
/// ```
pub fn set_attribute_mutated<'a, T: Clone + PartialEq>(
    model: &'a MutatedAttribute<T>,
    value: Option<MutatedAttribute<T>>,
    path: &Path,
) -> MutationResult<Cow<'a, MutatedAttribute<T>>> {
    if model.lookup(path) == value.as_ref() {
        tracing::trace!(path = %path, "path already holds value, keeping tree");
        return Ok(Cow::Borrowed(model));
    }

    if path.is_empty() {
        return Ok(Cow::Owned(value.unwrap_or_default()));
    }

    let mut copy = model.clone();
    write_at(&mut copy, path.segments(), value, path)?;
    Ok(Cow::Owned(copy))
}

/// Write the same `value` at every path, in order.
///
/// Each write sees the result of the previous one. Returns
/// `Cow::Borrowed(model)` when no write changed anything. The first failing
/// write aborts the whole batch.
pub fn set_attribute_mutated_multiple<'a, 'p, T, I>(
    model: &'a MutatedAttribute<T>,
    value: Option<MutatedAttribute<T>>,
    paths: I,
) -> MutationResult<Cow<'a, MutatedAttribute<T>>>
where
    T: Clone + PartialEq,
    I: IntoIterator<Item = &'p Path>,
{
    let mut current = Cow::Borrowed(model);
    for path in paths {
        if let Cow::Owned(tree) = set_attribute_mutated(&current, value.clone(), path)? {
            current = Cow::Owned(tree);
        }
    }
    Ok(current)
}

/// Read an independent copy of the node at `path`.
///
/// Absence is `None`; unlike [`get_attribute`] there is no fallback.
pub fn get_attribute_mutation<T: Clone>(
    model: &MutatedAttribute<T>,
    path: &Path,
) -> Option<MutatedAttribute<T>> {
    model.lookup(path).cloned()
}

/// Position inside a container, after the container has been made able to
/// hold the segment.
enum Slot<'n, T> {
    Key(&'n mut BTreeMap<String, MutatedAttribute<T>>, String),
    Index(&'n mut Vec<Option<MutatedAttribute<T>>>, usize),
}

fn slot_for<'n, T>(node: &'n mut MutatedAttribute<T>, seg: &Seg) -> Slot<'n, T> {
    match (node, seg) {
        (MutatedAttribute::Sequence(items), Seg::Index(i)) => Slot::Index(items, *i),
        (MutatedAttribute::Mapping(map), seg) => Slot::Key(map, seg.to_key()),
        (node, seg) => {
            *node = MutatedAttribute::container_for(seg);
            slot_for(node, seg)
        }
    }
}

fn write_at<T>(
    node: &mut MutatedAttribute<T>,
    segs: &[Seg],
    value: Option<MutatedAttribute<T>>,
    path: &Path,
) -> MutationResult<()> {
    let Some((seg, rest)) = segs.split_first() else {
        return Ok(());
    };

    match (slot_for(node, seg), rest.first()) {
        (Slot::Key(map, key), Some(next)) => {
            let child = map
                .entry(key)
                .or_insert_with(|| MutatedAttribute::container_for(next));
            write_at(child, rest, value, path)
        }
        (Slot::Index(items, i), Some(next)) => {
            grow(items, i, path)?;
            let child = items[i].get_or_insert_with(|| MutatedAttribute::container_for(next));
            write_at(child, rest, value, path)
        }
        (Slot::Key(map, key), None) => {
            match value {
                Some(value) => {
                    map.insert(key, value);
                }
                None => {
                    map.remove(&key);
                }
            }
            Ok(())
        }
        (Slot::Index(items, i), None) => {
            match value {
                Some(value) => {
                    grow(items, i, path)?;
                    items[i] = Some(value);
                }
                None => {
                    if let Some(slot) = items.get_mut(i) {
                        *slot = None;
                    }
                }
            }
            Ok(())
        }
    }
}

/// Make `index` addressable, leaving holes in skipped slots.
fn grow<T>(
    items: &mut Vec<Option<MutatedAttribute<T>>>,
    index: usize,
    path: &Path,
) -> MutationResult<()> {
    if index < items.len() {
        return Ok(());
    }
    let gap = index - items.len();
    if gap >= MAX_SEQUENCE_GROWTH {
        return Err(MutationError::index_out_of_range(
            path.to_string(),
            index,
            items.len(),
        ));
    }
    items.try_reserve(gap + 1)?;
    items.resize_with(index + 1, || None);
    Ok(())
}
