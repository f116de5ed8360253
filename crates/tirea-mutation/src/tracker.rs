//! Stateful mutation tracker built on the path engine.

use crate::config::{InitialMutation, MutationConfig};
use crate::mutation::{
    get_attribute_mutation, set_all_attributes_muted, set_attribute_mutated,
    set_attribute_mutated_multiple,
};
use crate::path::{parse_path, IntoPath, Path};
use crate::shape::Shape;
use crate::{MutatedAttribute, MutationResult};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

/// Tracks one mutation descriptor per leaf of a target document.
///
/// The tracker mirrors the target's shape once, at construction, into a
/// template where every leaf holds the default descriptor. The live state
/// starts as a copy of the template with the initial mutation preset applied.
/// The target itself is never retained or modified.
///
/// Mutating calls take `&mut self`; share a tracker across threads behind a
/// `Mutex`.
///
/// # Examples
///
/// ```
/// use tirea_mutation::{InitialMutation, MutationConfig, MutationTracker};
/// use serde_json::json;
///
/// let user = json!({
///     "name": {"firstname": "John", "lastname": "Doe"},
///     "roles": ["reader", "writer"],
///     "address": "123 Happy Street"
/// });
/// let config = MutationConfig::new(false)
///     .with_initial_mutation(InitialMutation::new(["name.firstname"], true));
///
/// let mut tracker = MutationTracker::new(&user, config).unwrap();
/// tracker.set_mutated_by_attribute_name(true, "roles[1]").unwrap();
/// assert_eq!(tracker.get_descriptor("roles[1]").unwrap(), Some(true));
///
/// tracker.reset();
/// assert_eq!(
///     tracker.state().to_value().unwrap(),
///     json!({
///         "name": {"firstname": true, "lastname": false},
///         "roles": [false, false],
///         "address": false
///     })
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MutationTracker<T> {
    template: MutatedAttribute<T>,
    initial: MutatedAttribute<T>,
    current: MutatedAttribute<T>,
    default_value: T,
    initial_mutation: Option<InitialMutation<T>>,
}

impl<T: Clone + PartialEq> MutationTracker<T> {
    /// Track the shape of a JSON document.
    pub fn new(target: &Value, config: MutationConfig<T>) -> MutationResult<Self> {
        Self::from_shape(target, config)
    }

    /// Track the shape of any serializable value.
    pub fn from_serializable<S>(target: &S, config: MutationConfig<T>) -> MutationResult<Self>
    where
        S: Serialize + ?Sized,
    {
        let value = serde_json::to_value(target)?;
        Self::from_shape(&value, config)
    }

    /// Track the shape of any [`Shape`].
    ///
    /// Fails if a preset path is malformed or cannot be written.
    pub fn from_shape<S: Shape>(target: &S, config: MutationConfig<T>) -> MutationResult<Self> {
        let template = set_all_attributes_muted(target, &config.default_value);
        let initial = match &config.initial_mutation {
            Some(preset) if !preset.attributes.is_empty() => apply_preset(&template, preset)?,
            _ => template.clone(),
        };

        tracing::debug!(
            preset_paths = config
                .initial_mutation
                .as_ref()
                .map_or(0, |preset| preset.attributes.len()),
            "mutation tracker ready"
        );
        Ok(Self {
            current: initial.clone(),
            initial,
            template,
            default_value: config.default_value,
            initial_mutation: config.initial_mutation,
        })
    }

    /// Copy of the current shadow tree.
    pub fn state(&self) -> MutatedAttribute<T> {
        self.current.clone()
    }

    /// The all-default template the tracker clears back to.
    pub fn template(&self) -> &MutatedAttribute<T> {
        &self.template
    }

    /// Descriptor stamped on the template's leaves.
    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    /// Paths of the initial mutation preset; empty without one.
    pub fn initially_mutated_attributes(&self) -> Vec<String> {
        self.initial_mutation
            .as_ref()
            .map(|preset| preset.attributes.clone())
            .unwrap_or_default()
    }

    /// Descriptor of the initial mutation preset, if configured.
    pub fn initially_mutated_value(&self) -> Option<T> {
        self.initial_mutation
            .as_ref()
            .map(|preset| preset.value.clone())
    }

    /// Restore the all-default template, ignoring the preset.
    pub fn clear(&mut self) {
        self.current = self.template.clone();
        tracing::debug!("mutation state cleared");
    }

    /// Restore the template with the initial mutation preset applied.
    ///
    /// The preset was applied once at construction; resetting restores that
    /// result.
    pub fn reset(&mut self) {
        self.current = self.initial.clone();
        tracing::debug!("mutation state reset");
    }

    /// Stamp `value` on every leaf of the current state.
    ///
    /// The shape comes from the current state, so paths written since
    /// construction are included.
    pub fn set_all(&mut self, value: T) {
        self.current = set_all_attributes_muted(&self.current, &value);
        tracing::debug!("all mutation descriptors overwritten");
    }

    /// Set the descriptor at one path.
    ///
    /// Fails on a malformed path, or when the write would grow a sequence
    /// past [`MAX_SEQUENCE_GROWTH`](crate::MAX_SEQUENCE_GROWTH). The state is
    /// unchanged on failure.
    pub fn set_mutated_by_attribute_name(
        &mut self,
        value: T,
        path: impl IntoPath,
    ) -> MutationResult<()> {
        let path = path.into_path()?;
        tracing::trace!(path = %path, "set mutation descriptor");
        self.write(Some(MutatedAttribute::Descriptor(value)), &path)
    }

    /// Set the same descriptor at several paths, in order.
    ///
    /// All paths are parsed before anything is written, and the writes are
    /// committed together: on any failure the state is untouched.
    pub fn set_mutated_by_attribute_names<I>(&mut self, value: T, paths: I) -> MutationResult<()>
    where
        I: IntoIterator,
        I::Item: IntoPath,
    {
        let paths = paths
            .into_iter()
            .map(IntoPath::into_path)
            .collect::<MutationResult<Vec<_>>>()?;
        tracing::trace!(paths = paths.len(), "set mutation descriptors");

        let value = Some(MutatedAttribute::Descriptor(value));
        if let Cow::Owned(updated) = set_attribute_mutated_multiple(&self.current, value, &paths)? {
            self.current = updated;
        }
        Ok(())
    }

    /// Remove whatever is stored at a path.
    pub fn unset_mutated_by_attribute_name(&mut self, path: impl IntoPath) -> MutationResult<()> {
        let path = path.into_path()?;
        tracing::trace!(path = %path, "unset mutation descriptor");
        self.write(None, &path)
    }

    /// Copy of the node at a path, or `None` when absent.
    pub fn get_mutated_by_attribute_name(
        &self,
        path: impl IntoPath,
    ) -> MutationResult<Option<MutatedAttribute<T>>> {
        let path = path.into_path()?;
        Ok(get_attribute_mutation(&self.current, &path))
    }

    /// Descriptor at a path; `None` when absent or when the path names a
    /// subtree.
    pub fn get_descriptor(&self, path: impl IntoPath) -> MutationResult<Option<T>> {
        let path = path.into_path()?;
        Ok(self
            .current
            .lookup(&path)
            .and_then(MutatedAttribute::descriptor)
            .cloned())
    }

    fn write(&mut self, value: Option<MutatedAttribute<T>>, path: &Path) -> MutationResult<()> {
        if let Cow::Owned(updated) = set_attribute_mutated(&self.current, value, path)? {
            self.current = updated;
        }
        Ok(())
    }
}

/// The template with the preset descriptor written at every preset path.
fn apply_preset<T: Clone + PartialEq>(
    template: &MutatedAttribute<T>,
    preset: &InitialMutation<T>,
) -> MutationResult<MutatedAttribute<T>> {
    let paths = preset
        .attributes
        .iter()
        .map(|attribute| parse_path(attribute))
        .collect::<MutationResult<Vec<_>>>()?;
    let value = Some(MutatedAttribute::Descriptor(preset.value.clone()));
    Ok(set_attribute_mutated_multiple(template, value, &paths)?.into_owned())
}
