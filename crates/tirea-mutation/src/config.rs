//! Tracker configuration.

use serde::{Deserialize, Serialize};

/// Descriptor applied to a set of attributes after every reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialMutation<T> {
    /// Paths receiving `value`, applied in order.
    #[serde(default, alias = "mutatedAttributes")]
    pub attributes: Vec<String>,
    /// Descriptor written at each path.
    #[serde(alias = "mutatedValue")]
    pub value: T,
}

impl<T> InitialMutation<T> {
    pub fn new<I, S>(attributes: I, value: T) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            value,
        }
    }
}

/// Configuration for a [`MutationTracker`](crate::MutationTracker).
///
/// # Examples
///
/// ```
/// use tirea_mutation::MutationConfig;
///
/// let config: MutationConfig<bool> = serde_json::from_str(
///     r#"{"defaultValue": false, "initialMutation": {"mutatedAttributes": ["name.firstname"], "mutatedValue": true}}"#,
/// )
/// .unwrap();
///
/// assert!(!config.default_value);
/// assert_eq!(config.initial_mutation.unwrap().attributes, vec!["name.firstname"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationConfig<T> {
    /// Descriptor stamped on every leaf of the template.
    pub default_value: T,
    /// Optional preset re-applied after every reset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_mutation: Option<InitialMutation<T>>,
}

impl<T> MutationConfig<T> {
    pub fn new(default_value: T) -> Self {
        Self {
            default_value,
            initial_mutation: None,
        }
    }

    #[must_use]
    pub fn with_initial_mutation(mut self, initial_mutation: InitialMutation<T>) -> Self {
        self.initial_mutation = Some(initial_mutation);
        self
    }
}

impl<T: Default> Default for MutationConfig<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
