//! Ordered prompt snapshots.

use crate::prompt::Prompt;
use serde::{Deserialize, Serialize};

/// How prompts with a name already present are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Keep every record; lookups return the first match.
    #[default]
    Accumulate,
    /// A later record replaces the earlier one with the same name.
    #[serde(rename = "replace")]
    ReplaceByName,
}

/// An ordered, immutable batch of prompts.
///
/// Collections are built once per load and then shared read-only. Updates
/// produce a new collection via [`PromptCollection::merged`].
///
/// # Examples
///
/// ```
/// use lmp_pm::{MergePolicy, Prompt, PromptCollection};
///
/// let base = PromptCollection::from(vec![Prompt::new("Fix", "v1")]);
/// let user = PromptCollection::from(vec![Prompt::new("Fix", "v2")]);
///
/// let merged = base.merged(user, MergePolicy::ReplaceByName);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged.get("Fix").unwrap().prompt, "v2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PromptCollection {
    prompts: Vec<Prompt>,
}

impl PromptCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first prompt named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.name == name)
    }

    /// Prompt names in collection order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.prompts.iter().map(|p| p.name.as_str()).collect()
    }

    /// Iterates over prompts in collection order.
    pub fn iter(&self) -> std::slice::Iter<'_, Prompt> {
        self.prompts.iter()
    }

    /// Number of prompts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Whether the collection holds no prompts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Combines two collections into a new one.
    #[must_use]
    pub fn merged(mut self, other: PromptCollection, policy: MergePolicy) -> Self {
        match policy {
            MergePolicy::Accumulate => self.prompts.extend(other.prompts),
            MergePolicy::ReplaceByName => {
                for prompt in other.prompts {
                    match self.prompts.iter_mut().find(|p| p.name == prompt.name) {
                        Some(existing) => *existing = prompt,
                        None => self.prompts.push(prompt),
                    }
                }
            }
        }
        self
    }
}

impl From<Vec<Prompt>> for PromptCollection {
    fn from(prompts: Vec<Prompt>) -> Self {
        Self { prompts }
    }
}

impl FromIterator<Prompt> for PromptCollection {
    fn from_iter<I: IntoIterator<Item = Prompt>>(iter: I) -> Self {
        Self {
            prompts: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PromptCollection {
    type Item = &'a Prompt;
    type IntoIter = std::slice::Iter<'a, Prompt>;

    fn into_iter(self) -> Self::IntoIter {
        self.prompts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(entries: &[(&str, &str)]) -> PromptCollection {
        entries
            .iter()
            .map(|(name, body)| Prompt::new(*name, *body))
            .collect()
    }

    #[test]
    fn test_get_returns_first_match() {
        let prompts = collection(&[("A", "first"), ("B", "b"), ("A", "second")]);
        assert_eq!(prompts.get("A").unwrap().prompt, "first");
        assert!(prompts.get("missing").is_none());
    }

    #[test]
    fn test_accumulate_keeps_duplicates_in_order() {
        let merged = collection(&[("A", "1")]).merged(
            collection(&[("A", "2"), ("B", "3")]),
            MergePolicy::Accumulate,
        );
        assert_eq!(merged.names(), vec!["A", "A", "B"]);
        assert_eq!(merged.get("A").unwrap().prompt, "1");
    }

    #[test]
    fn test_replace_by_name_overwrites_in_place() {
        let merged = collection(&[("A", "1"), ("B", "2")]).merged(
            collection(&[("B", "new"), ("C", "3")]),
            MergePolicy::ReplaceByName,
        );
        assert_eq!(merged.names(), vec!["A", "B", "C"]);
        assert_eq!(merged.get("B").unwrap().prompt, "new");
    }

    #[test]
    fn test_merge_policy_deserializes_from_config_spelling() {
        #[derive(Deserialize)]
        struct Wrapper {
            merge: MergePolicy,
        }
        let w: Wrapper = serde_json::from_str(r#"{"merge":"replace"}"#).unwrap();
        assert_eq!(w.merge, MergePolicy::ReplaceByName);
        let w: Wrapper = serde_json::from_str(r#"{"merge":"accumulate"}"#).unwrap();
        assert_eq!(w.merge, MergePolicy::Accumulate);
    }
}
