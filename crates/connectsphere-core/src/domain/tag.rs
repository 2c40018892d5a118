use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Labels offered by the tag picker. Records may carry labels outside it.
pub const DEFAULT_TAG_PALETTE: &[&str] = &["Family", "Friend", "Work", "Team", "Client", "VIP"];

/// Trims a raw label. Matching stays case-sensitive, so case is preserved.
pub fn normalize_tag_label(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidTag);
    }
    Ok(trimmed.to_string())
}

/// Insertion-ordered tag labels without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the label was already present.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.contains(&label) {
            return false;
        }
        self.0.push(label);
        true
    }

    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != label);
        self.0.len() != before
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|existing| existing == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for TagSet {
    fn from(value: Vec<String>) -> Self {
        value.into_iter().collect()
    }
}

impl From<TagSet> for Vec<String> {
    fn from(value: TagSet) -> Self {
        value.0
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}
