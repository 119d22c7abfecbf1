use crate::{Prompt, Tag};

/// Ordered, duplicate-free multi-select of tags.
///
/// Insertion order is display order and also the order tags appear in the
/// derived prompt.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagSelection {
    tags: Vec<Tag>,
}

impl TagSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `tag` unless a tag with the same text is already selected.
    pub fn add(&mut self, tag: Tag) -> bool {
        if self.contains(tag.name()) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|tag| tag.name() != name);
        self.tags.len() != before
    }

    pub fn clear(&mut self) -> bool {
        let had_tags = !self.tags.is_empty();
        self.tags.clear();
        had_tags
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name() == name)
    }

    pub fn current(&self) -> &[Tag] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Comma-joined tag text in selection order.
    pub fn prompt(&self) -> Prompt {
        Prompt::from_tags(&self.tags)
    }
}
