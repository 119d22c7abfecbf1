use std::fmt;

/// A descriptive tag as returned by the search backend.
///
/// Identity is the `tag` text; `score` is backend-assigned relevance and does
/// not take part in equality checks inside a [`crate::TagSelection`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub tag: String,
    pub score: Option<f64>,
}

impl Tag {
    /// Builds a tag from text, trimming surrounding whitespace.
    ///
    /// Returns `None` when nothing is left after trimming.
    pub fn new(tag: impl AsRef<str>) -> Option<Self> {
        Self::scored(tag, None)
    }

    pub fn scored(tag: impl AsRef<str>, score: Option<f64>) -> Option<Self> {
        let trimmed = tag.as_ref().trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            tag: trimmed.to_string(),
            score,
        })
    }

    pub fn name(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}
