use crate::Tag;

/// Minimum trimmed length, in characters, of a prompt that may be submitted.
pub const MIN_PROMPT_CHARS: usize = 5;

/// Text payload sent to the generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Prompt(String);

impl Prompt {
    pub fn from_tags(tags: &[Tag]) -> Self {
        let joined = tags.iter().map(Tag::name).collect::<Vec<_>>().join(", ");
        Self(joined)
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Short or blank prompts never reach the backend.
    pub fn is_eligible(&self) -> bool {
        self.0.trim().chars().count() >= MIN_PROMPT_CHARS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
