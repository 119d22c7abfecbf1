use crate::{JobUpdate, SearchToken, Tag, Ticket};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the tag search box.
    SearchInputChanged(String),
    /// Suggestion lookup finished; failures arrive as an empty list.
    SuggestionsLoaded {
        token: SearchToken,
        candidates: Vec<Tag>,
    },
    /// User picked an entry from the suggestion list by position.
    SuggestionChosen(usize),
    /// User added a tag directly.
    TagSelected(Tag),
    /// User removed a selected tag by name.
    TagRemoved(String),
    SelectionCleared,
    /// User asked to generate from the current selection.
    GenerateClicked,
    /// User submitted free text as the prompt.
    PromptSubmitted(String),
    /// Engine progress for a job.
    Job { ticket: Ticket, update: JobUpdate },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
