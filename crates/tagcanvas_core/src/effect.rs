use crate::{Prompt, SearchToken, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Look up suggestions for `fragment`, superseding earlier lookups.
    SearchTags { token: SearchToken, fragment: String },
    /// Create a generation job and drive its poll loop.
    SubmitJob { ticket: Ticket, prompt: Prompt },
    /// Stop issuing requests for a superseded job.
    CancelJob { ticket: Ticket },
    /// A job reached `Ready`; emitted once per ticket.
    ImagesReady { ticket: Ticket, images: Vec<String> },
}
