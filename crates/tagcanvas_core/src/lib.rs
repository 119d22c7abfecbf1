//! Tagcanvas core: pure state machine and view-model helpers.
mod effect;
mod job;
mod msg;
mod prompt;
mod search;
mod selection;
mod state;
mod tag;
mod update;
mod view_model;

pub use effect::Effect;
pub use job::{
    FailureStage, JobController, JobFailure, JobId, JobPhase, JobUpdate, Ticket, STATUS_GENERATING,
    STATUS_WAITING,
};
pub use msg::Msg;
pub use prompt::{Prompt, MIN_PROMPT_CHARS};
pub use search::{SearchState, SearchToken, MIN_QUERY_CHARS};
pub use selection::TagSelection;
pub use state::AppState;
pub use tag::Tag;
pub use update::update;
pub use view_model::{AppViewModel, JobView, SuggestionView};
