//! Tagcanvas engine: backend IO, the job poll loop and effect execution.
mod assets;
mod backend;
mod engine;
mod filename;
mod persist;
mod runner;
mod search;
mod sink;
mod types;
mod wire;

pub use assets::save_images;
pub use backend::{BackendSettings, GenerationBackend, HttpBackend};
pub use engine::{EngineConfig, EngineError, EngineEvents, EngineHandle};
pub use filename::asset_filename;
pub use persist::{ImageStore, PersistError};
pub use runner::{run_job, PollSettings};
pub use search::{query_tags, run_search};
pub use sink::{ChannelEventSink, EventSink};
pub use types::{EngineEvent, GenerationError, JobProgress, RequestError, RequestFailure};
pub use wire::{static_asset_path, ProgressSnapshot, SearchHit, SubmitRequest, SubmitResponse};
