use std::fmt;
use std::path::PathBuf;

use tagcanvas_core::{JobId, SearchToken, Tag, Ticket};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Suggestions for a lookup. Transport failures arrive as an empty list.
    SuggestionsReady { token: SearchToken, tags: Vec<Tag> },
    Job { ticket: Ticket, progress: JobProgress },
    AssetSaved {
        ticket: Ticket,
        source: String,
        path: PathBuf,
    },
    AssetFailed {
        ticket: Ticket,
        source: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobProgress {
    Accepted { job_id: JobId },
    Waiting { attempt: u32 },
    Completed { images: Vec<String> },
    Failed(GenerationError),
}

/// Failure of a single HTTP exchange with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct RequestError {
    pub kind: RequestFailure,
    pub message: String,
}

impl RequestError {
    pub(crate) fn new(kind: RequestFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::InvalidUrl => write!(f, "invalid url"),
            RequestFailure::HttpStatus(code) => write!(f, "http status {code}"),
            RequestFailure::Timeout => write!(f, "timeout"),
            RequestFailure::Network => write!(f, "network error"),
            RequestFailure::Decode => write!(f, "malformed response"),
            RequestFailure::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}

/// Terminal failure of a generation job. None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Failed to generate image ({0})")]
    Submit(RequestError),
    #[error("No prompt_id returned from server")]
    MissingPromptId,
    #[error("Failed to fetch progress ({0})")]
    Poll(RequestError),
    #[error("No result after {attempts} progress checks")]
    PollLimit { attempts: u32 },
}

impl GenerationError {
    /// True when the job never got a backend id.
    pub fn is_submission(&self) -> bool {
        matches!(
            self,
            GenerationError::Submit(_) | GenerationError::MissingPromptId
        )
    }
}
