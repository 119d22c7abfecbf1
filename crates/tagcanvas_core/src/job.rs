//! Job Controller: the lifecycle of the single active generation job.
//!
//! Every job is stamped with a [`Ticket`] when it is submitted. Updates coming
//! back from the engine carry that ticket and are only applied while it is
//! still the active one, so a late answer for a superseded job is dropped here
//! regardless of whether the engine managed to stop the old poll loop.
use std::fmt;

use canvas_logging::{canvas_debug, canvas_info};

use crate::{Effect, Prompt};

pub const STATUS_GENERATING: &str = "Generating image...";
pub const STATUS_WAITING: &str = "Generating image... (progress: waiting)";

/// Generation counter identifying one `submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque backend-issued job identifier (`prompt_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    /// Returns `None` for an empty id, which the backend contract treats as missing.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Submission,
    Poll,
}

impl FailureStage {
    pub fn headline(self) -> &'static str {
        match self {
            FailureStage::Submission => "Error generating image.",
            FailureStage::Poll => "Error fetching progress.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub stage: FailureStage,
    pub message: String,
}

impl JobFailure {
    pub fn submission(message: impl Into<String>) -> Self {
        Self {
            stage: FailureStage::Submission,
            message: message.into(),
        }
    }

    pub fn poll(message: impl Into<String>) -> Self {
        Self {
            stage: FailureStage::Poll,
            message: message.into(),
        }
    }
}

/// Progress reported by the engine for one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobUpdate {
    /// Submission succeeded and the backend issued an id.
    Accepted { job_id: JobId },
    /// A progress snapshot came back not ready; `attempt` counts snapshots so far.
    Waiting { attempt: u32 },
    /// Rendered image URLs in backend order.
    Ready { images: Vec<String> },
    Failed(JobFailure),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Submitting {
        ticket: Ticket,
    },
    Polling {
        ticket: Ticket,
        job_id: JobId,
        checks: u32,
    },
    Ready {
        ticket: Ticket,
        job_id: JobId,
        images: Vec<String>,
    },
    Failed {
        ticket: Ticket,
        failure: JobFailure,
    },
}

impl JobPhase {
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            JobPhase::Idle => None,
            JobPhase::Submitting { ticket }
            | JobPhase::Polling { ticket, .. }
            | JobPhase::Ready { ticket, .. }
            | JobPhase::Failed { ticket, .. } => Some(*ticket),
        }
    }

    /// True while the engine may still be working on the job.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, JobPhase::Submitting { .. } | JobPhase::Polling { .. })
    }

    /// Human-readable progress line for non-terminal phases.
    pub fn status_line(&self) -> Option<&'static str> {
        match self {
            JobPhase::Submitting { .. } | JobPhase::Polling { checks: 0, .. } => {
                Some(STATUS_GENERATING)
            }
            JobPhase::Polling { .. } => Some(STATUS_WAITING),
            JobPhase::Idle | JobPhase::Ready { .. } | JobPhase::Failed { .. } => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            JobPhase::Idle => "Idle",
            JobPhase::Submitting { .. } => "Submitting",
            JobPhase::Polling { .. } => "Polling",
            JobPhase::Ready { .. } => "Ready",
            JobPhase::Failed { .. } => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobController {
    phase: JobPhase,
    issued: u64,
}

impl JobController {
    pub fn phase(&self) -> &JobPhase {
        &self.phase
    }

    /// Starts a new job for `prompt`, superseding whatever job was active.
    ///
    /// Ineligible prompts leave the controller untouched and produce no effects.
    pub fn submit(&mut self, prompt: Prompt) -> Vec<Effect> {
        if !prompt.is_eligible() {
            canvas_debug!(
                "Ignoring ineligible prompt ({} chars) in phase {}",
                prompt.as_str().trim().chars().count(),
                self.phase.name()
            );
            return Vec::new();
        }

        let mut effects = Vec::with_capacity(2);
        if self.phase.is_in_flight() {
            if let Some(previous) = self.phase.ticket() {
                canvas_debug!("Superseding in-flight job {}", previous);
                effects.push(Effect::CancelJob { ticket: previous });
            }
        }

        self.issued += 1;
        let ticket = Ticket(self.issued);
        canvas_debug!("{} -> Submitting ticket={}", self.phase.name(), ticket);
        self.phase = JobPhase::Submitting { ticket };
        effects.push(Effect::SubmitJob { ticket, prompt });
        effects
    }

    /// Applies an engine update. Returns `false` when it was stale or not
    /// legal in the current phase, in which case nothing changed.
    pub fn apply(&mut self, ticket: Ticket, update: JobUpdate) -> bool {
        if self.phase.ticket() != Some(ticket) {
            canvas_debug!(
                "Discarding stale update for {} (active {:?})",
                ticket,
                self.phase.ticket()
            );
            return false;
        }

        let phase = std::mem::take(&mut self.phase);
        let from = phase.name();
        let (next, applied) = match (phase, update) {
            (JobPhase::Submitting { ticket }, JobUpdate::Accepted { job_id }) => (
                JobPhase::Polling {
                    ticket,
                    job_id,
                    checks: 0,
                },
                true,
            ),
            (JobPhase::Polling { ticket, job_id, .. }, JobUpdate::Waiting { attempt }) => (
                JobPhase::Polling {
                    ticket,
                    job_id,
                    checks: attempt,
                },
                true,
            ),
            (JobPhase::Polling { ticket, job_id, .. }, JobUpdate::Ready { images }) => {
                canvas_info!("Job {} ready with {} image(s)", job_id, images.len());
                (
                    JobPhase::Ready {
                        ticket,
                        job_id,
                        images,
                    },
                    true,
                )
            }
            (
                JobPhase::Submitting { ticket } | JobPhase::Polling { ticket, .. },
                JobUpdate::Failed(failure),
            ) => (JobPhase::Failed { ticket, failure }, true),
            (phase, update) => {
                canvas_debug!("Ignoring {:?} while {}", update, phase.name());
                (phase, false)
            }
        };

        if applied {
            canvas_debug!("{} -> {} ticket={}", from, next.name(), ticket);
        }
        self.phase = next;
        applied
    }
}
