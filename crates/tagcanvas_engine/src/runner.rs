//! Submit-then-poll driver for one generation job.
use std::time::Duration;

use canvas_logging::{canvas_debug, canvas_warn};
use tagcanvas_core::{JobId, Ticket};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, GenerationBackend, GenerationError, JobProgress};

#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Delay between a not-ready snapshot and the next progress request.
    pub interval: Duration,
    /// `None` polls until the job is ready or a request fails.
    pub max_attempts: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: None,
        }
    }
}

/// Runs one job to a terminal state, reporting every step to `sink`.
///
/// Progress requests are strictly sequential. Once `cancel` fires the job
/// stops at its next await point and reports nothing further.
pub async fn run_job(
    backend: &dyn GenerationBackend,
    ticket: Ticket,
    prompt: &str,
    settings: &PollSettings,
    cancel: &CancellationToken,
    sink: &dyn EventSink,
) {
    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        outcome = drive(backend, ticket, prompt, settings, sink) => Some(outcome),
    };

    let progress = match outcome {
        None => {
            canvas_debug!("Job {} cancelled", ticket);
            return;
        }
        Some(Ok(images)) => JobProgress::Completed { images },
        Some(Err(err)) => {
            canvas_warn!("Job {} failed: {}", ticket, err);
            JobProgress::Failed(err)
        }
    };
    sink.emit(EngineEvent::Job { ticket, progress });
}

async fn drive(
    backend: &dyn GenerationBackend,
    ticket: Ticket,
    prompt: &str,
    settings: &PollSettings,
    sink: &dyn EventSink,
) -> Result<Vec<String>, GenerationError> {
    let response = backend
        .submit(prompt)
        .await
        .map_err(GenerationError::Submit)?;
    let job_id = response
        .prompt_id
        .and_then(JobId::new)
        .ok_or(GenerationError::MissingPromptId)?;
    canvas_debug!("Job {} accepted as {}", ticket, job_id);
    sink.emit(EngineEvent::Job {
        ticket,
        progress: JobProgress::Accepted {
            job_id: job_id.clone(),
        },
    });

    let mut attempt: u32 = 0;
    loop {
        attempt = attempt.saturating_add(1);
        let snapshot = backend
            .progress(&job_id)
            .await
            .map_err(GenerationError::Poll)?;
        if let Some(images) = snapshot.ready_images() {
            return Ok(images);
        }
        if settings.max_attempts.is_some_and(|max| attempt >= max) {
            return Err(GenerationError::PollLimit { attempts: attempt });
        }
        sink.emit(EngineEvent::Job {
            ticket,
            progress: JobProgress::Waiting { attempt },
        });
        tokio::time::sleep(settings.interval).await;
    }
}
