use std::sync::mpsc;
use std::thread;

use canvas_logging::{canvas_info, canvas_warn};
use tagcanvas_core::{Effect, JobFailure, JobUpdate, Msg};
use tagcanvas_engine::{
    EngineConfig, EngineError, EngineEvent, EngineEvents, EngineHandle, GenerationError,
    JobProgress,
};

use super::app::Input;

/// Carries effects from the core to the engine and engine events back as
/// messages.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, input_tx: mpsc::Sender<Input>) -> Result<Self, EngineError> {
        let (engine, events) = EngineHandle::spawn(config)?;
        spawn_event_loop(events, input_tx);
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SearchTags { token, fragment } => {
                    self.engine.search(token, fragment);
                }
                Effect::SubmitJob { ticket, prompt } => {
                    canvas_info!("Submitting job {} ({} chars)", ticket, prompt.as_str().len());
                    self.engine.start_job(ticket, prompt.into_string());
                }
                Effect::CancelJob { ticket } => {
                    self.engine.cancel_job(ticket);
                }
                Effect::ImagesReady { ticket, images } => {
                    canvas_info!("Job {} ready with {} image(s)", ticket, images.len());
                    self.engine.save_images(ticket, images);
                }
            }
        }
    }
}

fn spawn_event_loop(events: EngineEvents, input_tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if input_tx.send(map_event(event)).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Input {
    match event {
        EngineEvent::SuggestionsReady { token, tags } => Input::Msg(Msg::SuggestionsLoaded {
            token,
            candidates: tags,
        }),
        EngineEvent::Job { ticket, progress } => Input::Msg(Msg::Job {
            ticket,
            update: map_progress(progress),
        }),
        EngineEvent::AssetSaved {
            ticket,
            source,
            path,
        } => {
            canvas_info!("Job {} saved {} to {}", ticket, source, path.display());
            Input::AssetSettled
        }
        EngineEvent::AssetFailed {
            ticket,
            source,
            reason,
        } => {
            canvas_warn!("Job {} could not save {}: {}", ticket, source, reason);
            Input::AssetSettled
        }
    }
}

fn map_progress(progress: JobProgress) -> JobUpdate {
    match progress {
        JobProgress::Accepted { job_id } => JobUpdate::Accepted { job_id },
        JobProgress::Waiting { attempt } => JobUpdate::Waiting { attempt },
        JobProgress::Completed { images } => JobUpdate::Ready { images },
        JobProgress::Failed(err) => JobUpdate::Failed(map_failure(&err)),
    }
}

fn map_failure(err: &GenerationError) -> JobFailure {
    canvas_warn!("Generation failed: {}", err);
    if err.is_submission() {
        JobFailure::submission(err.to_string())
    } else {
        JobFailure::poll(err.to_string())
    }
}
