use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use canvas_logging::{canvas_debug, canvas_error};
use tagcanvas_core::{SearchToken, Ticket};
use thiserror::Error;
use tokio::sync::mpsc as async_mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    run_job, run_search, save_images, BackendSettings, ChannelEventSink, EngineEvent, EventSink,
    GenerationBackend, HttpBackend, ImageStore, PollSettings, RequestError,
};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub backend: BackendSettings,
    pub poll: PollSettings,
    /// Quiet period before a suggestion lookup is sent.
    pub search_debounce: Duration,
    /// Where ready images are saved; `None` disables saving.
    pub output_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: BackendSettings::default(),
            poll: PollSettings::default(),
            search_debounce: Duration::from_millis(150),
            output_dir: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine: {0}")]
    Startup(#[from] std::io::Error),
    #[error("invalid backend configuration: {0}")]
    Backend(#[from] RequestError),
}

enum EngineCommand {
    Search { token: SearchToken, fragment: String },
    StartJob { ticket: Ticket, prompt: String },
    CancelJob { ticket: Ticket },
    SaveImages { ticket: Ticket, images: Vec<String> },
}

/// Sends work to the engine thread. Cheap to clone.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
}

/// Receiving end for everything the engine reports.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineEvents {
    /// Blocks until an event arrives; `None` once the engine has stopped.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

impl EngineHandle {
    pub fn spawn(config: EngineConfig) -> Result<(Self, EngineEvents), EngineError> {
        let backend: Arc<dyn GenerationBackend> = Arc::new(HttpBackend::new(&config.backend)?);
        Self::spawn_with_backend(config, backend)
    }

    /// Starts the engine thread around an arbitrary backend.
    ///
    /// All activities share one single-threaded runtime: searches and job
    /// loops interleave at their await points but never run in parallel.
    pub fn spawn_with_backend(
        config: EngineConfig,
        backend: Arc<dyn GenerationBackend>,
    ) -> Result<(Self, EngineEvents), EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));

        thread::Builder::new()
            .name("tagcanvas-engine".to_string())
            .spawn(move || {
                let mut dispatcher = Dispatcher::new(config, backend, sink);
                runtime.block_on(async move {
                    while let Some(command) = cmd_rx.recv().await {
                        dispatcher.handle(command);
                    }
                });
                canvas_debug!("Engine command channel closed");
            })?;

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn search(&self, token: SearchToken, fragment: impl Into<String>) {
        self.send(EngineCommand::Search {
            token,
            fragment: fragment.into(),
        });
    }

    /// Starts a job; any job already running is cancelled first.
    pub fn start_job(&self, ticket: Ticket, prompt: impl Into<String>) {
        self.send(EngineCommand::StartJob {
            ticket,
            prompt: prompt.into(),
        });
    }

    pub fn cancel_job(&self, ticket: Ticket) {
        self.send(EngineCommand::CancelJob { ticket });
    }

    pub fn save_images(&self, ticket: Ticket, images: Vec<String>) {
        self.send(EngineCommand::SaveImages { ticket, images });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            canvas_error!("Engine thread is no longer running");
        }
    }
}

/// Owns the only references to the active job and search tokens.
struct Dispatcher {
    config: EngineConfig,
    backend: Arc<dyn GenerationBackend>,
    sink: Arc<dyn EventSink>,
    store: Option<ImageStore>,
    active_job: Option<(Ticket, CancellationToken)>,
    active_search: Option<CancellationToken>,
}

impl Dispatcher {
    fn new(
        config: EngineConfig,
        backend: Arc<dyn GenerationBackend>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let store = config.output_dir.clone().map(ImageStore::new);
        Self {
            config,
            backend,
            sink,
            store,
            active_job: None,
            active_search: None,
        }
    }

    fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Search { token, fragment } => {
                let cancel = CancellationToken::new();
                if let Some(previous) = self.active_search.replace(cancel.clone()) {
                    previous.cancel();
                }
                let backend = self.backend.clone();
                let sink = self.sink.clone();
                let debounce = self.config.search_debounce;
                tokio::spawn(async move {
                    run_search(
                        backend.as_ref(),
                        token,
                        &fragment,
                        debounce,
                        &cancel,
                        sink.as_ref(),
                    )
                    .await;
                });
            }
            EngineCommand::StartJob { ticket, prompt } => {
                let cancel = CancellationToken::new();
                if let Some((previous, token)) = self.active_job.replace((ticket, cancel.clone())) {
                    canvas_debug!("Job {} superseded by {}", previous, ticket);
                    token.cancel();
                }
                let backend = self.backend.clone();
                let sink = self.sink.clone();
                let poll = self.config.poll.clone();
                tokio::spawn(async move {
                    run_job(
                        backend.as_ref(),
                        ticket,
                        &prompt,
                        &poll,
                        &cancel,
                        sink.as_ref(),
                    )
                    .await;
                });
            }
            EngineCommand::CancelJob { ticket } => {
                if matches!(&self.active_job, Some((active, _)) if *active == ticket) {
                    if let Some((_, token)) = self.active_job.take() {
                        canvas_debug!("Cancelling job {}", ticket);
                        token.cancel();
                    }
                }
            }
            EngineCommand::SaveImages { ticket, images } => {
                let Some(store) = self.store.clone() else {
                    canvas_debug!("No output directory configured; not saving {}", ticket);
                    return;
                };
                let backend = self.backend.clone();
                let sink = self.sink.clone();
                tokio::spawn(async move {
                    save_images(backend.as_ref(), ticket, &images, &store, sink.as_ref()).await;
                });
            }
        }
    }
}
