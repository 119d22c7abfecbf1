use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use canvas_logging::{canvas_debug, canvas_info};
use tagcanvas_core::{update, AppState, JobPhase, JobView, Msg, Tag, MIN_PROMPT_CHARS};

use super::commands::{parse_command, Command, HELP};
use super::config::load_config;
use super::effects::EffectRunner;
use super::logging;
use super::render::render;
use crate::{Cli, Mode};

const TICK_INTERVAL: Duration = Duration::from_millis(75);

/// Everything the main loop reacts to.
pub(crate) enum Input {
    Msg(Msg),
    /// One image finished saving, successfully or not.
    AssetSettled,
    Quit,
}

pub(crate) fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::initialize(cli.log, canvas_logging::level_for_verbosity(cli.verbose));

    let mut config = load_config(&cli.config);
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = Some(output_dir);
    }
    canvas_info!("Using backend {}", config.base_url);

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    let effects = EffectRunner::new(config.engine_config(), input_tx.clone())
        .context("failed to start the generation engine")?;
    spawn_ticker(input_tx.clone());

    let mut session = Session {
        state: AppState::new(),
        effects,
        asset_base: config.base_url.clone(),
    };

    match cli.mode.unwrap_or(Mode::Interactive) {
        Mode::Interactive => {
            spawn_stdin_reader(input_tx);
            Ok(run_interactive(&mut session, &input_rx))
        }
        Mode::Generate { tags, prompt } => {
            let saving = config.output_dir.is_some();
            Ok(run_generate(&mut session, &input_rx, tags, prompt, saving))
        }
    }
}

struct Session {
    state: AppState,
    effects: EffectRunner,
    asset_base: String,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.effects.enqueue(effects);
    }

    fn render_if_dirty(&mut self) {
        if !self.state.consume_dirty() {
            return;
        }
        let view = self.state.view();
        println!();
        for line in render(&view, &self.asset_base) {
            println!("{line}");
        }
    }
}

fn spawn_ticker(input_tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        while input_tx.send(Input::Msg(Msg::Tick)).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<Input>) {
    println!("{HELP}");
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match parse_command(&line) {
                Command::Dispatch(msg) => {
                    if input_tx.send(Input::Msg(msg)).is_err() {
                        return;
                    }
                }
                Command::Help => println!("{HELP}"),
                Command::Nothing => {}
                Command::Invalid(reason) => eprintln!("{reason}"),
                Command::Quit => break,
            }
        }
        let _ = input_tx.send(Input::Quit);
    });
}

fn run_interactive(session: &mut Session, input_rx: &mpsc::Receiver<Input>) -> ExitCode {
    for input in input_rx.iter() {
        match input {
            Input::Msg(Msg::Tick) => session.render_if_dirty(),
            Input::Msg(msg) => session.dispatch(msg),
            Input::AssetSettled => {}
            Input::Quit => break,
        }
    }
    canvas_debug!("Leaving interactive session");
    ExitCode::SUCCESS
}

/// Submits one prompt and waits until the job is terminal and, when saving,
/// every image has settled.
fn run_generate(
    session: &mut Session,
    input_rx: &mpsc::Receiver<Input>,
    tags: Vec<String>,
    prompt: Option<String>,
    saving: bool,
) -> ExitCode {
    match prompt {
        Some(text) => session.dispatch(Msg::PromptSubmitted(text)),
        None => {
            for tag in tags.iter().filter_map(Tag::new) {
                session.dispatch(Msg::TagSelected(tag));
            }
            session.dispatch(Msg::GenerateClicked);
        }
    }

    if matches!(session.state.job_phase(), JobPhase::Idle) {
        eprintln!("Prompt must be at least {MIN_PROMPT_CHARS} characters");
        return ExitCode::FAILURE;
    }

    let mut outcome: Option<ExitCode> = None;
    let mut unsettled = 0usize;
    for input in input_rx.iter() {
        match input {
            Input::Msg(Msg::Tick) => session.render_if_dirty(),
            Input::Msg(msg) => {
                session.dispatch(msg);
                let view = JobView::project(session.state.job_phase());
                if outcome.is_none() && view.is_terminal() {
                    unsettled = match &view {
                        JobView::Gallery { images } if saving => images.len(),
                        _ => 0,
                    };
                    outcome = Some(match view {
                        JobView::Error { .. } => ExitCode::FAILURE,
                        _ => ExitCode::SUCCESS,
                    });
                }
            }
            Input::AssetSettled => unsettled = unsettled.saturating_sub(1),
            Input::Quit => break,
        }

        if let Some(code) = outcome {
            if unsettled == 0 {
                session.render_if_dirty();
                return code;
            }
        }
    }
    ExitCode::FAILURE
}
