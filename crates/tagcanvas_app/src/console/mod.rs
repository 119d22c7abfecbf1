//! Terminal front-end: wires stdin, the core state machine and the engine.
mod app;
mod commands;
mod config;
mod effects;
mod logging;
mod render;

pub(crate) use app::run;
pub(crate) use logging::LogDestination;
