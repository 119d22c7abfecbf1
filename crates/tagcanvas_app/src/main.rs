mod console;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use console::LogDestination;

/// Search tags, then render them into images on a remote generation backend.
#[derive(Debug, Parser)]
#[command(name = "tagcanvas", version)]
pub(crate) struct Cli {
    /// RON configuration file; missing files fall back to defaults.
    #[arg(long, default_value = "tagcanvas.ron")]
    pub config: PathBuf,
    /// Overrides `base_url` from the configuration file.
    #[arg(long)]
    pub base_url: Option<String>,
    /// Save ready images into this directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,
    /// Repeat for more detail (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum Mode {
    /// Read commands from stdin (the default).
    Interactive,
    /// Submit one prompt, wait for the result and exit.
    Generate {
        /// Comma-separated tags joined into the prompt.
        #[arg(long, value_delimiter = ',', required_unless_present = "prompt")]
        tags: Vec<String>,
        /// Free-text prompt instead of tags.
        #[arg(long, conflicts_with = "tags")]
        prompt: Option<String>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    console::run(Cli::parse())
}
