use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use canvas_logging::{canvas_info, canvas_warn};
use serde::{Deserialize, Serialize};
use tagcanvas_engine::{BackendSettings, EngineConfig, PollSettings};

/// On-disk settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: Option<u32>,
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub search_debounce_ms: u64,
    pub max_body_bytes: u64,
    pub output_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            base_url: engine.backend.base_url,
            poll_interval_ms: millis(engine.poll.interval),
            max_poll_attempts: engine.poll.max_attempts,
            connect_timeout_ms: engine.backend.connect_timeout.map(millis),
            request_timeout_ms: engine.backend.request_timeout.map(millis),
            search_debounce_ms: millis(engine.search_debounce),
            max_body_bytes: engine.backend.max_body_bytes,
            output_dir: engine.output_dir,
        }
    }
}

impl AppConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            backend: BackendSettings {
                base_url: self.base_url.clone(),
                connect_timeout: self.connect_timeout_ms.map(Duration::from_millis),
                request_timeout: self.request_timeout_ms.map(Duration::from_millis),
                max_body_bytes: self.max_body_bytes,
            },
            poll: PollSettings {
                interval: Duration::from_millis(self.poll_interval_ms),
                max_attempts: self.max_poll_attempts,
            },
            search_debounce: Duration::from_millis(self.search_debounce_ms),
            output_dir: self.output_dir.clone(),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Loads settings from `path`, falling back to defaults when the file is
/// missing or cannot be parsed.
pub(crate) fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            canvas_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str::<AppConfig>(&content) {
        Ok(config) => {
            canvas_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            canvas_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}
