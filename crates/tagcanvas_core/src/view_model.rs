use crate::JobPhase;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub fragment: String,
    pub searching: bool,
    pub suggestions: Vec<SuggestionView>,
    pub selected: Vec<String>,
    /// Prompt derived from the selection, as it would be submitted.
    pub prompt: String,
    pub can_generate: bool,
    pub job: JobView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionView {
    pub tag: String,
    pub score: Option<f64>,
    pub selected: bool,
}

/// What the result area shows. Each variant carries only what it displays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobView {
    #[default]
    Idle,
    Loading {
        status: String,
    },
    Gallery {
        images: Vec<String>,
    },
    Error {
        headline: String,
        message: String,
    },
}

impl JobView {
    pub fn project(phase: &JobPhase) -> Self {
        match phase {
            JobPhase::Idle => JobView::Idle,
            JobPhase::Submitting { .. } | JobPhase::Polling { .. } => JobView::Loading {
                status: phase.status_line().unwrap_or_default().to_string(),
            },
            JobPhase::Ready { images, .. } => JobView::Gallery {
                images: images.clone(),
            },
            JobPhase::Failed { failure, .. } => JobView::Error {
                headline: failure.stage.headline().to_string(),
                message: failure.message.clone(),
            },
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobView::Gallery { .. } | JobView::Error { .. })
    }
}
