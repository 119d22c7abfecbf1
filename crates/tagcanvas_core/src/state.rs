use crate::view_model::{AppViewModel, JobView, SuggestionView};
use crate::{JobController, JobPhase, SearchState, TagSelection};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) search: SearchState,
    pub(crate) selection: TagSelection,
    pub(crate) jobs: JobController,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn selection(&self) -> &TagSelection {
        &self.selection
    }

    pub fn job_phase(&self) -> &JobPhase {
        self.jobs.phase()
    }

    pub fn view(&self) -> AppViewModel {
        let prompt = self.selection.prompt();
        AppViewModel {
            fragment: self.search.fragment().to_string(),
            searching: self.search.is_loading(),
            suggestions: self
                .search
                .candidates()
                .iter()
                .map(|tag| SuggestionView {
                    tag: tag.tag.clone(),
                    score: tag.score,
                    selected: self.selection.contains(tag.name()),
                })
                .collect(),
            selected: self
                .selection
                .current()
                .iter()
                .map(|tag| tag.tag.clone())
                .collect(),
            can_generate: prompt.is_eligible(),
            prompt: prompt.into_string(),
            job: JobView::project(self.jobs.phase()),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
