use canvas_logging::canvas_debug;

use crate::{AppState, Effect, JobPhase, Msg, Prompt, Tag};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SearchInputChanged(fragment) => {
            if fragment == state.search.fragment() {
                return (state, Vec::new());
            }
            state.mark_dirty();
            match state.search.begin(fragment.clone()) {
                Some(token) => vec![Effect::SearchTags { token, fragment }],
                None => Vec::new(),
            }
        }
        Msg::SuggestionsLoaded { token, candidates } => {
            if state.search.complete(token, candidates) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SuggestionChosen(index) => {
            if let Some(tag) = state.search.candidate(index).cloned() {
                select_tag(&mut state, tag);
            }
            Vec::new()
        }
        Msg::TagSelected(tag) => {
            select_tag(&mut state, tag);
            Vec::new()
        }
        Msg::TagRemoved(name) => {
            if state.selection.remove(name.trim()) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SelectionCleared => {
            if state.selection.clear() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::GenerateClicked => {
            let prompt = state.selection.prompt();
            submit(&mut state, prompt)
        }
        Msg::PromptSubmitted(text) => submit(&mut state, Prompt::from_text(text)),
        Msg::Job { ticket, update } => {
            if !state.jobs.apply(ticket, update) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            match state.jobs.phase() {
                JobPhase::Ready { ticket, images, .. } => vec![Effect::ImagesReady {
                    ticket: *ticket,
                    images: images.clone(),
                }],
                _ => Vec::new(),
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn select_tag(state: &mut AppState, tag: Tag) {
    // Tags may be constructed by hand, so re-check the non-empty invariant.
    let Some(tag) = Tag::scored(&tag.tag, tag.score) else {
        canvas_debug!("Rejecting blank tag");
        return;
    };
    if state.selection.add(tag) {
        state.mark_dirty();
    }
}

fn submit(state: &mut AppState, prompt: Prompt) -> Vec<Effect> {
    let effects = state.jobs.submit(prompt);
    if !effects.is_empty() {
        state.mark_dirty();
    }
    effects
}
