use std::time::Duration;

use canvas_logging::{canvas_trace, canvas_warn};
use tagcanvas_core::{SearchToken, Tag, MIN_QUERY_CHARS};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, GenerationBackend};

/// Ranked suggestions for `fragment`.
///
/// Fragments shorter than [`MIN_QUERY_CHARS`] return an empty list without a
/// network call. Lookup failures also return an empty list so typing is never
/// blocked by the suggestion service.
pub async fn query_tags(backend: &dyn GenerationBackend, fragment: &str) -> Vec<Tag> {
    if fragment.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }
    match backend.search(fragment).await {
        Ok(hits) => hits
            .into_iter()
            .filter_map(|hit| Tag::scored(&hit.tag, hit.score))
            .collect(),
        Err(err) => {
            canvas_warn!("Tag search for {:?} failed: {}", fragment, err);
            Vec::new()
        }
    }
}

/// Debounces, queries and reports one lookup unless `cancel` fires first.
///
/// A cancelled lookup emits nothing.
pub async fn run_search(
    backend: &dyn GenerationBackend,
    token: SearchToken,
    fragment: &str,
    debounce: Duration,
    cancel: &CancellationToken,
    sink: &dyn EventSink,
) {
    let tags = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            canvas_trace!("Search {:?} superseded", fragment);
            return;
        }
        tags = async {
            tokio::time::sleep(debounce).await;
            query_tags(backend, fragment).await
        } => tags,
    };
    sink.emit(EngineEvent::SuggestionsReady { token, tags });
}
