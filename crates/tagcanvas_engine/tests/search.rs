mod support;

use std::time::Duration;

use support::{network_error, Call, CollectingSink, ScriptedBackend};
use tagcanvas_core::{SearchToken, Tag};
use tagcanvas_engine::{query_tags, run_search, EngineEvent};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn short_fragments_never_hit_the_backend() {
    let backend = ScriptedBackend::new();
    for fragment in ["", "a", "ü"] {
        assert!(query_tags(&backend, fragment).await.is_empty());
    }
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn results_keep_backend_ranking_and_drop_blank_tags() {
    let backend = ScriptedBackend::new().search_ok(&[("cat", 0.9), ("  ", 0.8), ("car", 0.4)]);

    let tags = query_tags(&backend, "ca").await;

    assert_eq!(
        tags,
        vec![
            Tag::scored("cat", Some(0.9)).unwrap(),
            Tag::scored("car", Some(0.4)).unwrap(),
        ]
    );
    assert_eq!(backend.calls(), vec![Call::Search("ca".to_string())]);
}

#[tokio::test]
async fn lookup_failure_degrades_to_empty() {
    let backend = ScriptedBackend::new().search_err(network_error("reset"));
    assert!(query_tags(&backend, "dragon").await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn superseded_search_emits_nothing() {
    let backend = ScriptedBackend::new();
    let sink = CollectingSink::default();
    let cancel = CancellationToken::new();
    cancel.cancel();

    run_search(
        &backend,
        SearchToken(1),
        "castle",
        Duration::from_millis(150),
        &cancel,
        &sink,
    )
    .await;

    assert!(sink.take().is_empty());
    assert!(backend.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn search_reports_under_its_token() {
    let backend = ScriptedBackend::new().search_ok(&[("castle", 1.0)]);
    let sink = CollectingSink::default();

    run_search(
        &backend,
        SearchToken(7),
        "cas",
        Duration::from_millis(150),
        &CancellationToken::new(),
        &sink,
    )
    .await;

    assert_eq!(
        sink.take(),
        vec![EngineEvent::SuggestionsReady {
            token: SearchToken(7),
            tags: vec![Tag::scored("castle", Some(1.0)).unwrap()],
        }]
    );
}
