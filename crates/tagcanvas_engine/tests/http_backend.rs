use serde_json::json;
use tagcanvas_core::JobId;
use tagcanvas_engine::{BackendSettings, GenerationBackend, HttpBackend, RequestFailure};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(&BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    })
    .expect("backend")
}

#[tokio::test]
async fn search_sends_fragment_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("q", "red fox"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"tag": "red fox", "score": 0.93},
            {"tag": "red panda"}
        ])))
        .mount(&server)
        .await;

    let hits = backend_for(&server).search("red fox").await.expect("search ok");

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].tag, "red fox");
    assert_eq!(hits[0].score, Some(0.93));
    assert_eq!(hits[1].score, None);
}

#[tokio::test]
async fn submit_posts_json_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-image"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"prompt": "castle, night"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prompt_id": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = backend_for(&server)
        .submit("castle, night")
        .await
        .expect("submit ok");

    assert_eq!(response.prompt_id.as_deref(), Some("abc"));
}

#[tokio::test]
async fn submit_with_empty_object_has_no_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let response = backend_for(&server).submit("a prompt").await.unwrap();
    assert_eq!(response.prompt_id, None);
}

#[tokio::test]
async fn non_ok_status_is_an_error_regardless_of_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-image"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"prompt_id": "abc"})))
        .mount(&server)
        .await;

    let err = backend_for(&server).submit("a prompt").await.unwrap_err();
    assert_eq!(err.kind, RequestFailure::HttpStatus(503));
}

#[tokio::test]
async fn progress_reads_snapshot_for_job() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/progress/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ready",
            "outputs": {"9": {"images": [{"filename": "x.png"}]}}
        })))
        .mount(&server)
        .await;

    let snapshot = backend_for(&server)
        .progress(&JobId::new("abc").unwrap())
        .await
        .expect("progress ok");

    assert!(snapshot.is_ready());
    assert_eq!(
        snapshot.ready_images(),
        Some(vec!["/api/static/x.png".to_string()])
    );
}

#[tokio::test]
async fn malformed_progress_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/progress/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .progress(&JobId::new("abc").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.kind, RequestFailure::Decode);
}

#[tokio::test]
async fn asset_fetch_returns_bytes_and_respects_size_cap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/static/x.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"PNGDATA".to_vec(), "image/png"))
        .mount(&server)
        .await;

    let bytes = backend_for(&server)
        .fetch_asset("/api/static/x.png")
        .await
        .expect("asset ok");
    assert_eq!(&bytes[..], b"PNGDATA");

    let capped = HttpBackend::new(&BackendSettings {
        base_url: server.uri(),
        max_body_bytes: 4,
        ..BackendSettings::default()
    })
    .unwrap();
    let err = capped.fetch_asset("/api/static/x.png").await.unwrap_err();
    assert!(matches!(err.kind, RequestFailure::TooLarge { max_bytes: 4, .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    // Bind then drop a listener so the port is very likely closed.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let backend = HttpBackend::new(&BackendSettings {
        base_url: format!("http://{addr}"),
        ..BackendSettings::default()
    })
    .unwrap();

    let err = backend.submit("a prompt").await.unwrap_err();
    assert_eq!(err.kind, RequestFailure::Network);
}
