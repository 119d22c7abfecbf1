#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use bytes::Bytes;
use serde_json::{json, Value};
use tagcanvas_core::JobId;
use tagcanvas_engine::{
    EngineEvent, EventSink, GenerationBackend, ProgressSnapshot, RequestError, RequestFailure,
    SearchHit, SubmitResponse,
};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Search(String),
    Submit(String),
    Progress(String),
    Asset(String),
}

/// In-memory backend answering from per-endpoint scripts.
///
/// Progress requests for a job with an exhausted script answer `pending`.
#[derive(Default)]
pub struct ScriptedBackend {
    search: Mutex<VecDeque<Result<Vec<SearchHit>, RequestError>>>,
    submit: Mutex<VecDeque<Result<SubmitResponse, RequestError>>>,
    progress: Mutex<HashMap<String, VecDeque<Result<ProgressSnapshot, RequestError>>>>,
    calls: Mutex<Vec<(Call, Instant)>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_ok(self, tags: &[(&str, f64)]) -> Self {
        let hits = tags
            .iter()
            .map(|(tag, score)| SearchHit {
                tag: tag.to_string(),
                score: Some(*score),
            })
            .collect();
        self.search.lock().unwrap().push_back(Ok(hits));
        self
    }

    pub fn search_err(self, err: RequestError) -> Self {
        self.search.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn accepts(self, prompt_id: &str) -> Self {
        self.submit.lock().unwrap().push_back(Ok(SubmitResponse {
            prompt_id: Some(prompt_id.to_string()),
        }));
        self
    }

    pub fn submit_response(self, response: SubmitResponse) -> Self {
        self.submit.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn submit_err(self, err: RequestError) -> Self {
        self.submit.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn snapshot(self, job_id: &str, body: Value) -> Self {
        let snapshot: ProgressSnapshot = serde_json::from_value(body).unwrap();
        self.push_progress(job_id, Ok(snapshot))
    }

    pub fn progress_err(self, job_id: &str, err: RequestError) -> Self {
        self.push_progress(job_id, Err(err))
    }

    fn push_progress(self, job_id: &str, result: Result<ProgressSnapshot, RequestError>) -> Self {
        self.progress
            .lock()
            .unwrap()
            .entry(job_id.to_string())
            .or_default()
            .push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(call, _)| call.clone())
            .collect()
    }

    pub fn progress_times(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(call, _)| matches!(call, Call::Progress(_)))
            .map(|(_, at)| *at)
            .collect()
    }

    pub fn progress_count(&self) -> usize {
        self.progress_times().len()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((call, Instant::now()));
    }
}

#[async_trait::async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn search(&self, fragment: &str) -> Result<Vec<SearchHit>, RequestError> {
        self.record(Call::Search(fragment.to_string()));
        self.search
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn submit(&self, prompt: &str) -> Result<SubmitResponse, RequestError> {
        self.record(Call::Submit(prompt.to_string()));
        self.submit
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(status_error(500)))
    }

    async fn progress(&self, job_id: &JobId) -> Result<ProgressSnapshot, RequestError> {
        self.record(Call::Progress(job_id.to_string()));
        let scripted = self
            .progress
            .lock()
            .unwrap()
            .get_mut(job_id.as_str())
            .and_then(VecDeque::pop_front);
        scripted.unwrap_or_else(|| Ok(serde_json::from_value(json!({"status": "pending"})).unwrap()))
    }

    async fn fetch_asset(&self, path: &str) -> Result<Bytes, RequestError> {
        self.record(Call::Asset(path.to_string()));
        Ok(Bytes::from(format!("bytes of {path}")))
    }
}

pub fn status_error(code: u16) -> RequestError {
    RequestError {
        kind: RequestFailure::HttpStatus(code),
        message: "scripted failure".to_string(),
    }
}

pub fn network_error(message: &str) -> RequestError {
    RequestError {
        kind: RequestFailure::Network,
        message: message.to_string(),
    }
}

#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl CollectingSink {
    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn ready_body(filenames: &[&str]) -> Value {
    let images: Vec<Value> = filenames
        .iter()
        .map(|name| json!({ "filename": name }))
        .collect();
    json!({"status": "ready", "outputs": {"9": {"images": images}}})
}
