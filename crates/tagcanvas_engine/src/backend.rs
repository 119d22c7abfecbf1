use std::time::Duration;

use bytes::{Bytes, BytesMut};
use canvas_logging::{canvas_debug, canvas_trace};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tagcanvas_core::JobId;
use url::Url;

use crate::wire::{ProgressSnapshot, SearchHit, SubmitRequest, SubmitResponse, STATIC_PREFIX};
use crate::{RequestError, RequestFailure};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    /// `None` leaves connection setup unbounded.
    pub connect_timeout: Option<Duration>,
    /// `None` leaves every request unbounded; a hung call stalls its activity.
    pub request_timeout: Option<Duration>,
    pub max_body_bytes: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            connect_timeout: None,
            request_timeout: None,
            max_body_bytes: 32 * 1024 * 1024,
        }
    }
}

/// The remote tag search and render farm, one method per endpoint.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    /// `GET /api/search?q=<fragment>`
    async fn search(&self, fragment: &str) -> Result<Vec<SearchHit>, RequestError>;

    /// `POST /api/generate-image` with `{"prompt": ...}`
    async fn submit(&self, prompt: &str) -> Result<SubmitResponse, RequestError>;

    /// `GET /api/progress/<job_id>`
    async fn progress(&self, job_id: &JobId) -> Result<ProgressSnapshot, RequestError>;

    /// `GET <path>` where `path` is an `/api/static/...` asset path.
    async fn fetch_asset(&self, path: &str) -> Result<Bytes, RequestError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
    max_body_bytes: u64,
}

impl HttpBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self, RequestError> {
        let base = parse_base(&settings.base_url)?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| RequestError::new(RequestFailure::Network, err.to_string()))?;
        Ok(Self {
            client,
            base,
            max_body_bytes: settings.max_body_bytes,
        })
    }

    pub fn search_url(&self, fragment: &str) -> Result<Url, RequestError> {
        let mut url = self.endpoint("api/search")?;
        url.query_pairs_mut().append_pair("q", fragment);
        Ok(url)
    }

    pub fn submit_url(&self) -> Result<Url, RequestError> {
        self.endpoint("api/generate-image")
    }

    pub fn progress_url(&self, job_id: &JobId) -> Result<Url, RequestError> {
        self.segment_url("api/progress/", job_id.as_str())
    }

    /// URL for an `/api/static/<filename>` path. The filename is encoded as a
    /// single segment, so `?`, `#` and `/` inside it stay part of the name.
    pub fn asset_url(&self, path: &str) -> Result<Url, RequestError> {
        let filename = path
            .strip_prefix(STATIC_PREFIX)
            .unwrap_or_else(|| path.trim_start_matches('/'));
        self.segment_url("api/static/", filename)
    }

    fn segment_url(&self, dir: &str, segment: &str) -> Result<Url, RequestError> {
        let mut url = self.endpoint(dir)?;
        url.path_segments_mut()
            .map_err(|()| RequestError::new(RequestFailure::InvalidUrl, "base url cannot hold a path"))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    fn endpoint(&self, relative: &str) -> Result<Url, RequestError> {
        self.base
            .join(relative)
            .map_err(|err| RequestError::new(RequestFailure::InvalidUrl, err.to_string()))
    }

    async fn get_body(&self, url: Url) -> Result<Bytes, RequestError> {
        canvas_trace!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_body(response).await
    }

    /// Rejects non-success statuses, then streams the body up to the size cap.
    async fn read_body(&self, response: reqwest::Response) -> Result<Bytes, RequestError> {
        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::new(
                RequestFailure::HttpStatus(status.as_u16()),
                status.canonical_reason().unwrap_or("unexpected status"),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_body_bytes {
                return Err(too_large(self.max_body_bytes, content_len));
            }
        }

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.max_body_bytes {
                return Err(too_large(self.max_body_bytes, next_len));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }
}

#[async_trait::async_trait]
impl GenerationBackend for HttpBackend {
    async fn search(&self, fragment: &str) -> Result<Vec<SearchHit>, RequestError> {
        let body = self.get_body(self.search_url(fragment)?).await?;
        decode(&body)
    }

    async fn submit(&self, prompt: &str) -> Result<SubmitResponse, RequestError> {
        let url = self.submit_url()?;
        let payload = serde_json::to_vec(&SubmitRequest { prompt })
            .map_err(|err| RequestError::new(RequestFailure::Decode, err.to_string()))?;
        canvas_debug!("POST {} prompt_len={}", url, prompt.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = self.read_body(response).await?;
        decode(&body)
    }

    async fn progress(&self, job_id: &JobId) -> Result<ProgressSnapshot, RequestError> {
        let body = self.get_body(self.progress_url(job_id)?).await?;
        decode(&body)
    }

    async fn fetch_asset(&self, path: &str) -> Result<Bytes, RequestError> {
        self.get_body(self.asset_url(path)?).await
    }
}

/// Parses the base URL and makes sure its path ends in `/` so endpoint paths
/// join under it rather than replacing its last segment.
fn parse_base(raw: &str) -> Result<Url, RequestError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|err| RequestError::new(RequestFailure::InvalidUrl, err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(RequestError::new(
            RequestFailure::InvalidUrl,
            format!("{raw} cannot be used as a base url"),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, RequestError> {
    serde_json::from_slice(body)
        .map_err(|err| RequestError::new(RequestFailure::Decode, err.to_string()))
}

fn too_large(max_bytes: u64, actual: u64) -> RequestError {
    RequestError::new(
        RequestFailure::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::new(RequestFailure::Timeout, err.to_string());
    }
    if err.is_decode() {
        return RequestError::new(RequestFailure::Decode, err.to_string());
    }
    RequestError::new(RequestFailure::Network, err.to_string())
}
