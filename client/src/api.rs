//! Remote job collection
//!
//! `JobApi` is the seam between the store and the backend; `HttpJobApi`
//! speaks the REST contract:
//!
//! ```text
//! GET    /jobs        -> [Job]
//! POST   /jobs        -> Job        (body: JobDraft)
//! PUT    /jobs/{id}   -> Job        (body: Job)
//! DELETE /jobs/{id}   -> status only
//! ```

use crate::error::ApiError;
use async_trait::async_trait;
use common::{Job, JobDraft, JobId};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

/// Where the API lives when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[async_trait]
pub trait JobApi: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError>;
    async fn create_job(&self, draft: &JobDraft) -> Result<Job, ApiError>;
    async fn update_job(&self, job: &Job) -> Result<Job, ApiError>;
    async fn delete_job(&self, id: &JobId) -> Result<(), ApiError>;
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; `/jobs` is appended to it
    pub base_url: String,

    /// Request timeout. `None` waits as long as the OS lets the socket live.
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// `JobApi` over HTTP with `reqwest`
#[derive(Clone)]
pub struct HttpJobApi {
    client: ReqwestClient,
    base: Url,
}

impl HttpJobApi {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("bad base url '{}': {}", config.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "bad base url '{}': not a hierarchical url",
                config.base_url
            )));
        }

        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    /// `{base}/jobs` or `{base}/jobs/{id}`, with the id percent-encoded
    fn endpoint(&self, id: Option<&JobId>) -> Url {
        let mut url = self.base.clone();
        // Checked in new(): the base can carry path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("jobs");
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        url
    }

    /// Sends the request and turns non-2xx answers into `ApiError::Status`
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            error!("Request failed: {}", e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!("Request successful: {}", status);
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            error!("Request failed with status {}: {}", status.as_u16(), body);
            Err(ApiError::status(status.as_u16(), body))
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to deserialize response: {}", e);
            ApiError::Decode(e)
        })
    }
}

#[async_trait]
impl JobApi for HttpJobApi {
    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let url = self.endpoint(None);
        debug!("GET {}", url);

        let response = self.send(self.client.get(url)).await?;
        let body = response.text().await?;

        // An empty body or `null` both mean "no jobs"
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let jobs: Option<Vec<Job>> = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to deserialize job list: {}", e);
            ApiError::Decode(e)
        })?;
        Ok(jobs.unwrap_or_default())
    }

    async fn create_job(&self, draft: &JobDraft) -> Result<Job, ApiError> {
        let url = self.endpoint(None);
        debug!("POST {}", url);

        let response = self.send(self.client.post(url).json(draft)).await?;
        Self::decode(response).await
    }

    async fn update_job(&self, job: &Job) -> Result<Job, ApiError> {
        let url = self.endpoint(Some(&job.id));
        debug!("PUT {}", url);

        let response = self.send(self.client.put(url).json(job)).await?;
        Self::decode(response).await
    }

    async fn delete_job(&self, id: &JobId) -> Result<(), ApiError> {
        let url = self.endpoint(Some(id));
        debug!("DELETE {}", url);

        // Body is ignored
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}
