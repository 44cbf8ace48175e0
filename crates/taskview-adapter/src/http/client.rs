/*
[INPUT]:  HTTP configuration (service base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for task store calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::http::{Result, StoreError};
use crate::types::{Envelope, TaskId};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the task store service
#[derive(Debug, Clone)]
pub struct TaskStoreClient {
    http_client: Client,
    base_url: Url,
    timeout: Duration,
}

impl TaskStoreClient {
    /// Create a new client with default configuration
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default(), base_url)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(base_url)?,
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an endpoint relative to the service base
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    /// URL of a single task. The id is percent-encoded as one path segment.
    pub(crate) fn task_url(&self, id: &TaskId) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StoreError::InvalidResponse(format!("base url {} cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .push("task")
            .push(id.as_str());
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.endpoint_url(endpoint)?;
        Ok(self.request_url(method, url))
    }

    pub(crate) fn request_url(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "task store request");
        self.http_client.request(method, url)
    }

    /// Send a request and decode the response envelope.
    ///
    /// `responseStatus: false` becomes [`StoreError::Rejected`]; a non-2xx
    /// status with an unreadable body becomes [`StoreError::Api`].
    pub(crate) async fn send_envelope<T>(
        &self,
        builder: RequestBuilder,
        operation: &'static str,
    ) -> Result<T>
    where
        T: DeserializeOwned + Envelope,
    {
        let result = self.send_envelope_inner(builder, operation).await;
        if let Err(err) = &result {
            warn!(operation, error = %err, "task store call failed");
        }
        result
    }

    async fn send_envelope_inner<T>(
        &self,
        builder: RequestBuilder,
        operation: &'static str,
    ) -> Result<T>
    where
        T: DeserializeOwned + Envelope,
    {
        let response = builder.send().await.map_err(|err| self.map_transport(err))?;
        let status = response.status();
        let body = response.text().await.map_err(|err| self.map_transport(err))?;

        let envelope: T = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(err) if status.is_success() => return Err(StoreError::Serialization(err)),
            Err(_) => return Err(StoreError::api_error(status, truncate(&body, 200))),
        };

        if !envelope.response_status() {
            return Err(StoreError::Rejected { operation });
        }
        Ok(envelope)
    }

    fn map_transport(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::Timeout {
                duration: self.timeout.as_secs(),
            }
        } else {
            StoreError::Http(err)
        }
    }
}

/// Ensure the base URL ends with `/` so joins keep any path prefix.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(StoreError::InvalidResponse(format!(
            "unsupported service URL scheme: {other}"
        ))),
    }
}

fn truncate(body: &str, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        body.to_string()
    } else {
        let mut cut: String = body.chars().take(max_chars).collect();
        cut.push('…');
        cut
    }
}
