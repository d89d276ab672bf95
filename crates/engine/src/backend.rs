//! Backend seam for the analysis pipeline.
//!
//! [`EnhancerBackend`] is the trait the runner depends on; [`HttpBackend`] is
//! the production implementation over the remote service. Non-2xx statuses
//! map to [`BackendError::Status`] with a short, redacted body snippet; no
//! structured error body is parsed.

use async_trait::async_trait;
use cvlift_api::EnhancerClient;
use cvlift_types::{
    BackendError, ExtractResponse, OptimizeRequest, OptimizeResponse, ServiceHealth, SkillGapRequest,
    SkillGapResponse, UploadFile,
};
use reqwest::{Method, RequestBuilder, multipart};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Maximum characters of a response body carried into an error message.
const ERROR_SNIPPET_CHARS: usize = 200;

/// The three analysis endpoints plus the service health probe.
///
/// Implementations must be cheap to share; the TUI clones one into each
/// spawned run.
#[async_trait]
pub trait EnhancerBackend: Send + Sync {
    /// POST the CV file to `/extract` and return the extracted text.
    async fn extract(&self, upload: &UploadFile) -> Result<ExtractResponse, BackendError>;
    /// POST the resolved CV text to `/optimize`.
    async fn optimize(&self, cv_text: &str) -> Result<OptimizeResponse, BackendError>;
    /// POST the resolved CV text and optional JD text to `/skill-gaps`.
    async fn skill_gaps(&self, cv_text: &str, jd_text: &str) -> Result<SkillGapResponse, BackendError>;
    /// GET `/health`.
    async fn health(&self) -> Result<ServiceHealth, BackendError>;
}

/// Production backend over HTTP, using the configured [`EnhancerClient`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: EnhancerClient,
}

impl HttpBackend {
    pub fn new(client: EnhancerClient) -> Self {
        Self { client }
    }

    /// Send a prepared request and decode a JSON success payload.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, BackendError> {
        let response = builder
            .send()
            .await
            .map_err(|error| BackendError::Network(cvlift_util::redact_sensitive(&error.to_string())))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), bytes = text.len(), "backend response");

        if !status.is_success() {
            let snippet = cvlift_util::preview_line(&text, ERROR_SNIPPET_CHARS);
            return Err(BackendError::Status {
                status: status.as_u16(),
                detail: cvlift_util::redact_sensitive(&snippet),
            });
        }

        serde_json::from_str(&text).map_err(|error| BackendError::Payload(error.to_string()))
    }
}

#[async_trait]
impl EnhancerBackend for HttpBackend {
    async fn extract(&self, upload: &UploadFile) -> Result<ExtractResponse, BackendError> {
        let part = multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(upload.kind.mime())
            .map_err(|error| BackendError::Payload(format!("invalid upload mime type: {error}")))?;
        let form = multipart::Form::new().part("cv", part);
        let request = self.client.request(Method::POST, "/extract").multipart(form);
        self.send(request).await
    }

    async fn optimize(&self, cv_text: &str) -> Result<OptimizeResponse, BackendError> {
        let body = OptimizeRequest {
            candidate_cv_text: cv_text.to_string(),
        };
        let request = self.client.request(Method::POST, "/optimize").json(&body);
        self.send(request).await
    }

    async fn skill_gaps(&self, cv_text: &str, jd_text: &str) -> Result<SkillGapResponse, BackendError> {
        let body = SkillGapRequest {
            cv_text: cv_text.to_string(),
            jd_text: jd_text.to_string(),
        };
        let request = self.client.request(Method::POST, "/skill-gaps").json(&body);
        self.send(request).await
    }

    async fn health(&self) -> Result<ServiceHealth, BackendError> {
        let request = self.client.request(Method::GET, "/health");
        self.send(request).await
    }
}
