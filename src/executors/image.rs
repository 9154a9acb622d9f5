//! Request dispatch: endpoint selection and the HTTP executor

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::transformers::request::ImageHttpBody;
use crate::transformers::response::service_error_message;
use crate::types::ImageOperation;
use reqwest::header::HeaderMap;

/// Immutable target of one in-flight call.
///
/// Snapshotted fresh per call from the adapter's settings, so concurrent
/// calls on one adapter can never observe each other's URL or header state.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub url: String,
    pub headers: HeaderMap,
}

/// The external transport boundary. Performs one network call and resolves
/// with the decoded JSON body or an error; cancellation and timeouts are its
/// responsibility, not the adapter's.
#[async_trait::async_trait]
pub trait RequestExecutor: Send + Sync {
    /// POST the body to the descriptor's URL.
    async fn execute(
        &self,
        descriptor: &RequestDescriptor,
        body: ImageHttpBody,
    ) -> Result<serde_json::Value, ServiceError>;

    /// Lightweight authenticated GET, used for key verification.
    async fn probe(&self, descriptor: &RequestDescriptor) -> Result<serde_json::Value, ServiceError>;
}

pub(crate) fn endpoint_path(operation: ImageOperation) -> &'static str {
    match operation {
        ImageOperation::Generation => "/images/generations",
        ImageOperation::Edit => "/images/edits",
        ImageOperation::Variation => "/images/variations",
    }
}

/// Resolve the target URL for an operation. An explicit caller override
/// always wins over the per-operation default.
pub(crate) fn endpoint_url(config: &ServiceConfig, operation: ImageOperation) -> String {
    match &config.url_override {
        Some(url) => url.clone(),
        None => format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            endpoint_path(operation)
        ),
    }
}

/// Generic HTTP-based request executor backed by reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpRequestExecutor {
    http_client: reqwest::Client,
}

impl HttpRequestExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing reqwest client (connection pool, proxy settings).
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    async fn decode(resp: reqwest::Response) -> Result<serde_json::Value, ServiceError> {
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ServiceError::HttpError(e.to_string()))?;

        if !status.is_success() {
            // Surface the service's own message when the error body carries one.
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| service_error_message(&v))
                .unwrap_or(text);
            return Err(ServiceError::ApiError {
                code: Some(status.as_u16()),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| ServiceError::ParseError(e.to_string()))
    }
}

#[async_trait::async_trait]
impl RequestExecutor for HttpRequestExecutor {
    async fn execute(
        &self,
        descriptor: &RequestDescriptor,
        body: ImageHttpBody,
    ) -> Result<serde_json::Value, ServiceError> {
        tracing::debug!(url = %descriptor.url, "dispatching image request");
        let builder = self
            .http_client
            .post(&descriptor.url)
            .headers(descriptor.headers.clone());
        let resp = match body {
            ImageHttpBody::Json(json) => builder.json(&json).send().await,
            ImageHttpBody::Multipart(form) => builder.multipart(form).send().await,
        }
        .map_err(|e| ServiceError::HttpError(e.to_string()))?;
        Self::decode(resp).await
    }

    async fn probe(&self, descriptor: &RequestDescriptor) -> Result<serde_json::Value, ServiceError> {
        tracing::debug!(url = %descriptor.url, "probing service");
        let resp = self
            .http_client
            .get(&descriptor.url)
            .headers(descriptor.headers.clone())
            .send()
            .await
            .map_err(|e| ServiceError::HttpError(e.to_string()))?;
        Self::decode(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_follow_the_operation() {
        let config = ServiceConfig::new().with_base_url("https://api.example.com/v1/");
        assert_eq!(
            endpoint_url(&config, ImageOperation::Generation),
            "https://api.example.com/v1/images/generations"
        );
        assert_eq!(
            endpoint_url(&config, ImageOperation::Edit),
            "https://api.example.com/v1/images/edits"
        );
        assert_eq!(
            endpoint_url(&config, ImageOperation::Variation),
            "https://api.example.com/v1/images/variations"
        );
    }

    #[test]
    fn explicit_override_wins_for_every_operation() {
        let config = ServiceConfig::new().with_url_override("https://proxy.local/images");
        for op in [
            ImageOperation::Generation,
            ImageOperation::Edit,
            ImageOperation::Variation,
        ] {
            assert_eq!(endpoint_url(&config, op), "https://proxy.local/images");
        }
    }
}
