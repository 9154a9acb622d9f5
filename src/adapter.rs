//! The chat-facing image service adapter
//!
//! One uniform `send` surface over the three remote operations. The chat UI
//! hands over the message history and any attached files; the adapter
//! classifies the call, shapes the payload, dispatches it through the
//! request executor and normalizes the result.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::RwLock;

use crate::auth;
use crate::config::{DEFAULT_INFO_MARKDOWN, FilesPolicy, MarkdownRenderer, ServiceConfig};
use crate::error::ServiceError;
use crate::executors::image::{RequestDescriptor, RequestExecutor, endpoint_url};
use crate::transformers::request::{ImageHttpBody, ImageRequestBuilder, classify_operation};
use crate::transformers::response::normalize_response;
use crate::types::{ChatTurn, FileAttachment, ImageResponse};

/// Caller-supplied replacement for the built-in send-eligibility rule.
pub type SendPredicate = Arc<dyn Fn(&str, &[FileAttachment]) -> bool + Send + Sync>;

/// Adapter between a chat interface and the remote image service.
pub struct ImageService {
    config: ServiceConfig,
    executor: Arc<dyn RequestExecutor>,
    /// The verified API key. Written exactly once per successful
    /// verification; each call snapshots it into its own descriptor.
    api_key: RwLock<Option<SecretString>>,
    /// Info-modal markup, rendered once at construction.
    info_markup: String,
    can_send_override: Option<SendPredicate>,
}

impl ImageService {
    /// Build the adapter. Validates the config and renders the info-modal
    /// markdown exactly once; the result is cached for the adapter's
    /// lifetime.
    pub fn new(
        config: ServiceConfig,
        renderer: &dyn MarkdownRenderer,
        executor: Arc<dyn RequestExecutor>,
    ) -> Result<Self, ServiceError> {
        config.validate()?;
        let markdown = config
            .files
            .info_modal
            .markdown
            .clone()
            .unwrap_or_else(|| DEFAULT_INFO_MARKDOWN.to_string());
        let info_markup = renderer.render(&markdown);
        Ok(Self {
            config,
            executor,
            api_key: RwLock::new(None),
            info_markup,
            can_send_override: None,
        })
    }

    /// Supply an already-known API key without verification.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = RwLock::new(Some(SecretString::from(api_key.into())));
        self
    }

    /// Replace the built-in send-eligibility rule entirely.
    pub fn with_can_send_override(mut self, predicate: SendPredicate) -> Self {
        self.can_send_override = Some(predicate);
        self
    }

    /// Advisory gate for the chat UI: true when a file is attached or the
    /// trimmed text is non-empty. A caller-supplied override is authoritative
    /// and bypasses the built-in rule completely.
    pub fn can_send_message(&self, text: &str, files: &[FileAttachment]) -> bool {
        if let Some(predicate) = &self.can_send_override {
            return predicate(text, files);
        }
        !files.is_empty() || !text.trim().is_empty()
    }

    /// Send the current turn: classify the operation from the latest
    /// message's text and the attached files, build the payload, dispatch it
    /// and normalize the response.
    ///
    /// The upload policy is advisory and enforced by the chat UI; files
    /// beyond it (and beyond the second, which is the mask slot) are ignored
    /// with a warning rather than rejected.
    pub async fn send(
        &self,
        history: &[ChatTurn],
        files: &[FileAttachment],
    ) -> Result<ImageResponse, ServiceError> {
        let latest_text = history.last().map(|turn| turn.text.as_str()).unwrap_or("");

        if files.len() > self.config.files.max_files {
            tracing::warn!(
                attached = files.len(),
                max = self.config.files.max_files,
                "more files attached than the upload policy allows"
            );
        }

        let operation = classify_operation(latest_text, files);
        let body = ImageRequestBuilder::new(&self.config.body_template, self.config.max_prompt_chars)
            .build(operation, latest_text, files)?;
        let multipart = matches!(body, ImageHttpBody::Multipart(_));

        let descriptor = RequestDescriptor {
            url: endpoint_url(&self.config, operation),
            headers: auth::build_headers(
                self.api_key.read().await.as_ref(),
                &self.config.custom_headers,
                multipart,
            )?,
        };
        tracing::debug!(?operation, multipart, "sending image request");

        let raw = self.executor.execute(&descriptor, body).await?;
        normalize_response(&raw)
    }

    /// Validate a candidate key against the service before committing it.
    ///
    /// On success the key replaces any previously verified one and all
    /// subsequent requests carry it; on failure prior settings are left
    /// untouched and the error is returned. No retry happens here.
    pub async fn verify_key(&self, candidate: &str) -> Result<(), ServiceError> {
        let candidate = SecretString::from(candidate);
        let descriptor = RequestDescriptor {
            url: format!(
                "{}{}",
                self.config.base_url.trim_end_matches('/'),
                auth::MODELS_PATH
            ),
            headers: auth::build_headers(Some(&candidate), &self.config.custom_headers, false)?,
        };

        self.executor.probe(&descriptor).await?;
        *self.api_key.write().await = Some(candidate);
        tracing::debug!("API key verified");
        Ok(())
    }

    /// Info-modal markup, rendered once at construction.
    pub fn info_markup(&self) -> &str {
        &self.info_markup
    }

    /// The resolved file-upload policy, for the chat UI.
    pub fn files_policy(&self) -> &FilesPolicy {
        &self.config.files
    }

    /// Accepted upload formats.
    pub fn supported_formats(&self) -> &[String] {
        &self.config.files.accepted_formats
    }

    /// Maximum number of attachments per turn.
    pub fn max_files(&self) -> usize {
        self.config.files.max_files
    }
}

impl std::fmt::Debug for ImageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageService")
            .field("base_url", &self.config.base_url)
            .field("url_override", &self.config.url_override)
            .field("max_prompt_chars", &self.config.max_prompt_chars)
            .field("max_files", &self.config.files.max_files)
            .field("has_api_key", &self.api_key.try_read().map(|k| k.is_some()).unwrap_or(false))
            .field("has_can_send_override", &self.can_send_override.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct PlainRenderer;
    impl MarkdownRenderer for PlainRenderer {
        fn render(&self, markdown: &str) -> String {
            format!("<p>{markdown}</p>")
        }
    }

    struct CountingRenderer(AtomicUsize);
    impl MarkdownRenderer for CountingRenderer {
        fn render(&self, markdown: &str) -> String {
            self.0.fetch_add(1, Ordering::SeqCst);
            markdown.to_string()
        }
    }

    struct NoopExecutor;
    #[async_trait::async_trait]
    impl RequestExecutor for NoopExecutor {
        async fn execute(
            &self,
            _descriptor: &RequestDescriptor,
            _body: ImageHttpBody,
        ) -> Result<serde_json::Value, ServiceError> {
            Ok(serde_json::json!({ "data": [] }))
        }

        async fn probe(
            &self,
            _descriptor: &RequestDescriptor,
        ) -> Result<serde_json::Value, ServiceError> {
            Ok(serde_json::json!({ "data": [] }))
        }
    }

    fn service() -> ImageService {
        ImageService::new(ServiceConfig::new(), &PlainRenderer, Arc::new(NoopExecutor)).unwrap()
    }

    fn file() -> FileAttachment {
        FileAttachment::new("image.png", vec![1, 2, 3])
    }

    #[test]
    fn can_send_truth_table() {
        let service = service();
        assert!(!service.can_send_message("", &[]));
        assert!(!service.can_send_message("   ", &[]));
        assert!(service.can_send_message("hello", &[]));
        assert!(service.can_send_message("", &[file()]));
    }

    #[test]
    fn can_send_override_is_authoritative() {
        let service = service().with_can_send_override(Arc::new(|_, _| false));
        // The built-in rule would say true for both of these.
        assert!(!service.can_send_message("hello", &[]));
        assert!(!service.can_send_message("", &[file()]));
    }

    #[test]
    fn info_markdown_is_rendered_exactly_once() {
        let renderer = CountingRenderer(AtomicUsize::new(0));
        let service =
            ImageService::new(ServiceConfig::new(), &renderer, Arc::new(NoopExecutor)).unwrap();
        let first = service.info_markup().to_string();
        let second = service.info_markup().to_string();
        assert_eq!(first, second);
        assert_eq!(renderer.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn default_info_markup_names_the_three_modes() {
        let service = service();
        let markup = service.info_markup();
        assert!(markup.contains("Generate"));
        assert!(markup.contains("Edit"));
        assert!(markup.contains("variation"));
    }

    #[test]
    fn debug_output_does_not_leak_the_key() {
        let service = service().with_api_key("sk-very-secret");
        let debug = format!("{service:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("has_api_key: true"));
    }
}
