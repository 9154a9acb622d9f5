//! Service configuration and file-upload policy normalization
//!
//! Merges caller-supplied overrides with built-in defaults into one resolved
//! [`ServiceConfig`]. The merge is deterministic: the same inputs always
//! produce the same resolved config.

use crate::error::ServiceError;

/// Default base URL of the remote image service.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default upper bound on prompt length, in characters.
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 1000;

/// Default maximum number of attached files per turn.
pub const DEFAULT_MAX_FILES: usize = 2;

fn default_accepted_formats() -> Vec<String> {
    vec!["png".to_string()]
}

/// Built-in informational text shown by the chat UI, describing the three
/// operation modes.
pub const DEFAULT_INFO_MARKDOWN: &str = "\
**Generate** an image by sending a text prompt with no files attached.

**Edit** an image by attaching it along with a text prompt. Attach a second \
image to use it as a transparency mask marking the editable region.

**Create a variation** of an image by attaching it without any text.";

/// Markdown-to-markup renderer collaborator. Pure and synchronous; the chat
/// UI supplies its own implementation.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

/// Information-modal settings for the chat UI.
#[derive(Debug, Clone)]
pub struct InfoModal {
    /// Show the modal only once per session.
    pub open_once: bool,
    /// Custom markdown body; `None` uses [`DEFAULT_INFO_MARKDOWN`].
    pub markdown: Option<String>,
}

impl Default for InfoModal {
    fn default() -> Self {
        Self {
            open_once: true,
            markdown: None,
        }
    }
}

/// Caller-supplied file-upload overrides. Fields left as `None` keep the
/// built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct FilesConfig {
    pub accepted_formats: Option<Vec<String>>,
    pub max_files: Option<usize>,
    pub info_modal: Option<InfoModal>,
}

/// The resolved file-upload policy after merging with defaults.
#[derive(Debug, Clone)]
pub struct FilesPolicy {
    pub accepted_formats: Vec<String>,
    pub max_files: usize,
    pub info_modal: InfoModal,
}

impl Default for FilesPolicy {
    fn default() -> Self {
        Self {
            accepted_formats: default_accepted_formats(),
            max_files: DEFAULT_MAX_FILES,
            info_modal: InfoModal::default(),
        }
    }
}

impl FilesPolicy {
    /// Merge caller overrides over the defaults, field by field.
    pub fn resolve(overrides: Option<FilesConfig>) -> Self {
        let mut policy = Self::default();
        if let Some(cfg) = overrides {
            if let Some(formats) = cfg.accepted_formats {
                policy.accepted_formats = formats;
            }
            if let Some(max) = cfg.max_files {
                policy.max_files = max;
            }
            if let Some(modal) = cfg.info_modal {
                policy.info_modal = modal;
            }
        }
        policy
    }
}

/// Resolved request settings for the adapter.
///
/// Immutable after construction; the verified API key is held separately by
/// the adapter and merged into each call's header snapshot.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the remote service.
    pub base_url: String,
    /// Explicit target URL; when set it wins over the per-operation default.
    pub url_override: Option<String>,
    /// Extra headers attached to every request.
    pub custom_headers: reqwest::header::HeaderMap,
    /// Resolved file-upload policy.
    pub files: FilesPolicy,
    /// Prompt truncation bound, in characters.
    pub max_prompt_chars: usize,
    /// Operation-independent remote-API fields (e.g. `n`, `size`,
    /// `response_format`). Cloned per call, never mutated in place.
    pub body_template: serde_json::Map<String, serde_json::Value>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            url_override: None,
            custom_headers: reqwest::header::HeaderMap::new(),
            files: FilesPolicy::default(),
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            body_template: serde_json::Map::new(),
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL (trailing slashes are trimmed at dispatch time).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Force every call to a fixed target URL regardless of operation.
    pub fn with_url_override(mut self, url: impl Into<String>) -> Self {
        self.url_override = Some(url.into());
        self
    }

    /// Add a custom header sent with every request.
    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self, ServiceError> {
        let name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| ServiceError::InvalidParameter(format!("Invalid header name: {e}")))?;
        let value = reqwest::header::HeaderValue::from_str(value)
            .map_err(|e| ServiceError::InvalidParameter(format!("Invalid header value: {e}")))?;
        self.custom_headers.insert(name, value);
        Ok(self)
    }

    /// Apply caller file-upload overrides.
    pub fn with_files_config(mut self, overrides: FilesConfig) -> Self {
        self.files = FilesPolicy::resolve(Some(overrides));
        self
    }

    pub fn with_max_prompt_chars(mut self, max: usize) -> Self {
        self.max_prompt_chars = max;
        self
    }

    /// Replace the whole body template.
    pub fn with_body_template(mut self, template: serde_json::Map<String, serde_json::Value>) -> Self {
        self.body_template = template;
        self
    }

    /// Set a single body-template field.
    pub fn with_body_field(mut self, key: &str, value: serde_json::Value) -> Self {
        self.body_template.insert(key.to_string(), value);
        self
    }

    /// Validate the resolved configuration.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.base_url.is_empty() {
            return Err(ServiceError::ConfigurationError(
                "Base URL cannot be empty".to_string(),
            ));
        }
        if self.max_prompt_chars == 0 {
            return Err(ServiceError::ConfigurationError(
                "Prompt character limit must be at least 1".to_string(),
            ));
        }
        if self.files.max_files == 0 {
            return Err(ServiceError::ConfigurationError(
                "Max file count must be at least 1".to_string(),
            ));
        }
        if self.files.accepted_formats.is_empty() {
            return Err(ServiceError::ConfigurationError(
                "Accepted formats cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_policy_defaults() {
        let policy = FilesPolicy::resolve(None);
        assert_eq!(policy.accepted_formats, vec!["png".to_string()]);
        assert_eq!(policy.max_files, 2);
        assert!(policy.info_modal.open_once);
        assert!(policy.info_modal.markdown.is_none());
    }

    #[test]
    fn files_policy_partial_override_keeps_other_defaults() {
        let policy = FilesPolicy::resolve(Some(FilesConfig {
            accepted_formats: Some(vec!["png".to_string(), "webp".to_string()]),
            max_files: None,
            info_modal: None,
        }));
        assert_eq!(policy.accepted_formats.len(), 2);
        assert_eq!(policy.max_files, 2);
    }

    #[test]
    fn resolve_is_deterministic() {
        let overrides = || {
            Some(FilesConfig {
                accepted_formats: None,
                max_files: Some(1),
                info_modal: Some(InfoModal {
                    open_once: false,
                    markdown: Some("hi".to_string()),
                }),
            })
        };
        let a = FilesPolicy::resolve(overrides());
        let b = FilesPolicy::resolve(overrides());
        assert_eq!(a.accepted_formats, b.accepted_formats);
        assert_eq!(a.max_files, b.max_files);
        assert_eq!(a.info_modal.open_once, b.info_modal.open_once);
        assert_eq!(a.info_modal.markdown, b.info_modal.markdown);
    }

    #[test]
    fn validate_rejects_empty_base_url() {
        let config = ServiceConfig::new().with_base_url("");
        assert!(matches!(
            config.validate(),
            Err(ServiceError::ConfigurationError(_))
        ));
    }

    #[test]
    fn with_header_rejects_bad_values() {
        let result = ServiceConfig::new().with_header("x-demo", "line\nbreak");
        assert!(matches!(result, Err(ServiceError::InvalidParameter(_))));
    }
}
