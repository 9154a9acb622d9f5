//! Request shaping: operation classification and body materialization

use crate::error::ServiceError;
use crate::types::{FileAttachment, ImageOperation};
use crate::utils::mime::attachment_mime;
use reqwest::multipart::{Form, Part};

/// Body for image HTTP requests
pub enum ImageHttpBody {
    Json(serde_json::Value),
    Multipart(Form),
}

/// Decide which remote operation applies from the shape of the inputs.
///
/// A second attached file is always treated as the mask, regardless of text:
/// a mask-guided edit is unambiguous even without an accompanying prompt.
pub fn classify_operation(latest_text: &str, files: &[FileAttachment]) -> ImageOperation {
    match (files.len(), latest_text.trim().is_empty()) {
        (0, _) => ImageOperation::Generation,
        (1, true) => ImageOperation::Variation,
        (1, false) => ImageOperation::Edit,
        (_, _) => ImageOperation::Edit,
    }
}

/// Builds the outgoing payload for one call from the shared body template.
///
/// The template itself is never mutated; every call works on a clone.
pub struct ImageRequestBuilder<'a> {
    template: &'a serde_json::Map<String, serde_json::Value>,
    max_prompt_chars: usize,
}

impl<'a> ImageRequestBuilder<'a> {
    pub fn new(
        template: &'a serde_json::Map<String, serde_json::Value>,
        max_prompt_chars: usize,
    ) -> Self {
        Self {
            template,
            max_prompt_chars,
        }
    }

    /// Materialize the body for the classified operation.
    pub fn build(
        &self,
        operation: ImageOperation,
        latest_text: &str,
        files: &[FileAttachment],
    ) -> Result<ImageHttpBody, ServiceError> {
        let body = self.json_body(latest_text);
        match operation {
            ImageOperation::Generation => Ok(ImageHttpBody::Json(body)),
            ImageOperation::Edit | ImageOperation::Variation => {
                Ok(ImageHttpBody::Multipart(self.multipart_form(body, files)?))
            }
        }
    }

    /// Clone the template and apply the prompt rule: a non-empty trimmed text
    /// becomes the `prompt` field, truncated to the configured character
    /// limit; empty text leaves the template's prompt field as-is.
    fn json_body(&self, latest_text: &str) -> serde_json::Value {
        let mut body = self.template.clone();
        let trimmed = latest_text.trim();
        if !trimmed.is_empty() {
            let prompt: String = trimmed.chars().take(self.max_prompt_chars).collect();
            body.insert("prompt".to_string(), serde_json::Value::String(prompt));
        }
        serde_json::Value::Object(body)
    }

    /// Build the multipart form: `image` part from the primary file, `mask`
    /// part from the second file when present, then every scalar body field
    /// stringified.
    fn multipart_form(
        &self,
        body: serde_json::Value,
        files: &[FileAttachment],
    ) -> Result<Form, ServiceError> {
        let mut form = Form::new();

        let image = files.first().ok_or_else(|| {
            ServiceError::InvalidParameter(
                "Edit and variation operations require an attached image".to_string(),
            )
        })?;
        form = form.part("image", file_part(image)?);

        if let Some(mask) = files.get(1) {
            form = form.part("mask", file_part(mask)?);
        }

        if let serde_json::Value::Object(fields) = body {
            for (key, value) in fields {
                match value {
                    serde_json::Value::String(s) => form = form.text(key, s),
                    serde_json::Value::Number(n) => form = form.text(key, n.to_string()),
                    serde_json::Value::Bool(b) => form = form.text(key, b.to_string()),
                    other => {
                        tracing::warn!(field = %key, "skipping non-scalar body field in multipart form: {other}");
                    }
                }
            }
        }

        Ok(form)
    }
}

fn file_part(file: &FileAttachment) -> Result<Part, ServiceError> {
    let mime = attachment_mime(file);
    Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str(&mime)
        .map_err(|e| ServiceError::InvalidParameter(format!("Invalid attachment MIME type: {e}")))
}
