//! Response normalization: raw service JSON into uniform image results

use crate::error::ServiceError;
use crate::types::{ImageResponse, ImageResult};
use serde::Deserialize;
use std::collections::HashMap;

/// Data-URI prefix applied to inline base64 payloads.
pub const BASE64_IMAGE_PREFIX: &str = "data:image/png;base64,";

#[derive(Deserialize)]
struct RawImageEntry {
    url: Option<String>,
    b64_json: Option<String>,
    revised_prompt: Option<String>,
}

#[derive(Deserialize)]
struct RawImageResponse {
    #[serde(default)]
    data: Vec<RawImageEntry>,
    created: Option<u64>,
}

#[derive(Deserialize)]
struct RawErrorBody {
    error: RawErrorDetail,
}

#[derive(Deserialize)]
struct RawErrorDetail {
    message: String,
}

/// Extract a service-reported error message from a decoded body, if present.
pub(crate) fn service_error_message(raw: &serde_json::Value) -> Option<String> {
    serde_json::from_value::<RawErrorBody>(raw.clone())
        .ok()
        .map(|body| body.error.message)
}

/// Normalize the raw decoded response into ordered [`ImageResult`]s.
///
/// A service-reported error fails with [`ServiceError::ApiError`] carrying
/// the service's message verbatim. Each returned entry becomes a hosted URL
/// when one is present, otherwise an inline data URI. No image-content
/// validation happens here.
pub fn normalize_response(raw: &serde_json::Value) -> Result<ImageResponse, ServiceError> {
    if let Some(message) = service_error_message(raw) {
        return Err(ServiceError::api(message));
    }

    let r: RawImageResponse = serde_json::from_value(raw.clone())
        .map_err(|e| ServiceError::ParseError(format!("Invalid image response: {e}")))?;

    let mut revised_prompts = Vec::new();
    let images = r
        .data
        .into_iter()
        .map(|entry| {
            if let Some(prompt) = entry.revised_prompt {
                revised_prompts.push(serde_json::Value::String(prompt));
            }
            match (entry.url, entry.b64_json) {
                (Some(url), _) => Ok(ImageResult::Url(url)),
                (None, Some(b64)) => Ok(ImageResult::Base64(format!("{BASE64_IMAGE_PREFIX}{b64}"))),
                (None, None) => Err(ServiceError::ParseError(
                    "Image entry carries neither url nor b64_json".to_string(),
                )),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut metadata = HashMap::new();
    if let Some(created) = r.created {
        metadata.insert("created".to_string(), serde_json::Value::from(created));
    }
    if !revised_prompts.is_empty() {
        metadata.insert(
            "revised_prompts".to_string(),
            serde_json::Value::Array(revised_prompts),
        );
    }

    Ok(ImageResponse { images, metadata })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_entries_map_to_url_results() {
        let raw = json!({ "data": [{ "url": "http://x" }] });
        let resp = normalize_response(&raw).unwrap();
        assert_eq!(resp.images, vec![ImageResult::Url("http://x".to_string())]);
    }

    #[test]
    fn b64_entries_get_the_data_uri_prefix() {
        let raw = json!({ "data": [{ "b64_json": "AAA" }] });
        let resp = normalize_response(&raw).unwrap();
        assert_eq!(
            resp.images,
            vec![ImageResult::Base64("data:image/png;base64,AAA".to_string())]
        );
    }

    #[test]
    fn service_error_message_is_propagated_verbatim() {
        let raw = json!({ "error": { "message": "bad key" } });
        let err = normalize_response(&raw).unwrap_err();
        assert_eq!(err.to_string(), "bad key");
        match err {
            ServiceError::ApiError { code, message } => {
                assert_eq!(code, None);
                assert_eq!(message, "bad key");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[test]
    fn returned_order_is_preserved() {
        let raw = json!({ "data": [
            { "url": "http://1" },
            { "b64_json": "BBB" },
            { "url": "http://3" }
        ]});
        let resp = normalize_response(&raw).unwrap();
        assert_eq!(resp.images.len(), 3);
        assert_eq!(resp.images[0], ImageResult::Url("http://1".to_string()));
        assert_eq!(
            resp.images[1],
            ImageResult::Base64("data:image/png;base64,BBB".to_string())
        );
        assert_eq!(resp.images[2], ImageResult::Url("http://3".to_string()));
    }

    #[test]
    fn created_and_revised_prompts_land_in_metadata() {
        let raw = json!({
            "created": 1677652288u64,
            "data": [{ "url": "http://x", "revised_prompt": "a cute cat" }]
        });
        let resp = normalize_response(&raw).unwrap();
        assert_eq!(resp.metadata["created"], json!(1677652288u64));
        assert_eq!(resp.metadata["revised_prompts"], json!(["a cute cat"]));
    }

    #[test]
    fn entry_with_neither_url_nor_b64_is_a_parse_error() {
        let raw = json!({ "data": [{ "revised_prompt": "nothing else" }] });
        assert!(matches!(
            normalize_response(&raw),
            Err(ServiceError::ParseError(_))
        ));
    }
}
