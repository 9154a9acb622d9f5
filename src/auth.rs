//! Authentication-key handling
//!
//! Builds the per-call header snapshot and defines the lightweight probe
//! endpoint used to verify a candidate key before committing it.

use crate::error::ServiceError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

/// Endpoint probed by key verification; any authenticated GET works, the
/// models listing is the cheapest.
pub(crate) const MODELS_PATH: &str = "/models";

/// Build the `Authorization: Bearer <key>` header value.
pub(crate) fn bearer_value(api_key: &SecretString) -> Result<HeaderValue, ServiceError> {
    let value = format!("Bearer {}", api_key.expose_secret());
    let mut value = HeaderValue::from_str(&value)
        .map_err(|e| ServiceError::InvalidParameter(format!("Invalid API key: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Assemble the immutable header snapshot for one call.
///
/// Custom headers come first, then the auth header. JSON calls carry
/// `Content-Type: application/json`; multipart calls must not carry any
/// caller-set content type (the transport computes the boundary-bearing one),
/// so the snapshot simply omits it.
pub(crate) fn build_headers(
    api_key: Option<&SecretString>,
    custom_headers: &HeaderMap,
    multipart: bool,
) -> Result<HeaderMap, ServiceError> {
    let mut headers = custom_headers.clone();

    if multipart {
        headers.remove(CONTENT_TYPE);
    } else {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    match api_key {
        Some(key) => {
            headers.insert(AUTHORIZATION, bearer_value(key)?);
        }
        None => {
            if !headers.contains_key(AUTHORIZATION) {
                return Err(ServiceError::ConfigurationError(
                    "API key not set; verify a key or supply an Authorization header".to_string(),
                ));
            }
        }
    }

    Ok(headers)
}
