//! Transformers layer
//!
//! Request shaping (operation classification, body materialization) and
//! response normalization between the chat-facing surface and the remote
//! image service's wire format.

pub mod request;
pub mod response;

pub use request::{ImageHttpBody, ImageRequestBuilder, classify_operation};
pub use response::normalize_response;
