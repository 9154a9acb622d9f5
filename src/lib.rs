//! # Sumie
//!
//! A pluggable adapter that lets a chat interface drive a generative-image
//! API behind one uniform calling convention. Three remote operations —
//! text-to-image generation, image editing with an optional mask, and image
//! variation — are selected automatically from the shape of the caller's
//! inputs (text plus zero, one or two attached images).
//!
//! ```no_run
//! use std::sync::Arc;
//! use sumie::prelude::*;
//!
//! struct PassthroughRenderer;
//! impl MarkdownRenderer for PassthroughRenderer {
//!     fn render(&self, markdown: &str) -> String {
//!         markdown.to_string()
//!     }
//! }
//!
//! # async fn run() -> Result<(), ServiceError> {
//! let service = ImageService::new(
//!     ServiceConfig::new(),
//!     &PassthroughRenderer,
//!     Arc::new(HttpRequestExecutor::new()),
//! )?;
//! service.verify_key("sk-...").await?;
//!
//! let history = vec![ChatTurn::user("a watercolor fox")];
//! let response = service.send(&history, &[]).await?;
//! for image in response.images {
//!     match image {
//!         ImageResult::Url(url) => println!("hosted: {url}"),
//!         ImageResult::Base64(data_uri) => println!("inline: {} bytes", data_uri.len()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
mod auth;
pub mod config;
pub mod error;
pub mod executors;
pub mod transformers;
pub mod types;
pub mod utils;

pub use adapter::{ImageService, SendPredicate};
pub use config::{FilesConfig, InfoModal, MarkdownRenderer, ServiceConfig};
pub use error::ServiceError;
pub use executors::{HttpRequestExecutor, RequestDescriptor, RequestExecutor};
pub use types::{ChatTurn, FileAttachment, ImageOperation, ImageResponse, ImageResult, MessageRole};

/// Commonly used items in one import.
pub mod prelude {
    pub use crate::adapter::{ImageService, SendPredicate};
    pub use crate::config::{FilesConfig, InfoModal, MarkdownRenderer, ServiceConfig};
    pub use crate::error::ServiceError;
    pub use crate::executors::{HttpRequestExecutor, RequestDescriptor, RequestExecutor};
    pub use crate::transformers::request::{ImageHttpBody, classify_operation};
    pub use crate::transformers::response::normalize_response;
    pub use crate::types::{
        ChatTurn, FileAttachment, ImageOperation, ImageResponse, ImageResult, MessageRole,
    };
}
