//! Executors layer
//!
//! HTTP orchestration that wires the transformers to the remote endpoints.
//! The executor is a capability boundary: the crate ships a reqwest-based
//! implementation, and callers may substitute their own transport.

pub mod image;

pub use image::{HttpRequestExecutor, RequestDescriptor, RequestExecutor};
