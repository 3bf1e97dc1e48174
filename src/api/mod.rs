//! API layer for the chat relay server.
//!
//! This module contains the HTTP handlers, request/response models, the SSE
//! translation pipeline, and upstream request execution.

pub mod handlers;
pub mod models;
pub mod sse;
pub mod streaming;
pub mod upstream;

// Re-export commonly used types
pub use handlers::{chat, health, metrics_handler, options_chat, AppState};
pub use models::{ChatReply, ChatRequest};
pub use streaming::{relay_sse_stream, sse_response, translate_chunks};
