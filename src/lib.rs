//! AgriBot Relay - a streaming chat backend for the OpenRouter API
//!
//! This library implements a stateless relay that accepts chat messages,
//! selects an upstream model, forwards the request to OpenRouter, and
//! returns the reply either as a single JSON payload or as a translated
//! Server-Sent-Events stream:
//!
//! - **Streaming translation**: raw upstream SSE bytes are reassembled into
//!   lines, parsed into deltas, and re-emitted as clean client frames, with
//!   a guaranteed terminal `[DONE]` frame on every path
//! - **Model planning**: context- and length-based model selection with an
//!   upstream fallback list
//! - **Metrics & Monitoring**: Prometheus metrics for observability
//!
//! # Architecture
//!
//! The codebase is organized into three main layers:
//!
//! - [`core`]: Core functionality (config, errors, logging context, metrics)
//! - [`api`]: HTTP handlers, request/response models, and SSE translation
//! - [`services`]: Request planning policy
//!
//! # Configuration
//!
//! The server requires the following environment variable:
//! - `OPENROUTER_API_KEY`: Bearer credential for the OpenRouter API
//!
//! Optional environment variables:
//! - `HOST`: Server bind address (default: 127.0.0.1)
//! - `PORT`: Server port (default: 8157)
//! - `APP_URL`: Referer sent upstream (default: http://localhost:3000)
//! - `ALLOWED_ORIGINS`: Comma-separated CORS origins
//! - `OPENROUTER_API_URL`, `DEFAULT_MODEL`, `ADVANCED_MODEL`,
//!   `FALLBACK_MODEL`: upstream overrides

pub mod api;
pub mod core;
pub mod services;

// Re-export commonly used types for convenience
pub use api::{chat, health, metrics_handler, options_chat, AppState, ChatReply, ChatRequest};
pub use core::{AppConfig, AppError, Result};
