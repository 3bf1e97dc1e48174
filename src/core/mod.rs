//! Core functionality for the chat relay server.
//!
//! This module contains fundamental components used throughout the
//! application:
//! - Configuration management
//! - Error handling
//! - Request-scoped logging context
//! - Metrics collection

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

// Re-export commonly used types
pub use config::{AppConfig, ModelConfig, ServerConfig, UpstreamConfig};
pub use error::{AppError, Result};
pub use metrics::{get_metrics, init_metrics, Metrics};
