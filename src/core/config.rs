//! Configuration management for the chat relay server.
//!
//! Configuration is assembled once at startup from environment variables
//! (a `.env` file is loaded by `main` before this runs) and passed by
//! reference into the handlers and the request planner. Nothing in the
//! request path reads ambient global state.

use anyhow::{Context, Result};

const DEFAULT_COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration (host, port)
    pub server: ServerConfig,

    /// Upstream OpenRouter connection settings
    pub upstream: UpstreamConfig,

    /// Model selection table used by the request planner
    pub models: ModelConfig,

    /// Origins allowed by the CORS layer
    pub allowed_origins: Vec<String>,
}

/// Server-specific configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Connection settings for the OpenRouter completions API.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Bearer credential for the OpenRouter API
    pub api_key: String,

    /// Full URL of the chat completions endpoint
    pub completions_url: String,

    /// Public URL of this deployment, sent as the HTTP-Referer header
    pub app_url: String,

    /// Client name sent as the X-Title header
    pub client_title: String,

    /// Ceiling on the whole upstream request, streaming included
    pub request_timeout_secs: u64,
}

/// Model selection table.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model used for short, general queries
    pub default_model: String,

    /// Model used for long queries and data interpretation
    pub advanced_model: String,

    /// Second entry of the upstream model preference list
    pub fallback_model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Queries longer than this many bytes are routed to the advanced model
    pub long_query_threshold: usize,
}

impl AppConfig {
    /// Build the configuration from environment variables.
    ///
    /// `OPENROUTER_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .context("OPENROUTER_API_KEY environment variable is not set")?;

        let port = std::env::var("PORT")
            .ok()
            .map(|p| p.parse::<u16>().context("PORT must be a valid port number"))
            .transpose()?
            .unwrap_or(8157);

        let allowed_origins = env_or("ALLOWED_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(AppConfig {
            server: ServerConfig {
                host: env_or("HOST", "127.0.0.1"),
                port,
            },
            upstream: UpstreamConfig {
                api_key,
                completions_url: env_or("OPENROUTER_API_URL", DEFAULT_COMPLETIONS_URL),
                app_url: env_or("APP_URL", "http://localhost:3000"),
                client_title: env_or("CLIENT_TITLE", "AgriOrbit"),
                request_timeout_secs: 90,
            },
            models: ModelConfig {
                default_model: env_or("DEFAULT_MODEL", "opengvlab/internvl3-2b:free"),
                advanced_model: env_or("ADVANCED_MODEL", "google/gemini-2.0-flash-exp:free"),
                fallback_model: env_or("FALLBACK_MODEL", "meta-llama/llama-3.2-3b-instruct:free"),
                max_tokens: 1800,
                long_query_threshold: 200,
            },
            allowed_origins,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
