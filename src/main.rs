//! AgriBot Relay - Main entry point
//!
//! This binary creates and runs the HTTP server with all configured routes
//! and middleware. Configuration comes from the environment (plus an
//! optional `.env` file).

use agribot_relay::{
    api::{chat, health, metrics_handler, options_chat, AppState},
    core::{init_metrics, AppConfig},
};
use anyhow::Result;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use chrono::Local;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Custom time formatter that uses local timezone (respects TZ environment variable)
struct LocalTime;

impl tracing_subscriber::fmt::time::FormatTime for LocalTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%d %H:%M:%S"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before reading any environment variables)
    dotenvy::dotenv().ok();

    // Check if NO_COLOR environment variable is set (for file logging without ANSI codes)
    let no_color = std::env::var("NO_COLOR").is_ok();

    // Default filter keeps this crate chatty; noise-suppression for the HTTP
    // libraries is always appended so a plain RUST_LOG=debug does not let
    // their chunked-transfer logs through.
    let base_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,agribot_relay=debug".to_string());
    let filter_str = format!("{},hyper=warn,h2=warn,reqwest=warn", base_filter);
    let filter = tracing_subscriber::EnvFilter::new(filter_str);

    if no_color {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_timer(LocalTime)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_timer(LocalTime))
            .init();
    }

    // Initialize metrics
    init_metrics();

    let config = AppConfig::from_env()?;
    let http_client = create_http_client(&config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(config, http_client);

    tracing::info!("Starting AgriBot relay on {}", addr);
    tracing::info!("Chat endpoint: POST /chat");
    tracing::info!("Metrics endpoint: /metrics");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build router with all endpoints
fn build_router(config: AppConfig, http_client: reqwest::Client) -> Router {
    let cors = cors_layer(&config);
    let state = Arc::new(AppState {
        config,
        http_client,
    });

    Router::new()
        .route("/chat", post(chat).options(options_chat))
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer restricted to the configured origins.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<axum::http::HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Create HTTP client with connection pooling
fn create_http_client(config: &AppConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(
            config.upstream.request_timeout_secs,
        ))
        .pool_max_idle_per_host(100)
        .pool_idle_timeout(std::time::Duration::from_secs(90))
        .tcp_keepalive(std::time::Duration::from_secs(60))
        .build()
        .expect("Failed to build HTTP client")
}
