//! HTTP request handlers for the chat relay API.
//!
//! This module contains the chat endpoint plus the health check, CORS
//! preflight, and metrics endpoints.

use crate::api::models::ChatRequest;
use crate::api::streaming::{relay_sse_stream, sse_response};
use crate::api::upstream::fetch_completion;
use crate::core::config::AppConfig;
use crate::core::error::{AppError, Result};
use crate::core::logging::{generate_request_id, REQUEST_ID};
use crate::core::metrics::get_metrics;
use crate::services::planner;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub http_client: reqwest::Client,
}

/// Handle chat requests.
///
/// Plans the upstream call from the message context, then either streams the
/// translated SSE frames or returns the single decoded reply.
#[tracing::instrument(
    skip(state, message),
    fields(
        context = %message.context_type,
        stream = message.use_streaming,
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(message): Json<ChatRequest>,
) -> Result<Response> {
    let request_id = generate_request_id();

    REQUEST_ID.scope(request_id.clone(), async move {
        let request = planner::build_completion_request(&state.config.models, &message);

        tracing::info!(
            request_id = %request_id,
            model = %request.model,
            stream = message.use_streaming,
            "Sending request to OpenRouter"
        );

        let mode = if message.use_streaming { "stream" } else { "json" };
        get_metrics()
            .request_count
            .with_label_values(&["/chat", mode, message.context_type.as_str()])
            .inc();

        if message.use_streaming {
            let frames = relay_sse_stream(
                state.http_client.clone(),
                state.config.upstream.clone(),
                request,
            );
            Ok(sse_response(frames))
        } else {
            let reply =
                fetch_completion(&state.http_client, &state.config.upstream, &request).await?;
            Ok(Json(reply).into_response())
        }
    })
    .await
}

/// Handle OPTIONS requests for CORS preflight.
pub async fn options_chat() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "OK" }))
}

/// Basic health check endpoint.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Prometheus metrics endpoint.
#[tracing::instrument]
pub async fn metrics_handler() -> Result<Response> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", encoder.format_type())
        .body(buffer.into())
        .unwrap())
}
