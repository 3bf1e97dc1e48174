//! Server-Sent Events (SSE) streaming support for chat forwarding.
//!
//! [`relay_sse_stream`] owns the lifecycle of one upstream streaming request:
//! it opens the connection, pulls raw chunks, drives line reassembly and
//! frame parsing, and re-emits clean outbound frames. The coroutine is
//! pull-based: the client body polling it is the only thing that advances
//! upstream reads, so a slow consumer applies backpressure, and a
//! disconnected client drops the coroutine together with the in-flight
//! upstream request. Every path through here ends with exactly one done
//! frame.

use crate::api::models::CompletionRequest;
use crate::api::sse::{
    format_content_frame, format_done_frame, format_error_frame, parse_frame, LineBuffer,
    ParsedFrame,
};
use crate::api::upstream::send_chat_request;
use crate::core::config::UpstreamConfig;
use crate::core::logging::get_request_id;
use crate::core::metrics::get_metrics;
use async_stream::stream;
use axum::body::Body;
use axum::http::StatusCode;
use axum::response::Response;
use bytes::Bytes;
use futures::stream::{Stream, StreamExt};

/// Open the upstream request and translate its byte stream into outbound
/// SSE frames.
///
/// Failures before or during streaming are encoded as one error frame
/// followed by the done frame; the client never sees a hung or truncated
/// connection.
pub fn relay_sse_stream(
    client: reqwest::Client,
    upstream: UpstreamConfig,
    request: CompletionRequest,
) -> impl Stream<Item = String> + Send {
    stream! {
        let response = match send_chat_request(&client, &upstream, &request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    request_id = %get_request_id(),
                    error = %e,
                    "Failed to reach OpenRouter"
                );
                let (kind, message) = classify_send_error(&e);
                get_metrics().upstream_errors.with_label_values(&[kind]).inc();
                yield format_error_frame(&message);
                yield format_done_frame();
                return;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let detail = if detail.is_empty() {
                format!("Status {}", status.as_u16())
            } else {
                detail
            };
            tracing::error!(
                request_id = %get_request_id(),
                status = status.as_u16(),
                detail = %detail,
                "OpenRouter returned an error status"
            );
            get_metrics()
                .upstream_errors
                .with_label_values(&["status"])
                .inc();
            yield format_error_frame(&format!(
                "OpenRouter API error ({}): {}",
                status.as_u16(),
                detail
            ));
            yield format_done_frame();
            return;
        }

        let frames = translate_chunks(response.bytes_stream());
        futures::pin_mut!(frames);
        while let Some(frame) = frames.next().await {
            yield frame;
        }
    }
}

/// Translate an already-open upstream byte stream into outbound frames.
///
/// Chunks are reassembled into lines, each line is classified, and content
/// is re-encoded as soon as it arrives. Once a done sentinel is seen, the
/// rest of the upstream output is not read. If the transport ends or fails
/// without one, a single done frame is still emitted at the end.
pub fn translate_chunks<S, E>(upstream: S) -> impl Stream<Item = String>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    stream! {
        futures::pin_mut!(upstream);
        let mut buffer = LineBuffer::new();
        let mut done_emitted = false;

        'upstream: while let Some(chunk) = upstream.next().await {
            match chunk {
                Ok(bytes) => {
                    let text = String::from_utf8_lossy(&bytes);
                    for line in buffer.ingest(&text) {
                        match parse_frame(&line) {
                            ParsedFrame::Content(content) => {
                                yield format_content_frame(&content);
                            }
                            ParsedFrame::Done => {
                                // Anything after the sentinel in this
                                // delivery is dropped
                                done_emitted = true;
                                yield format_done_frame();
                                break 'upstream;
                            }
                            ParsedFrame::Ignored => {}
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(
                        request_id = %get_request_id(),
                        error = %e,
                        "Upstream transport failed mid-stream"
                    );
                    get_metrics()
                        .upstream_errors
                        .with_label_values(&["network"])
                        .inc();
                    yield format_error_frame(&format!(
                        "Network error connecting to OpenRouter: {}",
                        e
                    ));
                    done_emitted = true;
                    yield format_done_frame();
                    break 'upstream;
                }
            }
        }

        if !done_emitted {
            yield format_done_frame();
        }
    }
}

/// Wrap a frame stream as a `text/event-stream` HTTP response.
pub fn sse_response(frames: impl Stream<Item = String> + Send + 'static) -> Response {
    let body = Body::from_stream(frames.map(|frame| Ok::<_, std::io::Error>(frame.into_bytes())));

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/event-stream")
        .header("Cache-Control", "no-cache")
        .header("Connection", "keep-alive")
        .body(body)
        .unwrap()
}

fn classify_send_error(e: &reqwest::Error) -> (&'static str, String) {
    if e.is_builder() || e.is_decode() {
        (
            "unexpected",
            format!("Unexpected error: {}", e),
        )
    } else {
        (
            "network",
            format!("Network error connecting to OpenRouter: {}", e),
        )
    }
}
