//! Upstream request execution against the OpenRouter completions API.
//!
//! Both response paths go through [`send_chat_request`]; the non-streaming
//! path additionally decodes the single reply here, surfacing embedded error
//! objects and missing reply fields as protocol errors.

use crate::api::models::{ChatReply, CompletionRequest, CompletionResponse};
use crate::core::config::UpstreamConfig;
use crate::core::error::{AppError, Result};
use crate::core::logging::get_request_id;
use crate::core::metrics::get_metrics;

/// Issue the outbound completions POST with the planner-built payload.
///
/// The bearer credential, referer, and client title come from the immutable
/// upstream configuration; the JSON content type is set by the body encoder.
pub async fn send_chat_request(
    client: &reqwest::Client,
    upstream: &UpstreamConfig,
    request: &CompletionRequest,
) -> reqwest::Result<reqwest::Response> {
    client
        .post(&upstream.completions_url)
        .bearer_auth(&upstream.api_key)
        .header("HTTP-Referer", &upstream.app_url)
        .header("X-Title", &upstream.client_title)
        .json(request)
        .send()
        .await
}

/// Execute a non-streaming completion and decode the single reply.
pub async fn fetch_completion(
    client: &reqwest::Client,
    upstream: &UpstreamConfig,
    request: &CompletionRequest,
) -> Result<ChatReply> {
    let response = send_chat_request(client, upstream, request)
        .await
        .map_err(|e| {
            tracing::error!(
                request_id = %get_request_id(),
                error = %e,
                "Failed to reach OpenRouter"
            );
            get_metrics()
                .upstream_errors
                .with_label_values(&["network"])
                .inc();
            AppError::from(e)
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            request_id = %get_request_id(),
            status = status.as_u16(),
            body = %body,
            "OpenRouter returned an error status"
        );
        get_metrics()
            .upstream_errors
            .with_label_values(&["status"])
            .inc();
        return Err(AppError::UpstreamStatus {
            status: status.as_u16(),
            body,
        });
    }

    let result = match response.json::<CompletionResponse>().await {
        Ok(body) => extract_reply(&request.model, body),
        Err(e) => Err(AppError::InvalidResponse(format!(
            "Invalid response format from OpenRouter: {}",
            e
        ))),
    };

    if result.is_err() {
        get_metrics()
            .upstream_errors
            .with_label_values(&["protocol"])
            .inc();
    }
    result
}

/// Pull the reply text out of a decoded completion body.
fn extract_reply(selected_model: &str, body: CompletionResponse) -> Result<ChatReply> {
    let CompletionResponse {
        model,
        choices,
        error,
    } = body;

    if let Some(error) = error {
        return Err(AppError::InvalidResponse(
            error.message.unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }

    let reply = choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content);

    let Some(response) = reply else {
        return Err(AppError::InvalidResponse(
            "Invalid response format from OpenRouter".to_string(),
        ));
    };

    if let Some(used_model) = model {
        if used_model != selected_model {
            tracing::info!(
                request_id = %get_request_id(),
                requested = %selected_model,
                used = %used_model,
                "Fallback model used"
            );
        }
    }

    Ok(ChatReply { response })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn body(json: &str) -> CompletionResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extract_reply_happy_path() {
        let reply = extract_reply(
            "some/model",
            body(r#"{"model": "some/model", "choices": [{"message": {"role": "assistant", "content": "Hi there"}}]}"#),
        )
        .unwrap();
        assert_eq!(reply.response, "Hi there");
    }

    #[test]
    fn test_extract_reply_empty_choices() {
        let err = extract_reply("some/model", body(r#"{"choices": []}"#)).unwrap_err();
        assert_matches!(
            err,
            AppError::InvalidResponse(msg) if msg == "Invalid response format from OpenRouter"
        );
    }

    #[test]
    fn test_extract_reply_missing_choices() {
        let err = extract_reply("some/model", body(r#"{}"#)).unwrap_err();
        assert_matches!(
            err,
            AppError::InvalidResponse(msg) if msg == "Invalid response format from OpenRouter"
        );
    }

    #[test]
    fn test_extract_reply_missing_content() {
        let err = extract_reply(
            "some/model",
            body(r#"{"choices": [{"message": {"role": "assistant"}}]}"#),
        )
        .unwrap_err();
        assert_matches!(err, AppError::InvalidResponse(_));
    }

    #[test]
    fn test_extract_reply_embedded_error() {
        let err = extract_reply(
            "some/model",
            body(r#"{"error": {"message": "boom"}}"#),
        )
        .unwrap_err();
        assert_matches!(err, AppError::InvalidResponse(msg) if msg == "boom");
    }

    #[test]
    fn test_extract_reply_embedded_error_without_message() {
        let err = extract_reply("some/model", body(r#"{"error": {}}"#)).unwrap_err();
        assert_matches!(err, AppError::InvalidResponse(msg) if msg == "Unknown error");
    }

    #[test]
    fn test_extract_reply_error_wins_over_choices() {
        let err = extract_reply(
            "some/model",
            body(r#"{"error": {"message": "boom"}, "choices": [{"message": {"content": "hi"}}]}"#),
        )
        .unwrap_err();
        assert_matches!(err, AppError::InvalidResponse(msg) if msg == "boom");
    }

    #[test]
    fn test_extract_reply_fallback_model_still_succeeds() {
        let reply = extract_reply(
            "primary/model",
            body(r#"{"model": "fallback/model", "choices": [{"message": {"content": "ok"}}]}"#),
        )
        .unwrap();
        assert_eq!(reply.response, "ok");
    }
}
