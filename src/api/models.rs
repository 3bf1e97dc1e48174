//! API request and response models.
//!
//! This module defines the client-facing chat types and the OpenAI-compatible
//! payloads exchanged with OpenRouter, for both the streaming and the
//! non-streaming path.

use serde::{Deserialize, Serialize};

/// A chat message submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// The user's query text
    pub text: String,

    /// Conversation context: "general", "farm_selected", or "data_loaded"
    #[serde(default = "default_context_type")]
    pub context_type: String,

    /// Whether to stream the reply as SSE frames
    #[serde(default = "default_use_streaming")]
    pub use_streaming: bool,
}

fn default_context_type() -> String {
    "general".to_string()
}

fn default_use_streaming() -> bool {
    true
}

/// Reply returned on the non-streaming path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// A single role/content message forwarded upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role: "system", "user", or "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

/// Outbound chat completion payload in OpenAI-compatible format.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// Primary model identifier
    pub model: String,

    /// Model preference list: primary model followed by the fallback
    pub models: Vec<String>,

    /// Conversation messages (system prompt first)
    pub messages: Vec<Message>,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Whether to request a streamed response
    pub stream: bool,
}

/// One streaming delta chunk decoded from an upstream SSE frame.
///
/// Fields are deliberately tolerant: anything missing simply means the chunk
/// carries no content.
#[derive(Debug, Clone, Deserialize)]
pub struct DeltaChunk {
    #[serde(default)]
    pub choices: Vec<DeltaChoice>,
}

/// A single choice in a streaming chunk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeltaChoice {
    #[serde(default)]
    pub delta: Delta,
}

/// Delta content in streaming chunks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub content: Option<String>,
}

impl DeltaChunk {
    /// Incremental text at `choices[0].delta.content`, if any.
    pub fn delta_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
    }
}

/// Non-streaming completion response body.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    /// Model that actually served the request (may be the fallback)
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub choices: Vec<CompletionChoice>,

    /// Error object embedded in an otherwise-2xx body
    #[serde(default)]
    pub error: Option<UpstreamErrorBody>,
}

/// A single choice in a non-streaming response.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    pub message: Option<ReplyMessage>,
}

/// The assistant message inside a completion choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error object embedded in an upstream response body.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
