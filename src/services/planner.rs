//! Request planning: model selection, prompt selection, and payload assembly.
//!
//! Pure policy, no network access. The planner consumes the immutable model
//! table and a client message and produces the outbound completion payload
//! for the relay core.

use crate::api::models::{ChatRequest, CompletionRequest, Message};
use crate::core::config::ModelConfig;

const BASE_PROMPT: &str = "You are AgriBot, a helpful assistant specialized in agricultural \
    advice and data interpretation. Provide insightful and actionable farming recommendations \
    based on location data, soil conditions, and agricultural metrics.";

const FARM_SELECTED_PROMPT: &str = "The user has selected a farm location. Analyze this \
    geographical context to provide location-specific agricultural insights such as suitable \
    crops, regional climate patterns, and local best practices. When specific values are \
    provided (like NDVI, soil moisture, etc.), interpret them in practical terms for the farmer.";

const DATA_LOADED_PROMPT: &str = "The user has loaded farm data. Analyze the provided metrics \
    and offer meaningful interpretations. For example, explain what the values mean for crop \
    health, soil conditions, or irrigation needs. Translate technical data into practical \
    farming advice. If coordinates are provided, consider regional agricultural patterns for \
    that location.";

const GENERAL_PROMPT: &str = "Provide general farming information and encourage the user to \
    select a farm location on the map for more tailored advice. Explain the benefits of \
    location-specific agricultural insights.";

/// Select the target model from query complexity and conversation context.
///
/// Data-interpretation contexts and long queries go to the advanced model;
/// everything else uses the default.
pub fn select_model<'a>(models: &'a ModelConfig, text: &str, context_type: &str) -> &'a str {
    if context_type == "data_loaded" || text.len() > models.long_query_threshold {
        &models.advanced_model
    } else {
        &models.default_model
    }
}

/// System prompt for the given conversation context.
pub fn system_prompt(context_type: &str) -> String {
    let context_prompt = match context_type {
        "farm_selected" => FARM_SELECTED_PROMPT,
        "data_loaded" => DATA_LOADED_PROMPT,
        _ => GENERAL_PROMPT,
    };
    format!(
        "{} {} All responses must be in English.",
        BASE_PROMPT, context_prompt
    )
}

/// Build the outbound completion payload for a client message.
pub fn build_completion_request(models: &ModelConfig, message: &ChatRequest) -> CompletionRequest {
    let model = select_model(models, &message.text, &message.context_type).to_string();

    CompletionRequest {
        models: vec![model.clone(), models.fallback_model.clone()],
        model,
        messages: vec![
            Message {
                role: "system".to_string(),
                content: system_prompt(&message.context_type),
            },
            Message {
                role: "user".to_string(),
                content: message.text.clone(),
            },
        ],
        max_tokens: models.max_tokens,
        temperature: 0.7,
        stream: message.use_streaming,
    }
}
