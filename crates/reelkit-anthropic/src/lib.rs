//! Anthropic Messages API backend for [`reelkit_llm`].

mod convert;
mod types;

use async_trait::async_trait;
use reelkit_llm::{CompletionRequest, ConversationBackend, ConversationModel, Error, TurnResponse};

use crate::types::ApiErrorEnvelope;

pub const DEFAULT_MODEL_ID: &str = "claude-sonnet-4-5";

const API_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic backend.
pub struct AnthropicConfig {
    pub api_key: String,
    pub base_url: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.anthropic.com/v1".into(),
        }
    }
}

/// Create a model handle for the given config and model id.
pub fn model(config: AnthropicConfig, model_id: &str) -> ConversationModel {
    ConversationModel::new(AnthropicModel {
        model_id: model_id.to_string(),
        client: reqwest::Client::new(),
        config,
    })
}

/// Create a model handle reading `ANTHROPIC_API_KEY` from the environment.
pub fn from_env(model_id: &str) -> ConversationModel {
    model(
        AnthropicConfig {
            api_key: std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            ..Default::default()
        },
        model_id,
    )
}

struct AnthropicModel {
    model_id: String,
    client: reqwest::Client,
    config: AnthropicConfig,
}

#[async_trait]
impl ConversationBackend for AnthropicModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn provider(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<TurnResponse, Error> {
        let body = convert::to_api_request(&self.model_id, &request);

        let response = self
            .client
            .post(format!("{}/messages", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response
                .text()
                .await
                .map_err(|e| Error::Http(Box::new(e)))?;
            return Err(match serde_json::from_str::<ApiErrorEnvelope>(&raw) {
                Ok(envelope) => Error::Api {
                    code: envelope.error.kind,
                    message: envelope.error.message,
                },
                Err(_) => Error::Api {
                    code: status.as_str().to_string(),
                    message: raw,
                },
            });
        }

        let api_response = response
            .json::<types::ApiResponse>()
            .await
            .map_err(|e| Error::Http(Box::new(e)))?;
        Ok(convert::from_api_response(api_response))
    }
}
