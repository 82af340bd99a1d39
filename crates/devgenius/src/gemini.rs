use devgenius_core::config::ProviderConfig;
use devgenius_core::provider::{build_prompt, interpret_reply, ProviderError};
use devgenius_core::request::RequestPayload;
use devgenius_core::response::ProviderOutput;
use rig::client::CompletionClient;
use rig::completion::{CompletionError, Prompt, PromptError};
use rig::providers::gemini;
use std::time::Duration;

use crate::ask::AiProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);
const MAX_ERROR_BODY: usize = 800;

const SYSTEM_PREAMBLE: &str = "\
You are DevGenius, an expert programming assistant.

Rules:
- Be accurate and concise.
- Put every piece of code in a fenced code block with a language tag.
- Do not invent APIs. If something is ambiguous, say so.";

/// Gemini through rig's provider client.
pub struct GeminiClient {
    client: gemini::Client,
    model: String,
}

impl GeminiClient {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = gemini::Client::builder()
            .api_key(config.api_key.expose())
            .base_url(&config.base_url)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create Gemini client: {e}")))?;

        Ok(Self {
            client,
            model: config.model,
        })
    }

    /// Send a prompt and return the reply text.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, ProviderError> {
        log::debug!("Prompting {} ({} chars)", self.model, prompt.len());

        let agent = self
            .client
            .agent(&self.model)
            .preamble(SYSTEM_PREAMBLE)
            .build();

        match tokio::time::timeout(REQUEST_TIMEOUT, agent.prompt(prompt)).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => {
                log::warn!("Gemini request failed: {}", e);
                Err(map_prompt_error(e))
            }
            Err(_) => Err(ProviderError::Timeout {
                seconds: REQUEST_TIMEOUT.as_secs(),
            }),
        }
    }
}

impl AiProvider for GeminiClient {
    async fn generate(&self, payload: &RequestPayload) -> Result<ProviderOutput, ProviderError> {
        let prompt = build_prompt(payload);
        let reply = self.generate_text(&prompt).await?;
        log::debug!("Gemini replied with {} chars", reply.len());
        Ok(interpret_reply(payload.feature_id(), reply))
    }
}

fn map_prompt_error(err: PromptError) -> ProviderError {
    match err {
        PromptError::CompletionError(CompletionError::HttpError(e)) => {
            ProviderError::Network(e.to_string())
        }
        PromptError::CompletionError(CompletionError::JsonError(e)) => {
            ProviderError::MalformedResponse(e.to_string())
        }
        PromptError::CompletionError(CompletionError::ResponseError(message)) => {
            ProviderError::MalformedResponse(truncate_body(&message))
        }
        other => ProviderError::Completion(truncate_body(other.to_string().trim())),
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_ERROR_BODY).collect();
        format!("{head}...")
    }
}
