use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::utils::{OPENAI_CHAT_SUFFIX, OPENAI_MODELS_SUFFIX, complete_endpoint, mask_api_key};
use crate::config::NetworkConfig;
use crate::constants::{GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE};
use crate::error::{DraftpilotError, Result};
use crate::llm::response::truncate_for_preview;
use crate::llm::{LlmProvider, ModelConfig, ModelEntry};

/// OpenAI 兼容 API Provider
///
/// 覆盖 OpenAI 本身、DeepSeek 以及任何兼容 chat-completions 协议的代理。
pub struct OpenAICompatProvider {
    name: String,
    client: Client,
    api_key: String,
    chat_endpoint: String,
    models_endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<MessagePayload>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct MessagePayload {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Vec<ModelItem>,
}

#[derive(Deserialize)]
struct ModelItem {
    #[serde(default)]
    id: String,
}

impl OpenAICompatProvider {
    /// Builds a provider from a normalized per-request model config.
    pub fn new(config: &ModelConfig, network_config: &NetworkConfig) -> Result<Self> {
        Ok(Self {
            name: config.provider.clone(),
            client: super::create_http_client(network_config)?,
            api_key: config.api_key.clone(),
            chat_endpoint: complete_endpoint(&config.base_url, OPENAI_CHAT_SUFFIX),
            models_endpoint: complete_endpoint(&config.base_url, OPENAI_MODELS_SUFFIX),
            model: config.model.clone(),
        })
    }

    fn parse_reply(&self, status: reqwest::StatusCode, body: &str) -> Result<String> {
        if !status.is_success() {
            return Err(DraftpilotError::Llm(
                rust_i18n::t!(
                    "provider.api_error",
                    provider = self.name.as_str(),
                    status = status.as_str(),
                    body = truncate_for_preview(body).as_str()
                )
                .to_string(),
            ));
        }

        let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
            DraftpilotError::Llm(
                rust_i18n::t!(
                    "provider.parse_response_failed",
                    provider = self.name.as_str(),
                    error = e.to_string(),
                    preview = truncate_for_preview(body).as_str()
                )
                .to_string(),
            )
        })?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(DraftpilotError::Llm(
                rust_i18n::t!("provider.empty_response", provider = self.name.as_str()).to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl LlmProvider for OpenAICompatProvider {
    async fn send_prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                MessagePayload {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                MessagePayload {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature: GENERATION_TEMPERATURE,
            max_tokens: GENERATION_MAX_TOKENS,
        };

        tracing::debug!(
            "{} chat request: model={}, key={}, system_len={}, user_len={}",
            self.name,
            self.model,
            mask_api_key(&self.api_key),
            system_prompt.len(),
            user_prompt.len()
        );

        let response = self
            .client
            .post(&self.chat_endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| super::map_send_error(&self.name, e))?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("{} chat response status: {}", self.name, status);

        self.parse_reply(status, &body)
    }

    async fn list_models(&self) -> Result<Vec<ModelEntry>> {
        let response = self
            .client
            .get(&self.models_endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| super::map_send_error(&self.name, e))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DraftpilotError::Llm(
                rust_i18n::t!(
                    "provider.api_error",
                    provider = self.name.as_str(),
                    status = status.as_str(),
                    body = truncate_for_preview(&body).as_str()
                )
                .to_string(),
            ));
        }

        let listing: ModelsResponse = serde_json::from_str(&body).map_err(|e| {
            DraftpilotError::Llm(
                rust_i18n::t!(
                    "provider.parse_response_failed",
                    provider = self.name.as_str(),
                    error = e.to_string(),
                    preview = truncate_for_preview(&body).as_str()
                )
                .to_string(),
            )
        })?;

        // 去重并排序，与 OpenAI 控制台展示一致
        let mut ids: Vec<String> = listing
            .data
            .into_iter()
            .map(|item| item.id)
            .filter(|id| !id.is_empty())
            .collect();
        ids.sort();
        ids.dedup();

        Ok(ids.into_iter().map(ModelEntry::new).collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn test_provider(base_url: &str) -> OpenAICompatProvider {
        let model = crate::llm::normalize_model(&json!({
            "provider": "gpt",
            "model": "gpt-4o-mini",
            "apiKey": "sk-test",
            "baseUrl": base_url
        }));
        OpenAICompatProvider::new(&model, &NetworkConfig::default()).unwrap()
    }

    #[test]
    fn test_endpoints_derived_from_base() {
        let provider = test_provider("https://api.openai.com/v1");
        assert_eq!(
            provider.chat_endpoint,
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(provider.models_endpoint, "https://api.openai.com/v1/models");
    }

    #[test]
    fn test_parse_reply_extracts_first_choice() {
        let provider = test_provider("https://api.openai.com/v1");
        let body = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "{\"draft\": \"x\"}" } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        })
        .to_string();
        let text = provider
            .parse_reply(reqwest::StatusCode::OK, &body)
            .unwrap();
        assert_eq!(text, "{\"draft\": \"x\"}");
    }

    #[test]
    fn test_parse_reply_error_status() {
        let provider = test_provider("https://api.openai.com/v1");
        let err = provider
            .parse_reply(reqwest::StatusCode::UNAUTHORIZED, "{\"error\": \"bad key\"}")
            .unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_parse_reply_empty_choices() {
        let provider = test_provider("https://api.openai.com/v1");
        let err = provider
            .parse_reply(reqwest::StatusCode::OK, "{\"choices\": []}")
            .unwrap_err();
        assert!(matches!(err, DraftpilotError::Llm(_)));
    }
}
