use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::utils::{DEFAULT_GEMINI_BASE, mask_api_key};
use crate::config::NetworkConfig;
use crate::constants::{GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE};
use crate::error::{DraftpilotError, Result};
use crate::llm::response::truncate_for_preview;
use crate::llm::{LlmProvider, ModelConfig, ModelEntry};

/// Google Gemini API provider
///
/// 走 generateContent 协议。系统提示与用户提示拼接为单条 user 内容发送，
/// 与浏览器端既有约定保持一致。
pub struct GeminiProvider {
    name: String,
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

// ============================================================================
// Request/response structures
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Option<Vec<GeminiResponsePart>>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GeminiModelsResponse {
    #[serde(default)]
    models: Vec<GeminiModelItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiModelItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

// ============================================================================
// Implementation
// ============================================================================

impl GeminiProvider {
    /// Builds a Gemini provider from a normalized per-request model config.
    pub fn new(config: &ModelConfig, network_config: &NetworkConfig) -> Result<Self> {
        let base_url = if config.base_url.is_empty() {
            DEFAULT_GEMINI_BASE.to_string()
        } else {
            config.base_url.trim_end_matches('/').to_string()
        };

        Ok(Self {
            name: config.provider.clone(),
            client: super::create_http_client(network_config)?,
            api_key: config.api_key.clone(),
            base_url,
            model: config.model.clone(),
        })
    }

    /// Endpoint: /v1beta/models/{model}:generateContent
    fn generate_content_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Endpoint: /v1beta/models
    fn list_models_url(&self) -> String {
        format!("{}/v1beta/models", self.base_url)
    }

    fn api_error(&self, status: reqwest::StatusCode, body: &str) -> DraftpilotError {
        DraftpilotError::Llm(
            rust_i18n::t!(
                "provider.api_error",
                provider = self.name.as_str(),
                status = status.as_str(),
                body = truncate_for_preview(body).as_str()
            )
            .to_string(),
        )
    }

    fn parse_error(&self, error: &serde_json::Error, body: &str) -> DraftpilotError {
        DraftpilotError::Llm(
            rust_i18n::t!(
                "provider.parse_response_failed",
                provider = self.name.as_str(),
                error = error.to_string(),
                preview = truncate_for_preview(body).as_str()
            )
            .to_string(),
        )
    }

    fn extract_text(&self, body: &str) -> Result<String> {
        let response: GeminiResponse =
            serde_json::from_str(body).map_err(|e| self.parse_error(&e, body))?;

        let text = response
            .candidates
            .and_then(|mut candidates| {
                if candidates.is_empty() {
                    None
                } else {
                    candidates.swap_remove(0).content
                }
            })
            .and_then(|content| content.parts)
            .map(|parts| {
                parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
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
impl LlmProvider for GeminiProvider {
    async fn send_prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        // 单条 user 内容：system 与 prompt 以空行拼接
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: format!("{}\n\n{}", system_prompt, user_prompt),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: GENERATION_TEMPERATURE,
                max_output_tokens: GENERATION_MAX_TOKENS,
            },
        };

        tracing::debug!(
            "{} generateContent request: model={}, key={}, system_len={}, user_len={}",
            self.name,
            self.model,
            mask_api_key(&self.api_key),
            system_prompt.len(),
            user_prompt.len()
        );

        let response = self
            .client
            .post(self.generate_content_url())
            .header("x-goog-api-key", self.api_key.as_str())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| super::map_send_error(&self.name, e))?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("{} generateContent response status: {}", self.name, status);

        if !status.is_success() {
            return Err(self.api_error(status, &body));
        }

        self.extract_text(&body)
    }

    async fn list_models(&self) -> Result<Vec<ModelEntry>> {
        let response = self
            .client
            .get(self.list_models_url())
            .header("x-goog-api-key", self.api_key.as_str())
            .send()
            .await
            .map_err(|e| super::map_send_error(&self.name, e))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(self.api_error(status, &body));
        }

        let listing: GeminiModelsResponse =
            serde_json::from_str(&body).map_err(|e| self.parse_error(&e, &body))?;

        // 只保留支持 generateContent 的模型，id 取资源名最后一段
        let mut entries: Vec<ModelEntry> = listing
            .models
            .into_iter()
            .filter(|item| {
                item.supported_generation_methods
                    .iter()
                    .any(|m| m == "generateContent")
            })
            .filter_map(|item| {
                let id = item.name.rsplit('/').next().unwrap_or_default();
                if id.is_empty() {
                    None
                } else {
                    Some(ModelEntry::new(id))
                }
            })
            .collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(entries)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
