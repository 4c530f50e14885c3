//! LLM abstractions, shared types, and provider traits.
//!
//! This module defines the provider interface used by the module relay
//! pipeline, plus the normalized per-request model configuration.

pub mod provider;
pub mod response;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// LLM API family.
///
/// The relay only distinguishes two wire protocols: everything that speaks
/// the OpenAI chat-completions contract, and the Gemini generateContent
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStyle {
    /// OpenAI API and OpenAI-compatible APIs (DeepSeek, proxies, ...).
    #[serde(rename = "openai")]
    OpenAI,
    /// Google Gemini API.
    Gemini,
}

impl std::fmt::Display for ApiStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiStyle::OpenAI => write!(f, "openai"),
            ApiStyle::Gemini => write!(f, "gemini"),
        }
    }
}

/// Normalized per-request model configuration.
///
/// Built from the client payload's `model` object; missing fields fall back
/// to per-provider presets. The API key is intentionally excluded from
/// `Debug` output in clear form.
#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider keyword sent by the client (`gpt`, `deepseek`, `gemini`).
    pub provider: String,
    /// Wire protocol family derived from `provider`.
    pub style: ApiStyle,
    /// Model identifier.
    pub model: String,
    /// API key.
    #[serde(skip_serializing, default)]
    pub api_key: String,
    /// API base URL (empty means provider default).
    pub base_url: String,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("provider", &self.provider)
            .field("style", &self.style)
            .field("model", &self.model)
            .field("api_key", &provider::utils::mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ModelConfig {
    /// Whether the config is complete enough to dispatch a request.
    pub fn is_usable(&self) -> bool {
        !self.api_key.is_empty() && !self.model.is_empty()
    }
}

/// Per-provider presets applied when the client omits a field.
fn preset_for(provider: &str) -> (ApiStyle, &'static str, &'static str) {
    match provider {
        "deepseek" => (
            ApiStyle::OpenAI,
            "deepseek-chat",
            "https://api.deepseek.com/v1",
        ),
        "gemini" => (ApiStyle::Gemini, "gemini-1.5-pro", ""),
        // "gpt" and anything unknown: OpenAI defaults
        _ => (ApiStyle::OpenAI, "gpt-5.1", "https://api.openai.com/v1"),
    }
}

/// Normalizes the raw `model` object from the client payload.
///
/// The provider keyword is lowercased; unknown providers are treated as
/// OpenAI-compatible with `gpt` presets.
pub fn normalize_model(raw: &Value) -> ModelConfig {
    let get = |key: &str| -> Option<String> {
        raw.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let provider = get("provider")
        .map(|p| p.to_lowercase())
        .unwrap_or_else(|| "gpt".to_string());
    let (style, default_model, default_base) = preset_for(&provider);

    ModelConfig {
        style,
        model: get("model").unwrap_or_else(|| default_model.to_string()),
        api_key: get("apiKey").unwrap_or_default(),
        base_url: get("baseUrl").unwrap_or_else(|| default_base.to_string()),
        provider,
    }
}

/// One entry in a provider's model listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Model identifier usable in a [`ModelConfig`].
    pub id: String,
    /// Display label (currently identical to `id`).
    pub label: String,
}

impl ModelEntry {
    /// Builds an entry whose label mirrors the id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
        }
    }
}

/// Unified interface implemented by all LLM providers.
///
/// The only required methods are [`send_prompt`], which relays a pre-built
/// `(system, user)` prompt pair and returns the raw response text, and
/// [`list_models`], which enumerates the models the configured credentials
/// can reach. JSON recovery and per-module shaping happen upstream in
/// [`response`](crate::llm::response) and
/// [`modules`](crate::modules).
///
/// [`send_prompt`]: LlmProvider::send_prompt
/// [`list_models`]: LlmProvider::list_models
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Sends a pre-built prompt pair to the LLM and returns the raw reply.
    async fn send_prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Lists models reachable with the configured credentials.
    async fn list_models(&self) -> Result<Vec<ModelEntry>>;

    /// Provider name (used for logs and error messages).
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_normalize_model_defaults_to_gpt() {
        let config = normalize_model(&json!({}));
        assert_eq!(config.provider, "gpt");
        assert_eq!(config.style, ApiStyle::OpenAI);
        assert_eq!(config.model, "gpt-5.1");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert!(config.api_key.is_empty());
        assert!(!config.is_usable());
    }

    #[test]
    fn test_normalize_model_deepseek_preset() {
        let config = normalize_model(&json!({ "provider": "DeepSeek", "apiKey": "sk-x" }));
        assert_eq!(config.provider, "deepseek");
        assert_eq!(config.style, ApiStyle::OpenAI);
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.base_url, "https://api.deepseek.com/v1");
        assert!(config.is_usable());
    }

    #[test]
    fn test_normalize_model_gemini_preset() {
        let config = normalize_model(&json!({ "provider": "gemini" }));
        assert_eq!(config.style, ApiStyle::Gemini);
        assert_eq!(config.model, "gemini-1.5-pro");
        assert!(config.base_url.is_empty());
    }

    #[test]
    fn test_normalize_model_explicit_fields_win() {
        let config = normalize_model(&json!({
            "provider": "gpt",
            "model": "gpt-4o-mini",
            "apiKey": "sk-test",
            "baseUrl": "https://proxy.example.com/v1"
        }));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "https://proxy.example.com/v1");
    }

    #[test]
    fn test_unknown_provider_falls_back_to_gpt_preset() {
        let config = normalize_model(&json!({ "provider": "mystery" }));
        assert_eq!(config.provider, "mystery");
        assert_eq!(config.style, ApiStyle::OpenAI);
        assert_eq!(config.model, "gpt-5.1");
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = normalize_model(&json!({ "apiKey": "sk-ant-api03-abcdefgh" }));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-ant-api03-abcdefgh"));
        assert!(debug.contains("sk-a...efgh"));
    }
}
