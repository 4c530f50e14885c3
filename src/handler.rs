//! Per-module request orchestration.
//!
//! One stateless pass per request: build context, guard the model config
//! and references, render the prompt, dispatch to the provider, recover
//! JSON, shape it per module. Every failure folds into a flat bilingual
//! `{"error": ...}` object; the HTTP layer always answers `200 OK`.

use serde::Serialize;
use serde_json::Value;

use crate::config::{LimitsConfig, NetworkConfig};
use crate::context::{PromptContext, build_context};
use crate::llm::provider::create_provider;
use crate::llm::response::recover_json_object;
use crate::llm::{ModelEntry, normalize_model};
use crate::modules::{Module, ModuleReply, normalize_reply};
use crate::prompt::build_prompt;

/// Reply for a module endpoint: the normalized result or a flat error.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RelayReply {
    /// Normalized module result.
    Success(ModuleReply),
    /// Flat bilingual error object.
    Error(ErrorBody),
}

/// `{"error": "..."}` in the request language.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Human-readable message for the browser client.
    pub error: String,
}

/// Reply for the model-listing endpoint.
///
/// Listing failures are in-band and English-only, matching the client
/// contract.
#[derive(Debug, Clone, Serialize)]
pub struct ModelsReply {
    /// Models reachable with the submitted credentials.
    pub models: Vec<ModelEntry>,
    /// Failure description, when listing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn bilingual_error(context: &PromptContext, key: &str) -> RelayReply {
    RelayReply::Error(ErrorBody {
        error: rust_i18n::t!(key, locale = context.locale()).to_string(),
    })
}

/// Runs the full relay pipeline for one module request.
pub async fn relay_module(
    module: Module,
    payload: &Value,
    limits: &LimitsConfig,
    network: &NetworkConfig,
) -> RelayReply {
    let context = build_context(payload, limits);

    tracing::debug!(
        "Relay {} request: lang={}, model={:?}",
        module,
        context.language_key(),
        context.model
    );

    if !context.model.is_usable() {
        return bilingual_error(&context, "relay.missing_model_config");
    }
    if context.reference_text.is_empty() {
        return bilingual_error(&context, "relay.missing_references");
    }

    let (system, user) = match build_prompt(module, &context) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!("Prompt build failed for {}: {}", module, e);
            return bilingual_error(&context, "relay.prompt_build_failed");
        }
    };

    let provider = match create_provider(&context.model, network) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::warn!("Provider setup failed for {}: {}", module, e);
            return bilingual_error(&context, "relay.model_call_failed");
        }
    };

    let raw = match provider.send_prompt(&system, &user).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("{} call failed for {}: {}", provider.name(), module, e);
            return bilingual_error(&context, "relay.model_call_failed");
        }
    };

    let Some(recovered) = recover_json_object(&raw) else {
        tracing::warn!(
            "No JSON object in {} reply for {} ({} chars)",
            provider.name(),
            module,
            raw.len()
        );
        return bilingual_error(&context, "relay.invalid_model_json");
    };

    match normalize_reply(module, &recovered) {
        Some(reply) => RelayReply::Success(reply),
        None => bilingual_error(&context, "relay.invalid_model_json"),
    }
}

/// Lists models reachable with the submitted credentials.
///
/// Accepts either `{"model": {...}}` or a bare model object.
pub async fn relay_models(payload: &Value, network: &NetworkConfig) -> ModelsReply {
    let raw_model = payload.get("model").unwrap_or(payload);
    let model = normalize_model(raw_model);

    if model.api_key.is_empty() {
        return ModelsReply {
            models: Vec::new(),
            error: Some("Missing API key".to_string()),
        };
    }

    let listing = match create_provider(&model, network) {
        Ok(provider) => provider.list_models().await,
        Err(e) => Err(e),
    };

    match listing {
        Ok(models) => ModelsReply {
            models,
            error: None,
        },
        Err(e) => {
            tracing::warn!("Model listing failed for {}: {}", model.provider, e);
            ModelsReply {
                models: Vec::new(),
                error: Some("Failed to list models".to_string()),
            }
        }
    }
}
