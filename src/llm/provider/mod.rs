pub mod gemini;
pub mod openai;
pub mod utils;

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use reqwest::Client;

use crate::config::NetworkConfig;
use crate::error::{DraftpilotError, Result};
use crate::llm::{ApiStyle, LlmProvider, ModelConfig};

/// 全局 HTTP 客户端（共享连接池）
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// 全局 HTTP 客户端初始化错误信息
///
/// 如果第一次创建失败，保存错误字符串以避免后续重复创建与潜在 panic。
static HTTP_CLIENT_ERROR: OnceLock<String> = OnceLock::new();

/// 获取或创建全局 HTTP 客户端
///
/// 使用 OnceLock 确保只创建一次，所有 provider 共享同一个连接池。
/// 第一次调用时的 NetworkConfig 决定 timeout 配置。
pub(crate) fn create_http_client(network_config: &NetworkConfig) -> Result<Client> {
    if let Some(client) = HTTP_CLIENT.get() {
        return Ok(client.clone());
    }

    if let Some(err_msg) = HTTP_CLIENT_ERROR.get() {
        return Err(DraftpilotError::Llm(
            rust_i18n::t!("provider.http_client_init_failed", error = err_msg.as_str()).to_string(),
        ));
    }

    let user_agent = format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    match Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(network_config.request_timeout))
        .connect_timeout(Duration::from_secs(network_config.connect_timeout))
        .build()
    {
        Ok(client) => {
            let _ = HTTP_CLIENT.set(client.clone());
            Ok(client)
        }
        Err(e) => {
            let err_msg = e.to_string();
            let _ = HTTP_CLIENT_ERROR.set(err_msg.clone());
            Err(DraftpilotError::Llm(
                rust_i18n::t!(
                    "provider.http_client_create_failed",
                    error = err_msg.as_str()
                )
                .to_string(),
            ))
        }
    }
}

/// 根据归一化后的模型配置创建 LLM Provider
///
/// 只区分两个协议族：OpenAI 兼容 API（gpt/deepseek/自定义代理）和 Gemini。
pub fn create_provider(
    model: &ModelConfig,
    network_config: &NetworkConfig,
) -> Result<Arc<dyn LlmProvider>> {
    match model.style {
        ApiStyle::OpenAI => Ok(Arc::new(openai::OpenAICompatProvider::new(
            model,
            network_config,
        )?)),
        ApiStyle::Gemini => Ok(Arc::new(gemini::GeminiProvider::new(
            model,
            network_config,
        )?)),
    }
}

/// 将网络层错误映射成带 i18n 文案的 provider 错误
///
/// 超时与连接失败给出专门文案，其余保留 reqwest 错误。
pub(crate) fn map_send_error(provider_name: &str, e: reqwest::Error) -> DraftpilotError {
    let error_details = format!("{}", e);

    tracing::debug!(
        "{} API request failed (timeout={}, connect={}): {}",
        provider_name,
        e.is_timeout(),
        e.is_connect(),
        error_details
    );

    if e.is_timeout() {
        DraftpilotError::Llm(
            rust_i18n::t!(
                "provider.api_request_timeout",
                provider = provider_name,
                detail = error_details.as_str()
            )
            .to_string(),
        )
    } else if e.is_connect() {
        DraftpilotError::Llm(
            rust_i18n::t!(
                "provider.api_connection_failed",
                provider = provider_name,
                detail = error_details.as_str()
            )
            .to_string(),
        )
    } else {
        DraftpilotError::Network(e)
    }
}
