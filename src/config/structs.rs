//! Configuration structures.

use serde::{Deserialize, Serialize};

use crate::error::{DraftpilotError, Result};

/// Top-level application configuration.
///
/// # Example
/// ```toml
/// [server]
/// host = "0.0.0.0"
/// port = 8787
///
/// [network]
/// request_timeout = 120
/// connect_timeout = 10
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Outbound HTTP settings for provider calls.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Prompt-context truncation limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl AppConfig {
    /// Validates the whole configuration tree.
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.network.validate()?;
        self.limits.validate()
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Validates listener settings.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(DraftpilotError::Config(
                "invalid listen address: host is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` string for the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

/// Network configuration for outbound provider requests.
///
/// # Fields
/// - `request_timeout`: HTTP request timeout in seconds (default: `120`)
/// - `connect_timeout`: HTTP connect timeout in seconds (default: `10`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// HTTP connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl NetworkConfig {
    /// Validates timeout settings.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout == 0 {
            return Err(DraftpilotError::Config(
                "network.request_timeout must be greater than 0".to_string(),
            ));
        }
        if self.connect_timeout == 0 {
            return Err(DraftpilotError::Config(
                "network.connect_timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    120
}

fn default_connect_timeout() -> u64 {
    10
}

/// Truncation limits applied while building the prompt context.
///
/// All limits count characters, not bytes; the inputs are routinely CJK.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Maximum characters of free-form user input.
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// Maximum characters of the current draft.
    #[serde(default = "default_max_draft_chars")]
    pub max_draft_chars: usize,

    /// Maximum characters of one reference excerpt block.
    #[serde(default = "default_max_reference_block_chars")]
    pub max_reference_block_chars: usize,

    /// Character budget when assembling reference blocks.
    #[serde(default = "default_max_reference_pool_chars")]
    pub max_reference_pool_chars: usize,

    /// Maximum characters of assembled reference text placed in a prompt.
    #[serde(default = "default_max_reference_prompt_chars")]
    pub max_reference_prompt_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_chars: default_max_input_chars(),
            max_draft_chars: default_max_draft_chars(),
            max_reference_block_chars: default_max_reference_block_chars(),
            max_reference_pool_chars: default_max_reference_pool_chars(),
            max_reference_prompt_chars: default_max_reference_prompt_chars(),
        }
    }
}

impl LimitsConfig {
    /// Validates truncation limits.
    pub fn validate(&self) -> Result<()> {
        if self.max_input_chars == 0 || self.max_draft_chars == 0 {
            return Err(DraftpilotError::Config(
                "limits: input/draft limits must be greater than 0".to_string(),
            ));
        }
        if self.max_reference_prompt_chars > self.max_reference_pool_chars {
            return Err(DraftpilotError::Config(
                "limits: max_reference_prompt_chars cannot exceed max_reference_pool_chars"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

fn default_max_input_chars() -> usize {
    crate::constants::MAX_INPUT_CHARS
}

fn default_max_draft_chars() -> usize {
    crate::constants::MAX_DRAFT_CHARS
}

fn default_max_reference_block_chars() -> usize {
    crate::constants::MAX_REFERENCE_BLOCK_CHARS
}

fn default_max_reference_pool_chars() -> usize {
    crate::constants::MAX_REFERENCE_POOL_CHARS
}

fn default_max_reference_prompt_chars() -> usize {
    crate::constants::MAX_REFERENCE_PROMPT_CHARS
}
