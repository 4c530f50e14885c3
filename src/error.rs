use thiserror::Error;

pub type Result<T> = std::result::Result<T, DraftpilotError>;

#[derive(Error, Debug)]
pub enum DraftpilotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("LLM provider error: {0}")]
    Llm(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuration parsing error: {0}")]
    ConfigParse(#[from] config::ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 通用错误类型，用于不适合其他分类的错误
    #[error("{0}")]
    Other(String),
}

impl DraftpilotError {
    /// 获取错误的解决建议
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            DraftpilotError::Config(msg) if msg.contains("address") => {
                Some("Check [server] host/port in the config file, or pass --host/--port")
            }
            DraftpilotError::Network(_) => {
                Some("Check your network connection, proxy settings, or API endpoint configuration")
            }
            DraftpilotError::Llm(msg) if msg.contains("timeout") => {
                Some("The API request timed out. Check network or try again later")
            }
            DraftpilotError::Llm(msg) if msg.contains("connection failed") => {
                Some("Cannot connect to API server. Check endpoint URL, network, or DNS settings")
            }
            DraftpilotError::Llm(msg) if msg.contains("401") => {
                Some("Check if your API key is valid and has not expired")
            }
            DraftpilotError::Llm(msg) if msg.contains("429") => {
                Some("Rate limit exceeded. Wait a moment and try again, or upgrade your API plan")
            }
            DraftpilotError::Llm(msg) if msg.contains("500") || msg.contains("503") => {
                Some("API service is temporarily unavailable. Try again in a few moments")
            }
            DraftpilotError::Llm(msg) if msg.contains("Failed to parse") => {
                Some("Run with --verbose to see the full LLM response and debug the issue")
            }
            _ => None,
        }
    }
}
