//! Provider utility functions
//!
//! Contains common functions such as URL processing and endpoint completion

/// OpenAI chat-completions endpoint suffix
pub const OPENAI_CHAT_SUFFIX: &str = "/v1/chat/completions";

/// OpenAI model-listing endpoint suffix
pub const OPENAI_MODELS_SUFFIX: &str = "/v1/models";

/// Gemini default base URL
pub const DEFAULT_GEMINI_BASE: &str = "https://generativelanguage.googleapis.com";

/// Smart completion of API endpoints
///
/// # Behavior
/// 1. Remove trailing slashes
/// 2. Check whether the URL already contains the full path
/// 3. If incomplete, complete the suffix, skipping any overlapping segments
///
/// # Example
/// ```
/// use draftpilot::llm::provider::utils::complete_endpoint;
///
/// assert_eq!(
///     complete_endpoint("https://api.deepseek.com", "/v1/chat/completions"),
///     "https://api.deepseek.com/v1/chat/completions"
/// );
///
/// assert_eq!(
///     complete_endpoint("https://api.deepseek.com/v1", "/v1/chat/completions"),
///     "https://api.deepseek.com/v1/chat/completions"
/// );
///
/// assert_eq!(
///     complete_endpoint("https://api.deepseek.com/v1/chat/completions", "/v1/chat/completions"),
///     "https://api.deepseek.com/v1/chat/completions"
/// );
/// ```
pub fn complete_endpoint(base_url: &str, expected_suffix: &str) -> String {
    let url = base_url.trim_end_matches('/');
    let suffix = expected_suffix.trim_start_matches('/');

    if url.ends_with(suffix) {
        return url.to_string();
    }

    // The URL may already contain a prefix of the suffix.
    // Example: url "https://api.com/v1", suffix "v1/chat/completions"
    // should only append "chat/completions".
    let suffix_parts: Vec<&str> = suffix.split('/').collect();

    for i in 0..suffix_parts.len() {
        let partial_suffix = suffix_parts[..=i].join("/");
        if url.ends_with(&partial_suffix) {
            let remaining_suffix = &suffix_parts[i + 1..].join("/");
            if remaining_suffix.is_empty() {
                return url.to_string();
            }
            return format!("{}/{}", url, remaining_suffix);
        }
    }

    format!("{}/{}", url, suffix)
}

/// Mask API key to prevent log leaks
///
/// # rule
/// - more than 8 characters: display first 4 characters + `...` + last 4 characters
/// - 8 characters or fewer: display `****`
///
/// 按字符计数而不是字节；key 来自请求载荷，可能包含多字节字符。
///
/// # Example
/// ```
/// use draftpilot::llm::provider::utils::mask_api_key;
///
/// assert_eq!(mask_api_key("sk-ant-api03-abcdefgh"), "sk-a...efgh");
/// assert_eq!(mask_api_key("short"), "****");
/// ```
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "****".to_string()
    }
}
