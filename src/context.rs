//! Prompt-context construction.
//!
//! Turns the raw request payload into the flat substitution context the
//! template renderer consumes: language detection, list parsing, reference
//! truncation, and model-config normalization. Extraction is deliberately
//! lenient; a missing or mistyped field degrades to empty instead of
//! failing the request.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::LimitsConfig;
use crate::constants::MIN_REFERENCE_TAIL_CHARS;
use crate::llm::{ModelConfig, normalize_model};

/// Flat substitution context for one module request.
#[derive(Debug, Clone)]
pub struct PromptContext {
    /// Request language: Chinese templates and error messages when `true`.
    pub is_zh: bool,
    /// Research field, with a language-appropriate fallback label.
    pub field: String,
    /// Methodology, `" / "`-joined when given as a list.
    pub method: String,
    /// Keywords, `" / "`-joined.
    pub keywords: String,
    /// Core research question (`-` when absent).
    pub core_question: String,
    /// Target venue or audience (`-` when absent).
    pub target_venue: String,
    /// Whitespace-collapsed, truncated user instruction.
    pub user_input: String,
    /// Whitespace-collapsed, truncated current draft.
    pub draft_text: String,
    /// `"; "`-joined reference names (`-` when none).
    pub reference_titles: String,
    /// Assembled and truncated reference excerpts.
    pub reference_text: String,
    /// Normalized model configuration.
    pub model: ModelConfig,
}

impl PromptContext {
    /// Template language key (`zh` / `en`).
    pub fn language_key(&self) -> &'static str {
        if self.is_zh { "zh" } else { "en" }
    }

    /// i18n locale for error messages.
    pub fn locale(&self) -> &'static str {
        if self.is_zh { "zh-CN" } else { "en" }
    }

    /// Substitution variables consumed by the template renderer.
    pub fn vars(&self) -> HashMap<&'static str, &str> {
        HashMap::from([
            ("field", self.field.as_str()),
            ("method", self.method.as_str()),
            ("keywords", self.keywords.as_str()),
            ("core_question", self.core_question.as_str()),
            ("target_venue", self.target_venue.as_str()),
            ("user_input", self.user_input.as_str()),
            ("draft_text", self.draft_text.as_str()),
            ("reference_titles", self.reference_titles.as_str()),
            ("reference_text", self.reference_text.as_str()),
        ])
    }
}

/// Builds the substitution context from a raw request payload.
pub fn build_context(payload: &Value, limits: &LimitsConfig) -> PromptContext {
    let project = payload.get("project").cloned().unwrap_or(Value::Null);
    let input_text = str_field(payload, "input");
    let draft_text = str_field(payload, "draftText");
    let references: Vec<Value> = payload
        .get("references")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let is_zh = str_field(&project, "language") == "zh"
        || contains_cjk(&input_text)
        || contains_cjk(&draft_text);

    let keywords = parse_list(&str_field(&project, "keywords"));
    let methods = parse_list(&str_field(&project, "method"));

    let field = non_empty(str_field(&project, "field"))
        .unwrap_or_else(|| fallback_label(is_zh, "研究领域", "the field"));
    let method = non_empty(methods.join(" / "))
        .or_else(|| non_empty(str_field(&project, "method")))
        .unwrap_or_else(|| fallback_label(is_zh, "研究方法", "methodology"));

    let reference_text = build_reference_text(&references, limits);
    let reference_titles = references
        .iter()
        .filter_map(|r| non_empty(str_field(r, "name")))
        .collect::<Vec<_>>()
        .join("; ");

    PromptContext {
        is_zh,
        field,
        method,
        keywords: keywords.join(" / "),
        core_question: non_empty(str_field(&project, "research")).unwrap_or_else(|| "-".into()),
        target_venue: non_empty(str_field(&project, "audience")).unwrap_or_else(|| "-".into()),
        user_input: limit_text(&input_text, limits.max_input_chars),
        draft_text: limit_text(&draft_text, limits.max_draft_chars),
        reference_titles: non_empty(reference_titles).unwrap_or_else(|| "-".into()),
        reference_text: limit_text(&reference_text, limits.max_reference_prompt_chars),
        model: normalize_model(payload.get("model").unwrap_or(&Value::Null)),
    }
}

/// Assembles `Source: <name>` blocks from the uploaded references.
///
/// Each block is whitespace-collapsed and capped; blocks accumulate up to
/// the pool budget. A final block that no longer fits is kept truncated
/// only when a useful tail remains.
fn build_reference_text(references: &[Value], limits: &LimitsConfig) -> String {
    let mut chunks: Vec<String> = Vec::new();
    let mut total = 0usize;

    for reference in references {
        let content = str_field(reference, "content");
        let content = content.trim();
        if content.is_empty() {
            continue;
        }

        let label = non_empty(str_field(reference, "name"))
            .map(|name| format!("Source: {}\n", name))
            .unwrap_or_default();
        let snippet = take_chars(
            &collapse_whitespace(content),
            limits.max_reference_block_chars,
        );
        let block = format!("{}{}", label, snippet);
        let block_len = block.chars().count();

        if total + block_len > limits.max_reference_pool_chars {
            let remaining = limits.max_reference_pool_chars - total;
            if remaining > MIN_REFERENCE_TAIL_CHARS {
                chunks.push(take_chars(&block, remaining));
            }
            break;
        }

        chunks.push(block);
        total += block_len;
    }

    chunks.join("\n\n")
}

/// Splits on ASCII and fullwidth commas, trimming empties away.
pub fn parse_list(text: &str) -> Vec<String> {
    text.split(['，', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collapses runs of whitespace and truncates to `max_chars` characters,
/// appending `...` when cut.
pub fn limit_text(text: &str, max_chars: usize) -> String {
    let cleaned = collapse_whitespace(text);
    let cleaned = cleaned.trim();
    if cleaned.chars().count() <= max_chars {
        return cleaned.to_string();
    }
    format!("{}...", take_chars(cleaned, max_chars))
}

/// Whether the text contains CJK ideographs (U+4E00..U+9FFF).
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn take_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

fn fallback_label(is_zh: bool, zh: &str, en: &str) -> String {
    if is_zh { zh.to_string() } else { en.to_string() }
}
