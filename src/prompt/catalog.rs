//! Static prompt catalog.
//!
//! 提示词目录随二进制发布（`prompts/prompts.json`），首次使用时解析一次。
//! 目录将 `system` 与各写作模块映射到中英文模板字符串。

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::modules::Module;

/// Embedded catalog asset.
const CATALOG_JSON: &str = include_str!("../../prompts/prompts.json");

static CATALOG: OnceLock<PromptCatalog> = OnceLock::new();

/// Template pair keyed by language.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedTemplate {
    /// Chinese template.
    pub zh: String,
    /// English template.
    pub en: String,
}

impl LocalizedTemplate {
    /// Template for a language key (`zh` / anything-else ⇒ `en`).
    pub fn for_language(&self, language_key: &str) -> &str {
        if language_key == "zh" {
            &self.zh
        } else {
            &self.en
        }
    }
}

/// Parsed prompt catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptCatalog {
    /// System prompt per language.
    pub system: LocalizedTemplate,
    /// Per-module user templates.
    pub modules: HashMap<String, LocalizedTemplate>,
}

impl PromptCatalog {
    /// System prompt for a language.
    pub fn system_prompt(&self, language_key: &str) -> &str {
        self.system.for_language(language_key)
    }

    /// User template for a module and language, when the catalog has one.
    pub fn module_template(&self, module: Module, language_key: &str) -> Option<&str> {
        self.modules
            .get(module.as_str())
            .map(|t| t.for_language(language_key))
    }
}

/// The process-wide catalog, parsed on first access.
///
/// The asset is embedded at compile time; `test_catalog_asset_parses`
/// guards the panic path.
pub fn catalog() -> &'static PromptCatalog {
    CATALOG.get_or_init(|| {
        serde_json::from_str(CATALOG_JSON).expect("embedded prompts/prompts.json is malformed")
    })
}
