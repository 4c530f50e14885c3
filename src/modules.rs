//! Writing modules and per-module response shaping.
//!
//! Each browser endpoint maps to one [`Module`]. The model's recovered JSON
//! is validated and reshaped here into the strict contract the client
//! expects; anything that fails validation becomes a bilingual error
//! upstream in the handler.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DEFAULT_RESULT_YEAR, MAX_TOPIC_TITLES};

/// Writing-assistance module requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    /// Thesis title generation.
    Topic,
    /// Chapter outline and argument chain.
    Outline,
    /// Draft passage generation.
    Draft,
    /// Academic polishing of an existing passage.
    Polish,
    /// Literature leads distilled from uploaded references.
    Search,
    /// Citation insertion into a passage.
    Citations,
}

impl Module {
    /// Catalog key for this module (matches `prompts.json`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Topic => "topic",
            Module::Outline => "outline",
            Module::Draft => "draft",
            Module::Polish => "polish",
            Module::Search => "search",
            Module::Citations => "citations",
        }
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Module {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "topic" => Ok(Module::Topic),
            "outline" => Ok(Module::Outline),
            "draft" => Ok(Module::Draft),
            "polish" => Ok(Module::Polish),
            "search" => Ok(Module::Search),
            "citations" => Ok(Module::Citations),
            _ => Err(format!("Unknown module: '{}'", s)),
        }
    }
}

/// One literature lead returned by the search module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Paper title.
    pub title: String,
    /// Publication year (defaults to a recent year when the model omits it).
    pub year: i32,
    /// Journal or venue name.
    pub source: String,
}

/// Normalized per-module reply sent back to the browser.
///
/// Serializes untagged, so the wire shape is exactly the flat object the
/// client contract specifies (`{"titles": ...}`, `{"draft": ...}`, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleReply {
    /// `{"titles": [...]}`
    Topic {
        /// Candidate thesis titles, at most [`MAX_TOPIC_TITLES`].
        titles: Vec<String>,
    },
    /// `{"sections": [...], "logic": [...]}`
    Outline {
        /// Chapter headings in order.
        sections: Vec<String>,
        /// Argument chain connecting the chapters.
        logic: Vec<String>,
    },
    /// `{"draft": "..."}`
    Draft {
        /// Generated passage.
        draft: String,
    },
    /// `{"polished": "..."}`
    Polish {
        /// Polished passage.
        polished: String,
    },
    /// `{"results": [...]}`
    Search {
        /// Literature leads.
        results: Vec<SearchResult>,
    },
    /// `{"citationBlock": "..."}`
    Citations {
        /// Passage with citations plus the reference list.
        #[serde(rename = "citationBlock")]
        citation_block: String,
    },
}

/// Validates and reshapes a recovered JSON object for `module`.
///
/// Returns `None` when the object does not satisfy the module contract
/// (wrong shape, or required content empty after trimming).
pub fn normalize_reply(module: Module, payload: &Value) -> Option<ModuleReply> {
    if !payload.is_object() {
        return None;
    }

    match module {
        Module::Topic => {
            // Models sometimes answer with "title" (singular) or a bare string;
            // an empty "titles" falls through to "title".
            let mut titles = clean_string_list(payload.get("titles").unwrap_or(&Value::Null));
            if titles.is_empty() {
                titles = clean_string_list(payload.get("title").unwrap_or(&Value::Null));
            }
            if titles.is_empty() {
                return None;
            }
            Some(ModuleReply::Topic {
                titles: titles.into_iter().take(MAX_TOPIC_TITLES).collect(),
            })
        }
        Module::Outline => {
            let sections = clean_string_list(payload.get("sections").unwrap_or(&Value::Null));
            let logic = clean_string_list(payload.get("logic").unwrap_or(&Value::Null));
            if sections.is_empty() {
                return None;
            }
            Some(ModuleReply::Outline { sections, logic })
        }
        Module::Draft => {
            let draft = clean_string_field(payload, "draft")?;
            Some(ModuleReply::Draft { draft })
        }
        Module::Polish => {
            let polished = clean_string_field(payload, "polished")?;
            Some(ModuleReply::Polish { polished })
        }
        Module::Search => {
            let results = payload
                .get("results")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(normalize_search_result).collect())
                .unwrap_or_else(Vec::new);
            if results.is_empty() {
                return None;
            }
            Some(ModuleReply::Search { results })
        }
        Module::Citations => {
            let citation_block = clean_string_field(payload, "citationBlock")?;
            Some(ModuleReply::Citations { citation_block })
        }
    }
}

/// Extracts a non-empty trimmed string field, or `None`.
fn clean_string_field(payload: &Value, key: &str) -> Option<String> {
    let text = payload.get(key)?.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}

/// Coerces a JSON value into a list of non-empty trimmed strings.
///
/// A bare string becomes a one-element list; scalar array entries are
/// stringified, nested arrays and objects are dropped.
fn clean_string_list(value: &Value) -> Vec<String> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::String(_) => vec![value],
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(scalar_to_string)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn normalize_search_result(item: &Value) -> Option<SearchResult> {
    let title = clean_string_field(item, "title")?;
    let source = clean_string_field(item, "source")?;
    // year may arrive as a number or a numeric string
    let year = match item.get("year") {
        Some(Value::Number(n)) => n.as_i64().map(|y| y as i32),
        Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
    .unwrap_or(DEFAULT_RESULT_YEAR);

    Some(SearchResult {
        title,
        year,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_module_round_trip_names() {
        for module in [
            Module::Topic,
            Module::Outline,
            Module::Draft,
            Module::Polish,
            Module::Search,
            Module::Citations,
        ] {
            assert_eq!(module.as_str().parse::<Module>().unwrap(), module);
        }
        assert!("review".parse::<Module>().is_err());
    }

    #[test]
    fn test_topic_caps_at_eight_titles() {
        let titles: Vec<Value> = (0..12).map(|i| json!(format!("Title {}", i))).collect();
        let reply = normalize_reply(Module::Topic, &json!({ "titles": titles })).unwrap();
        match reply {
            ModuleReply::Topic { titles } => assert_eq!(titles.len(), 8),
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[test]
    fn test_topic_accepts_singular_string() {
        let reply = normalize_reply(Module::Topic, &json!({ "title": "  One Title " })).unwrap();
        assert_eq!(
            reply,
            ModuleReply::Topic {
                titles: vec!["One Title".to_string()]
            }
        );
    }

    #[test]
    fn test_topic_rejects_empty_titles() {
        assert!(normalize_reply(Module::Topic, &json!({ "titles": ["", "  "] })).is_none());
        assert!(normalize_reply(Module::Topic, &json!({})).is_none());
    }

    #[test]
    fn test_topic_empty_titles_falls_through_to_title() {
        let reply =
            normalize_reply(Module::Topic, &json!({ "titles": [], "title": "X" })).unwrap();
        assert_eq!(
            reply,
            ModuleReply::Topic {
                titles: vec!["X".to_string()]
            }
        );
    }

    #[test]
    fn test_topic_stringifies_scalar_entries() {
        let reply = normalize_reply(
            Module::Topic,
            &json!({ "titles": [2025, "Consensus", {"nested": true}] }),
        )
        .unwrap();
        assert_eq!(
            reply,
            ModuleReply::Topic {
                titles: vec!["2025".to_string(), "Consensus".to_string()]
            }
        );
    }

    #[test]
    fn test_outline_requires_sections_but_not_logic() {
        let reply = normalize_reply(
            Module::Outline,
            &json!({ "sections": [" Intro ", "Methods"], "logic": [] }),
        )
        .unwrap();
        assert_eq!(
            reply,
            ModuleReply::Outline {
                sections: vec!["Intro".to_string(), "Methods".to_string()],
                logic: vec![]
            }
        );

        assert!(normalize_reply(Module::Outline, &json!({ "logic": ["only logic"] })).is_none());
    }

    #[test]
    fn test_draft_and_polish_trim() {
        let reply = normalize_reply(Module::Draft, &json!({ "draft": "  body  " })).unwrap();
        assert_eq!(
            reply,
            ModuleReply::Draft {
                draft: "body".to_string()
            }
        );
        assert!(normalize_reply(Module::Polish, &json!({ "polished": "   " })).is_none());
    }

    #[test]
    fn test_search_year_coercion() {
        let reply = normalize_reply(
            Module::Search,
            &json!({ "results": [
                { "title": "A", "source": "J", "year": 2021 },
                { "title": "B", "source": "K", "year": "2019" },
                { "title": "C", "source": "L" },
                { "title": "", "source": "dropped" }
            ]}),
        )
        .unwrap();
        match reply {
            ModuleReply::Search { results } => {
                assert_eq!(results.len(), 3);
                assert_eq!(results[0].year, 2021);
                assert_eq!(results[1].year, 2019);
                assert_eq!(results[2].year, DEFAULT_RESULT_YEAR);
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[test]
    fn test_search_rejects_empty_results() {
        assert!(normalize_reply(Module::Search, &json!({ "results": [] })).is_none());
    }

    #[test]
    fn test_citations_wire_name() {
        let reply = normalize_reply(
            Module::Citations,
            &json!({ "citationBlock": "text [1]\n[1] Smith 2023" }),
        )
        .unwrap();
        let wire = serde_json::to_value(&reply).unwrap();
        assert_eq!(wire["citationBlock"], "text [1]\n[1] Smith 2023");
    }

    #[test]
    fn test_non_object_payload_rejected() {
        assert!(normalize_reply(Module::Draft, &json!("just text")).is_none());
        assert!(normalize_reply(Module::Draft, &json!(null)).is_none());
    }
}
