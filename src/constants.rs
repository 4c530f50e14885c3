//! Crate-wide constants shared by the context builder and providers.

/// Maximum characters of free-form user input forwarded into a prompt.
pub const MAX_INPUT_CHARS: usize = 1200;

/// Maximum characters of the current draft forwarded into a prompt.
pub const MAX_DRAFT_CHARS: usize = 2000;

/// Maximum characters of one reference excerpt block.
pub const MAX_REFERENCE_BLOCK_CHARS: usize = 1200;

/// Character budget when assembling reference blocks.
pub const MAX_REFERENCE_POOL_CHARS: usize = 5000;

/// A partial final reference block is only kept above this size.
pub const MIN_REFERENCE_TAIL_CHARS: usize = 80;

/// Maximum characters of assembled reference text placed in a prompt.
pub const MAX_REFERENCE_PROMPT_CHARS: usize = 3500;

/// Maximum number of titles returned by the topic module.
pub const MAX_TOPIC_TITLES: usize = 8;

/// Sampling temperature for all module prompts.
pub const GENERATION_TEMPERATURE: f32 = 0.5;

/// Completion budget for all module prompts.
pub const GENERATION_MAX_TOKENS: u32 = 1200;

/// Fallback publication year when a search result omits it.
pub const DEFAULT_RESULT_YEAR: i32 = 2023;
