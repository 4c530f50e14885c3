//! Prompt catalog and template rendering.

pub mod catalog;
pub mod render;

pub use catalog::{PromptCatalog, catalog};
pub use render::render;

use crate::context::PromptContext;
use crate::error::{DraftpilotError, Result};
use crate::modules::Module;

/// Builds the `(system, user)` prompt pair for one module request.
///
/// The system prompt comes straight from the catalog; the user prompt is
/// the module's template for the request language, filled from the flat
/// context.
pub fn build_prompt(module: Module, context: &PromptContext) -> Result<(String, String)> {
    let catalog = catalog();
    let language_key = context.language_key();

    let template = catalog.module_template(module, language_key).ok_or_else(|| {
        DraftpilotError::Prompt(format!("no template for module '{}'", module))
    })?;

    let user = render(template, &context.vars())?;
    let system = catalog.system_prompt(language_key).to_string();

    tracing::debug!(
        "Prompt built for {} ({}): system {} chars, user {} chars",
        module,
        language_key,
        system.len(),
        user.len()
    );

    Ok((system, user))
}
