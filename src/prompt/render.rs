//! Template rendering.
//!
//! Fills `{placeholder}` slots in a catalog template from the flat prompt
//! context. `{{` and `}}` escape literal braces (the catalog's JSON-shape
//! instructions rely on this).

use std::collections::HashMap;

use crate::error::{DraftpilotError, Result};

/// Renders a template by substituting `{name}` placeholders from `vars`.
///
/// An unknown placeholder or an unmatched brace is a render error; the
/// handler reports it as the bilingual prompt-build failure.
pub fn render(template: &str, vars: &HashMap<&'static str, &str>) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    output.push('{');
                    continue;
                }

                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }

                if !closed {
                    return Err(DraftpilotError::Prompt(format!(
                        "unterminated placeholder '{{{}'",
                        name
                    )));
                }

                match vars.get(name.as_str()) {
                    Some(value) => output.push_str(value),
                    None => {
                        return Err(DraftpilotError::Prompt(format!(
                            "unknown placeholder '{{{}}}'",
                            name
                        )));
                    }
                }
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    output.push('}');
                    continue;
                }
                return Err(DraftpilotError::Prompt("unmatched '}' in template".into()));
            }
            _ => output.push(c),
        }
    }

    Ok(output)
}
