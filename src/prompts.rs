//! Prompt templates used by the text-generation collaborator.
//!
//! Templates are identified by [`PromptTemplate`] and referenced by nodes
//! when requesting generated text. The offline generator renders them by
//! straight `{placeholder}` substitution; an LLM-backed generator is free
//! to treat the template text as a system prompt instead.

use rustc_hash::FxHashMap;

/// Identifies a prompt template known to the workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PromptTemplate {
    /// Friendly reply to general chat.
    Greeting,
    /// Ask the user to restate an unclear request.
    ClarifyRequest,
    /// Ask for the missing required event details.
    MissingFields,
}

impl PromptTemplate {
    /// Stable identifier, used in logs and by generator implementations.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            PromptTemplate::Greeting => "greeting",
            PromptTemplate::ClarifyRequest => "clarify_request",
            PromptTemplate::MissingFields => "missing_fields",
        }
    }

    /// The template body with `{placeholder}` slots.
    #[must_use]
    pub fn body(&self) -> &'static str {
        match self {
            PromptTemplate::Greeting => GREETING_TEMPLATE,
            PromptTemplate::ClarifyRequest => CLARIFY_REQUEST_TEMPLATE,
            PromptTemplate::MissingFields => MISSING_FIELDS_TEMPLATE,
        }
    }
}

pub const GREETING_TEMPLATE: &str =
    "Hello! I'm your scheduling assistant. You said: \"{user_message}\". \
     I can schedule meetings, set reminders, and check availability - \
     just tell me what you need.";

pub const CLARIFY_REQUEST_TEMPLATE: &str =
    "I'm not sure I understood that correctly. Could you tell me what you'd \
     like me to help you with? For example: \"Schedule a meeting with John \
     tomorrow\" or \"Set a reminder to call Dana on Friday\".";

pub const MISSING_FIELDS_TEMPLATE: &str =
    "I'd love to get that scheduled for you. I still need the following \
     details: {missing_fields}. Could you share them?";

/// Render a template body by literal `{key}` substitution.
///
/// Unknown placeholders are left in place; generator implementations that
/// need stricter behavior can layer their own validation on top.
///
/// # Examples
///
/// ```
/// use confab::prompts::{PromptTemplate, render};
/// use rustc_hash::FxHashMap;
///
/// let mut vars = FxHashMap::default();
/// vars.insert("missing_fields".to_string(), "date_time, duration".to_string());
/// let text = render(PromptTemplate::MissingFields.body(), &vars);
/// assert!(text.contains("date_time, duration"));
/// ```
#[must_use]
pub fn render(template: &str, vars: &FxHashMap<String, String>) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Placeholders are substituted; unknown ones are left alone.
    fn test_render_substitution() {
        let mut vars = FxHashMap::default();
        vars.insert("user_message".to_string(), "hi there".to_string());
        let text = render("You said: {user_message} ({other})", &vars);
        assert_eq!(text, "You said: hi there ({other})");
    }

    #[test]
    /// Template ids are unique.
    fn test_template_ids_unique() {
        let ids = [
            PromptTemplate::Greeting.id(),
            PromptTemplate::ClarifyRequest.id(),
            PromptTemplate::MissingFields.id(),
        ];
        let mut deduped = ids.to_vec();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }
}
