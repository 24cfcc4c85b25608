//! Template execution
//!
//! Renders a single declared template against a context and normalizes the
//! output by trimming surrounding whitespace left over from source formatting.

use serde::Serialize;
use tracing::debug;

use super::error::PromptError;
use super::store::TemplateStore;

/// Executes templates of a [`TemplateStore`]
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'s> {
    store: &'s TemplateStore,
}

impl<'s> Renderer<'s> {
    pub fn new(store: &'s TemplateStore) -> Self {
        Self { store }
    }

    /// Render `template` against `context`, returning trimmed output
    pub fn execute<C: Serialize>(&self, template: &str, context: &C) -> Result<String, PromptError> {
        debug!(%template, "Renderer::execute: called");
        let value = serde_json::to_value(context)?;
        let rendered = self
            .store
            .engine()
            .execute(template, &value)
            .map_err(|source| PromptError::Render {
                template: template.to_string(),
                source,
            })?;
        Ok(rendered.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::source::SourceEntry;
    use proptest::prelude::*;
    use serde_json::json;

    fn store(body: &str) -> TemplateStore {
        let feed = vec![SourceEntry::new(
            "t.tmpl",
            format!(r#"{{{{#*inline "t.system"}}}}{}{{{{/inline}}}}"#, body),
        )];
        TemplateStore::new(&feed).unwrap()
    }

    #[test]
    fn test_execute_trims_output() {
        let store = store("\n  Hello, {{name}}!  \n");
        let out = Renderer::new(&store).execute("t.system", &json!({"name": "World"})).unwrap();
        assert_eq!(out, "Hello, World!");
    }

    #[test]
    fn test_execute_keeps_inner_whitespace() {
        let store = store("\nLine 1\n\nLine 3\n");
        let out = Renderer::new(&store).execute("t.system", &json!({})).unwrap();
        assert_eq!(out, "Line 1\n\nLine 3");
    }

    #[test]
    fn test_execute_missing_field_is_render_error() {
        let store = store("Hello, {{name}}!");
        let err = Renderer::new(&store).execute("t.system", &json!({})).unwrap_err();
        assert!(err.is_render_failure());
        assert!(err.to_string().contains("unable to execute template t.system"));
    }

    #[test]
    fn test_execute_unregistered_template() {
        let store = store("x");
        let err = Renderer::new(&store).execute("t.user", &json!({})).unwrap_err();
        assert!(matches!(err, PromptError::Render { ref template, .. } if template == "t.user"));
    }

    #[test]
    fn test_execute_with_struct_context() {
        #[derive(Serialize)]
        struct Ctx {
            name: String,
            count: u32,
        }
        let store = store("{{name}} has {{count}} items");
        let ctx = Ctx {
            name: "Bob".to_string(),
            count: 5,
        };
        assert_eq!(Renderer::new(&store).execute("t.system", &ctx).unwrap(), "Bob has 5 items");
    }

    proptest! {
        #[test]
        fn prop_output_is_trimmed_raw_output(
            lead in "[ \t\n]{0,6}",
            text in "[a-zA-Z0-9,.!?]([a-zA-Z0-9 ,.!?]{0,38}[a-zA-Z0-9,.!?])?",
            trail in "[ \t\n]{0,6}",
        ) {
            let store = store("{{text}}");
            let raw = format!("{}{}{}", lead, text, trail);
            let out = Renderer::new(&store).execute("t.system", &json!({ "text": raw })).unwrap();
            prop_assert_eq!(out, text);
        }
    }
}
