//! Templating engine interface
//!
//! The store and composer only need two things from a templating language:
//! registering sources into one shared namespace, and executing a named
//! template against a JSON context. [`TemplateEngine`] is that seam;
//! [`HandlebarsEngine`] is the implementation used by default.
//!
//! # Declared templates
//!
//! Besides the file itself (registered under its file name), a source may
//! declare named templates with Handlebars inline partials:
//!
//! ```text
//! {{#*inline "summarize_thread.system"}}
//! You summarize threads.
//! {{/inline}}
//! ```
//!
//! Each declaration is registered under its declared name, so it can be
//! executed directly and referenced as a partial (`{{> name}}`) from any other
//! source in the namespace.

use handlebars::Handlebars;
use handlebars::template::{Parameter, Template, TemplateElement};
use serde_json::Value;
use tracing::debug;

use super::error::EngineError;
use super::source::SourceEntry;

/// A templating language backing the template store
pub trait TemplateEngine: Send + Sync {
    /// Register `entry` and every template it declares into the namespace
    ///
    /// Returns the declared template names, not including the entry's own file name.
    fn parse(&mut self, entry: &SourceEntry) -> Result<Vec<String>, EngineError>;

    /// Render the template registered under `name`
    fn execute(&self, name: &str, context: &Value) -> Result<String, EngineError>;

    /// Check if a template is registered under `name`
    fn has_template(&self, name: &str) -> bool;
}

/// Every `{{#*inline "name"}}` block of a compiled template, inner blocks first
///
/// Blocks nested in helper or partial blocks count too. Comments and raw
/// blocks are text to the parser, so inline tags inside them declare nothing.
pub fn declarations(template: &Template) -> Vec<(String, Template)> {
    let mut found = Vec::new();
    collect_declarations(template, &mut found);
    found
}

fn collect_declarations(template: &Template, found: &mut Vec<(String, Template)>) {
    for element in &template.elements {
        match element {
            TemplateElement::DecoratorBlock(decorator) => {
                let Some(body) = &decorator.template else { continue };
                collect_declarations(body, found);
                if decorator.name.as_name() != Some("inline") {
                    continue;
                }
                if let Some(Parameter::Literal(Value::String(name))) = decorator.params.first() {
                    let mut body = body.clone();
                    body.name = Some(name.clone());
                    found.push((name.clone(), body));
                }
            }
            TemplateElement::HelperBlock(helper) => {
                for nested in helper.template.iter().chain(helper.inverse.iter()) {
                    collect_declarations(nested, found);
                }
            }
            TemplateElement::PartialBlock(partial) => {
                if let Some(nested) = &partial.template {
                    collect_declarations(nested, found);
                }
            }
            _ => {}
        }
    }
}

/// Handlebars-backed engine
///
/// HTML escaping is disabled since prompts are plain text. In strict mode a
/// reference to a field missing from the context fails the render.
pub struct HandlebarsEngine {
    hbs: Handlebars<'static>,
}

impl Default for HandlebarsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlebarsEngine {
    /// Create a strict engine
    pub fn new() -> Self {
        Self::with_strict_mode(true)
    }

    pub fn with_strict_mode(strict: bool) -> Self {
        debug!(%strict, "HandlebarsEngine::with_strict_mode: called");
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(strict);
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs }
    }

    pub fn is_strict(&self) -> bool {
        self.hbs.strict_mode()
    }
}

impl TemplateEngine for HandlebarsEngine {
    fn parse(&mut self, entry: &SourceEntry) -> Result<Vec<String>, EngineError> {
        debug!(name = %entry.name, "HandlebarsEngine::parse: called");
        let template = Template::compile_with_name(&entry.content, entry.name.clone())?;

        let declared = declarations(&template);
        self.hbs.register_template(&entry.name, template);

        let mut names = Vec::with_capacity(declared.len());
        for (name, body) in declared {
            debug!(file = %entry.name, declared = %name, "HandlebarsEngine::parse: registering declaration");
            self.hbs.register_template(&name, body);
            names.push(name);
        }
        Ok(names)
    }

    fn execute(&self, name: &str, context: &Value) -> Result<String, EngineError> {
        debug!(%name, "HandlebarsEngine::execute: called");
        Ok(self.hbs.render(name, context)?)
    }

    fn has_template(&self, name: &str) -> bool {
        self.hbs.has_template(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile(source: &str) -> Template {
        Template::compile(source).unwrap()
    }

    fn declared_names(source: &str) -> Vec<String> {
        declarations(&compile(source)).into_iter().map(|(name, _)| name).collect()
    }

    #[test]
    fn test_declarations() {
        let names = declared_names(
            r#"{{#*inline "a.system"}}System {{x}}{{/inline}}
{{#*inline "a.user"}}User{{/inline}}"#,
        );
        assert_eq!(names, vec!["a.system", "a.user"]);
    }

    #[test]
    fn test_declarations_nested() {
        let source = r#"{{#*inline "outer"}}O{{#*inline "inner"}}I{{/inline}}{{/inline}}"#;
        assert_eq!(declared_names(source), vec!["inner", "outer"]);
    }

    #[test]
    fn test_declarations_inside_helper_blocks() {
        let source = r#"{{#if x}}{{#*inline "yes"}}Y{{/inline}}{{else}}{{#*inline "no"}}N{{/inline}}{{/if}}"#;
        assert_eq!(declared_names(source), vec!["yes", "no"]);
    }

    #[test]
    fn test_declarations_none() {
        assert!(declared_names("Hello {{name}}").is_empty());
    }

    #[test]
    fn test_commented_out_declaration_is_ignored() {
        let source = r#"{{#*inline "p.system"}}S{{/inline}}{{!-- retired: {{#*inline "p.user"}}OLD{{/inline}} --}}"#;
        assert_eq!(declared_names(source), vec!["p.system"]);
    }

    #[test]
    fn test_raw_block_inline_tag_is_text() {
        let mut engine = HandlebarsEngine::new();
        let entry = SourceEntry::new(
            "p.tmpl",
            "{{#*inline \"p.system\"}}Write {{{{raw}}}}{{/inline}}{{{{/raw}}}} literally{{/inline}}",
        );

        let declared = engine.parse(&entry).unwrap();
        assert_eq!(declared, vec!["p.system".to_string()]);
        let out = engine.execute("p.system", &json!({})).unwrap();
        assert_eq!(out, "Write {{/inline}} literally");
    }

    #[test]
    fn test_whitespace_control_applies_to_declared_body() {
        let mut engine = HandlebarsEngine::new();
        let entry = SourceEntry::new("t.tmpl", "{{#*inline \"t\" ~}}\n  body  \n{{~/inline}}");
        engine.parse(&entry).unwrap();

        let out = engine.execute("t", &json!({})).unwrap();
        assert_eq!(out, "body");
    }

    #[test]
    fn test_parse_registers_file_and_declarations() {
        let mut engine = HandlebarsEngine::new();
        let entry = SourceEntry::new(
            "greet.tmpl",
            r#"{{#*inline "greet.system"}}Hi {{name}}{{/inline}}"#,
        );

        let declared = engine.parse(&entry).unwrap();
        assert_eq!(declared, vec!["greet.system".to_string()]);
        assert!(engine.has_template("greet.tmpl"));
        assert!(engine.has_template("greet.system"));
        assert!(!engine.has_template("greet.user"));
    }

    #[test]
    fn test_parse_syntax_error() {
        let mut engine = HandlebarsEngine::new();
        let entry = SourceEntry::new("broken.tmpl", "{{#if ready}}never closed");
        assert!(engine.parse(&entry).is_err());
    }

    #[test]
    fn test_execute_does_not_escape() {
        let mut engine = HandlebarsEngine::new();
        engine
            .parse(&SourceEntry::new("code.tmpl", "Code: {{code}}"))
            .unwrap();

        let out = engine
            .execute("code.tmpl", &json!({"code": "<b>'x' & y</b>"}))
            .unwrap();
        assert_eq!(out, "Code: <b>'x' & y</b>");
    }

    #[test]
    fn test_execute_strict_missing_field() {
        let mut engine = HandlebarsEngine::new();
        assert!(engine.is_strict());
        engine.parse(&SourceEntry::new("t.tmpl", "Hello {{name}}")).unwrap();
        assert!(engine.execute("t.tmpl", &json!({})).is_err());
    }

    #[test]
    fn test_execute_lenient_missing_field() {
        let mut engine = HandlebarsEngine::with_strict_mode(false);
        engine.parse(&SourceEntry::new("t.tmpl", "Hello {{name}}!")).unwrap();
        assert_eq!(engine.execute("t.tmpl", &json!({})).unwrap(), "Hello !");
    }

    #[test]
    fn test_declarations_visible_as_partials_across_files() {
        let mut engine = HandlebarsEngine::new();
        engine
            .parse(&SourceEntry::new(
                "shared.tmpl",
                r#"{{#*inline "signature"}}-- {{bot}}{{/inline}}"#,
            ))
            .unwrap();
        engine
            .parse(&SourceEntry::new(
                "note.tmpl",
                r#"{{#*inline "note.user"}}Hello {{> signature}}{{/inline}}"#,
            ))
            .unwrap();

        let out = engine.execute("note.user", &json!({"bot": "ai"})).unwrap();
        assert_eq!(out, "Hello -- ai");
    }
}
