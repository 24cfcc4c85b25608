//! Template store
//!
//! Parses every template of a feed into one namespace at construction and
//! indexes the resulting prompt units by name. The store is immutable once
//! built and can be shared between threads without locking.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};

use super::engine::{HandlebarsEngine, TemplateEngine};
use super::error::PromptError;
use super::registry::PromptName;
use super::source::{PROMPT_EXTENSION, TemplateFeed};
use crate::conversation::PostRole;

/// Suffix of the declared system sub-template of a prompt
pub const SYSTEM_SUFFIX: &str = ".system";

/// Suffix of the declared user sub-template of a prompt
pub const USER_SUFFIX: &str = ".user";

/// A prompt backed by a `<name>.<extension>` file
///
/// The system and user sub-templates are resolved once when the store is
/// built. They may be declared in any file of the namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptUnit {
    name: String,
    file: String,
    system: Option<String>,
    user: Option<String>,
}

impl PromptUnit {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name under which the whole file is registered
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Declared name of the system sub-template, if present
    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    /// Declared name of the user sub-template, if present
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Sub-template for `role`; only system and user have one
    pub fn sub_template(&self, role: PostRole) -> Option<&str> {
        match role {
            PostRole::System => self.system(),
            PostRole::User => self.user(),
            PostRole::Bot => None,
        }
    }
}

/// All parsed prompt templates
pub struct TemplateStore {
    engine: Box<dyn TemplateEngine>,
    units: BTreeMap<String, PromptUnit>,
    /// Declared template name -> file declaring it
    declared: HashMap<String, String>,
}

impl std::fmt::Debug for TemplateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateStore")
            .field("units", &self.units)
            .field("declared", &self.declared.len())
            .finish()
    }
}

impl TemplateStore {
    /// Build a strict Handlebars store from every `*.tmpl` entry of `feed`
    pub fn new(feed: &dyn TemplateFeed) -> Result<Self, PromptError> {
        Self::with_engine(feed, HandlebarsEngine::new(), PROMPT_EXTENSION)
    }

    /// Build a store from every `*.<extension>` entry of `feed` using `engine`
    ///
    /// Fails as a whole if the feed cannot be read or any entry fails to parse.
    pub fn with_engine(
        feed: &dyn TemplateFeed,
        engine: impl TemplateEngine + 'static,
        extension: &str,
    ) -> Result<Self, PromptError> {
        debug!(%extension, "TemplateStore::with_engine: called");
        let mut engine = engine;
        let entries = feed.entries()?;

        let mut files = Vec::new();
        let mut declared: HashMap<String, String> = HashMap::new();
        for entry in &entries {
            let Some(stem) = entry.stem(extension) else {
                debug!(name = %entry.name, "TemplateStore::with_engine: skipping non-template entry");
                continue;
            };

            let names = engine.parse(entry).map_err(|source| PromptError::Parse {
                file: entry.name.clone(),
                source,
            })?;

            for name in names {
                if let Some(previous) = declared.insert(name.clone(), entry.name.clone()) {
                    warn!(
                        "Template '{}' declared in {} replaces the one declared in {}",
                        name, entry.name, previous
                    );
                }
            }
            files.push((stem.to_string(), entry.name.clone()));
        }

        let units: BTreeMap<String, PromptUnit> = files
            .into_iter()
            .map(|(name, file)| {
                let system = format!("{}{}", name, SYSTEM_SUFFIX);
                let user = format!("{}{}", name, USER_SUFFIX);
                let unit = PromptUnit {
                    system: declared.contains_key(&system).then_some(system),
                    user: declared.contains_key(&user).then_some(user),
                    name: name.clone(),
                    file,
                };
                (name, unit)
            })
            .collect();

        info!(
            "Loaded {} prompt templates ({} declared sub-templates)",
            units.len(),
            declared.len()
        );

        Ok(Self {
            engine: Box::new(engine),
            units,
            declared,
        })
    }

    /// Prompt unit registered under `<name>.<extension>`
    pub fn lookup(&self, name: &str) -> Option<&PromptUnit> {
        debug!(%name, "TemplateStore::lookup: called");
        self.units.get(name)
    }

    /// File whose declaration of `name` is registered
    ///
    /// With duplicate declarations this is the last file in feed order.
    pub fn declared_in(&self, name: &str) -> Option<&str> {
        self.declared.get(name).map(String::as_str)
    }

    /// All prompt units, sorted by name
    pub fn units(&self) -> impl Iterator<Item = &PromptUnit> {
        self.units.values()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Registered prompts with no backing template file
    pub fn missing_prompts(&self) -> Vec<PromptName> {
        PromptName::ALL
            .into_iter()
            .filter(|name| !self.units.contains_key(name.as_str()))
            .collect()
    }

    /// Startup self-check: every registered prompt has a template file
    pub fn verify_registry(&self) -> Result<(), PromptError> {
        debug!("TemplateStore::verify_registry: called");
        let missing = self.missing_prompts();
        if missing.is_empty() {
            return Ok(());
        }
        Err(PromptError::MissingPrompts(
            missing.iter().map(|name| name.to_string()).collect(),
        ))
    }

    pub(crate) fn engine(&self) -> &dyn TemplateEngine {
        self.engine.as_ref()
    }
}
