//! Conversation composition
//!
//! Turns a prompt name and a context into a [`BotConversation`]: the system
//! sub-template (if declared) becomes the first post, the user sub-template
//! (if declared) the second.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::error::{CompositionError, PromptError};
use super::render::Renderer;
use super::source::TemplateFeed;
use super::store::TemplateStore;
use crate::conversation::{BotConversation, Post, PostRole};

/// Roles composed from a prompt, in emission order
const COMPOSED_ROLES: [PostRole; 2] = [PostRole::System, PostRole::User];

/// Composes conversations from a shared [`TemplateStore`]
///
/// Cloning is cheap; clones share the same store.
#[derive(Debug, Clone)]
pub struct Prompts {
    store: Arc<TemplateStore>,
}

impl Prompts {
    pub fn new(store: TemplateStore) -> Self {
        Self::from_shared(Arc::new(store))
    }

    pub fn from_shared(store: Arc<TemplateStore>) -> Self {
        if let Err(e) = store.verify_registry() {
            warn!("Prompt store is incomplete: {}", e);
        }
        Self { store }
    }

    /// Build a strict Handlebars store from `feed` and wrap it
    pub fn from_feed(feed: &dyn TemplateFeed) -> Result<Self, PromptError> {
        Ok(Self::new(TemplateStore::new(feed)?))
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Compose the conversation for prompt `name`
    ///
    /// On failure the error carries the conversation built so far: the context
    /// and any posts rendered before the failing step.
    pub fn chat_completion<C: Serialize>(
        &self,
        name: impl AsRef<str>,
        context: C,
    ) -> Result<BotConversation<C>, CompositionError<C>> {
        let name = name.as_ref();
        debug!(%name, "Prompts::chat_completion: called");
        let mut conversation = BotConversation::new(context);

        let Some(unit) = self.store.lookup(name) else {
            debug!(%name, "Prompts::chat_completion: main template not found");
            return Err(CompositionError::new(
                conversation,
                PromptError::MainTemplateNotFound(name.to_string()),
            ));
        };

        let renderer = Renderer::new(&self.store);
        for role in COMPOSED_ROLES {
            let Some(template) = unit.sub_template(role) else {
                debug!(%name, %role, "Prompts::chat_completion: no sub-template for role");
                continue;
            };
            match renderer.execute(template, &conversation.context) {
                Ok(message) => conversation.add_post(Post::new(role, message)),
                Err(e) => {
                    debug!(%name, %role, error = %e, "Prompts::chat_completion: render failed");
                    return Err(CompositionError::new(conversation, e));
                }
            }
        }

        debug!(%name, posts = conversation.len(), "Prompts::chat_completion: composed");
        Ok(conversation)
    }

    /// Render an arbitrary declared or file template against `context`
    pub fn execute<C: Serialize>(&self, template: &str, context: &C) -> Result<String, PromptError> {
        Renderer::new(&self.store).execute(template, context)
    }
}
