//! Prompt error types

use thiserror::Error;

use crate::conversation::BotConversation;

/// Error produced by a templating engine
pub type EngineError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while building the template store or composing a conversation
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("unable to read prompt templates from {location}")]
    Source {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse prompt templates: {file}")]
    Parse {
        file: String,
        #[source]
        source: EngineError,
    },

    #[error("main template not found: {0}")]
    MainTemplateNotFound(String),

    #[error("unable to execute template {template}")]
    Render {
        template: String,
        #[source]
        source: EngineError,
    },

    #[error("unable to serialize conversation context")]
    Context(#[from] serde_json::Error),

    #[error("unknown prompt: {0}")]
    UnknownPrompt(String),

    #[error("registered prompts have no template: {}", .0.join(", "))]
    MissingPrompts(Vec<String>),
}

impl PromptError {
    /// Check if this error means the store could not be built
    pub fn is_construction_failure(&self) -> bool {
        matches!(self, PromptError::Source { .. } | PromptError::Parse { .. })
    }

    /// Check if this error came from executing a template against a context
    pub fn is_render_failure(&self) -> bool {
        matches!(self, PromptError::Render { .. } | PromptError::Context(_))
    }
}

/// A failed composition, carrying whatever was built before the failure
///
/// The conversation always holds the caller's context. Its posts are the ones
/// rendered before the failing step and must not be submitted to a backend.
#[derive(Debug)]
pub struct CompositionError<C> {
    pub conversation: BotConversation<C>,
    pub error: PromptError,
}

impl<C> std::fmt::Display for CompositionError<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl<C: std::fmt::Debug> std::error::Error for CompositionError<C> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<C> CompositionError<C> {
    pub fn new(conversation: BotConversation<C>, error: PromptError) -> Self {
        Self { conversation, error }
    }

    /// Discard the partial conversation, keeping only the cause
    pub fn into_error(self) -> PromptError {
        self.error
    }
}
