//! PromptKit - named prompt templates to bot conversations
//!
//! Resolves a prompt name and a context into the ordered system/user messages
//! submitted to a conversational AI backend.
//!
//! # Core Concepts
//!
//! - **Template store**: every `*.tmpl` source parsed once into one immutable namespace
//! - **Prompt unit**: a file `<name>.tmpl` with optional `<name>.system` / `<name>.user` sub-templates
//! - **Composition**: system post first, user post second, each rendered and trimmed
//!
//! # Example
//!
//! ```ignore
//! use promptkit::{ConversationContext, EmbeddedSource, PromptName, Prompts};
//!
//! let prompts = Prompts::from_feed(&EmbeddedSource)?;
//! let ctx = ConversationContext::new("Copilot").with_parameter("message", "helo wrld");
//! let convo = prompts.chat_completion(PromptName::Spellcheck, ctx)?;
//! ```
//!
//! # Modules
//!
//! - [`prompts`] - Template store, rendering and composition
//! - [`conversation`] - Posts, roles and conversation context
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod conversation;
pub mod prompts;

// Re-export commonly used types
pub use config::{Config, PromptsConfig};
pub use conversation::{BotConversation, ChannelInfo, ConversationContext, Post, PostRole, UserInfo};
pub use prompts::{
    CompositionError, DirSource, EmbeddedSource, HandlebarsEngine, LayeredSource, PROMPT_EXTENSION, PromptError,
    PromptName, PromptUnit, Prompts, Renderer, SourceEntry, TemplateEngine, TemplateFeed, TemplateStore,
};
