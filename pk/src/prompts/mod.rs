//! Prompt Template System
//!
//! Resolves named prompts into role-tagged conversations.
//!
//! Templates are `.tmpl` files using Handlebars syntax. Each file is a prompt
//! unit named after the file; its system and user messages are inline
//! templates declared as `<name>.system` and `<name>.user`.
//!
//! Template loading chain (see [`crate::config::Config::feed`]):
//! 1. User override directory
//! 2. Configured prompt directory
//! 3. Embedded fallback compiled into the binary

mod composer;
pub mod embedded;
pub mod engine;
mod error;
mod registry;
mod render;
pub mod source;
mod store;

pub use composer::Prompts;
pub use engine::{HandlebarsEngine, TemplateEngine};
pub use error::{CompositionError, EngineError, PromptError};
pub use registry::{PROMPT_REGISTRY, PromptName, PromptSpec};
pub use render::Renderer;
pub use source::{DirSource, EmbeddedSource, LayeredSource, PROMPT_EXTENSION, SourceEntry, TemplateFeed};
pub use store::{PromptUnit, SYSTEM_SUFFIX, TemplateStore, USER_SUFFIX};
