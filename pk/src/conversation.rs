//! Conversation types
//!
//! A [`BotConversation`] is the ordered set of role-tagged posts produced from a
//! prompt, paired with the context that rendered it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Role of a post within a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostRole {
    Bot,
    User,
    System,
}

impl PostRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostRole::Bot => "bot",
            PostRole::User => "user",
            PostRole::System => "system",
        }
    }
}

impl std::fmt::Display for PostRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub role: PostRole,
    pub message: String,
}

impl Post {
    pub fn new(role: PostRole, message: impl Into<String>) -> Self {
        Self {
            role,
            message: message.into(),
        }
    }

    /// Create a system post
    pub fn system(message: impl Into<String>) -> Self {
        Self::new(PostRole::System, message)
    }

    /// Create a user post
    pub fn user(message: impl Into<String>) -> Self {
        Self::new(PostRole::User, message)
    }

    /// Create a bot post
    pub fn bot(message: impl Into<String>) -> Self {
        Self::new(PostRole::Bot, message)
    }
}

/// Ordered posts plus the context that produced them
///
/// Insertion order is emission order. A conversation composed from a prompt
/// holds at most one system post followed by at most one user post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConversation<C = ConversationContext> {
    pub posts: Vec<Post>,
    pub context: C,
}

impl<C> BotConversation<C> {
    /// Create an empty conversation carrying `context`
    pub fn new(context: C) -> Self {
        Self {
            posts: Vec::new(),
            context,
        }
    }

    pub fn add_post(&mut self, post: Post) {
        debug!(role = %post.role, message_len = post.message.len(), "BotConversation::add_post: called");
        self.posts.push(post);
    }

    /// Text of the first system post, if any
    ///
    /// Backends that take the system prompt out of band (rather than as a
    /// message) use this together with [`BotConversation::non_system_posts`].
    pub fn system_message(&self) -> Option<&str> {
        self.posts
            .iter()
            .find(|p| p.role == PostRole::System)
            .map(|p| p.message.as_str())
    }

    /// All posts except system posts, in order
    pub fn non_system_posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| p.role != PostRole::System)
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }
}

/// The user a request is made on behalf of
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub locale: Option<String>,
}

/// The channel a request originates from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelInfo {
    pub name: String,
    pub display_name: String,
}

/// Situational data available to prompt templates
///
/// Every field is always serialized (absent values as `null`) so templates can
/// test optional fields with `{{#if ...}}` under strict rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationContext {
    pub bot_name: String,
    pub time: String,
    pub server_name: String,
    pub company_name: String,
    pub requesting_user: Option<UserInfo>,
    pub channel: Option<ChannelInfo>,
    pub custom_instructions: Option<String>,
    /// Per-prompt inputs such as `thread`, `message`, `tone` or `transcript`
    pub prompt_parameters: BTreeMap<String, String>,
}

impl ConversationContext {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            ..Default::default()
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    pub fn with_server(mut self, server_name: impl Into<String>, company_name: impl Into<String>) -> Self {
        self.server_name = server_name.into();
        self.company_name = company_name.into();
        self
    }

    pub fn with_user(mut self, user: UserInfo) -> Self {
        self.requesting_user = Some(user);
        self
    }

    pub fn with_channel(mut self, channel: ChannelInfo) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn with_custom_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = Some(instructions.into());
        self
    }

    /// Set a single prompt parameter, replacing any previous value
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.prompt_parameters.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_role_serialization() {
        assert_eq!(serde_json::to_string(&PostRole::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&PostRole::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&PostRole::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn test_post_constructors() {
        assert_eq!(Post::system("a").role, PostRole::System);
        assert_eq!(Post::user("b").role, PostRole::User);
        assert_eq!(Post::bot("c").message, "c");
    }

    #[test]
    fn test_conversation_system_message() {
        let mut convo = BotConversation::new(ConversationContext::default());
        assert!(convo.is_empty());
        assert!(convo.system_message().is_none());

        convo.add_post(Post::system("be brief"));
        convo.add_post(Post::user("hello"));

        assert_eq!(convo.len(), 2);
        assert_eq!(convo.system_message(), Some("be brief"));
        let rest: Vec<_> = convo.non_system_posts().collect();
        assert_eq!(rest, vec![&Post::user("hello")]);
    }

    #[test]
    fn test_context_serializes_absent_fields_as_null() {
        let ctx = ConversationContext::new("Copilot").with_parameter("thread", "hi");
        let value = serde_json::to_value(&ctx).unwrap();

        assert_eq!(value["bot_name"], "Copilot");
        assert!(value.get("requesting_user").unwrap().is_null());
        assert!(value.get("custom_instructions").unwrap().is_null());
        assert_eq!(value["prompt_parameters"]["thread"], "hi");
    }

    #[test]
    fn test_context_deserializes_partial_yaml() {
        let yaml = "bot_name: ai\nprompt_parameters:\n  message: hello\n";
        let ctx: ConversationContext = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(ctx.bot_name, "ai");
        assert_eq!(ctx.prompt_parameters.get("message").map(String::as_str), Some("hello"));
        assert!(ctx.channel.is_none());
    }
}
