//! Known prompts
//!
//! Every prompt shipped with the binary has a [`PromptName`] variant and a row
//! in [`PROMPT_REGISTRY`]. Adding a prompt means adding a template file, a
//! variant and a registry row; the store self-check reports rows without a file.

use std::str::FromStr;

use super::error::PromptError;

/// Identifier of a known prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptName {
    SummarizeThread,
    DirectMessageQuestion,
    EmojiSelect,
    MeetingSummary,
    MeetingSummaryOnly,
    MeetingKeyPoints,
    Spellcheck,
    ChangeTone,
}

impl PromptName {
    pub const ALL: [PromptName; 8] = [
        PromptName::SummarizeThread,
        PromptName::DirectMessageQuestion,
        PromptName::EmojiSelect,
        PromptName::MeetingSummary,
        PromptName::MeetingSummaryOnly,
        PromptName::MeetingKeyPoints,
        PromptName::Spellcheck,
        PromptName::ChangeTone,
    ];

    /// Template name, also the stem of the backing `<name>.tmpl` file
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptName::SummarizeThread => "summarize_thread",
            PromptName::DirectMessageQuestion => "direct_message_question",
            PromptName::EmojiSelect => "emoji_select",
            PromptName::MeetingSummary => "meeting_summary",
            PromptName::MeetingSummaryOnly => "summary_only",
            PromptName::MeetingKeyPoints => "meeting_key_points",
            PromptName::Spellcheck => "spellcheck",
            PromptName::ChangeTone => "change_tone",
        }
    }

    /// Registry row for this prompt
    pub fn spec(&self) -> &'static PromptSpec {
        // PROMPT_REGISTRY is declared in ALL order
        &PROMPT_REGISTRY[*self as usize]
    }
}

impl AsRef<str> for PromptName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for PromptName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PromptName {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PromptName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| PromptError::UnknownPrompt(s.to_string()))
    }
}

/// Metadata for a registered prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptSpec {
    pub name: PromptName,
    pub description: &'static str,
}

pub static PROMPT_REGISTRY: [PromptSpec; 8] = [
    PromptSpec {
        name: PromptName::SummarizeThread,
        description: "Summarize a thread",
    },
    PromptSpec {
        name: PromptName::DirectMessageQuestion,
        description: "Answer a question asked in a direct message",
    },
    PromptSpec {
        name: PromptName::EmojiSelect,
        description: "Select an emoji reaction for a message",
    },
    PromptSpec {
        name: PromptName::MeetingSummary,
        description: "Produce meeting notes from a transcript",
    },
    PromptSpec {
        name: PromptName::MeetingSummaryOnly,
        description: "Produce a summary-only meeting output",
    },
    PromptSpec {
        name: PromptName::MeetingKeyPoints,
        description: "Extract key points from a meeting transcript",
    },
    PromptSpec {
        name: PromptName::Spellcheck,
        description: "Correct spelling and grammar",
    },
    PromptSpec {
        name: PromptName::ChangeTone,
        description: "Rewrite text in a different tone",
    },
];
