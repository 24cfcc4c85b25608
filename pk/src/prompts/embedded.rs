//! Embedded prompts
//!
//! These are compiled into the binary from .tmpl files at build time.

pub const STANDARD_PERSONALITY: &str = include_str!("../../prompts/standard_personality.tmpl");
pub const SUMMARIZE_THREAD: &str = include_str!("../../prompts/summarize_thread.tmpl");
pub const DIRECT_MESSAGE_QUESTION: &str = include_str!("../../prompts/direct_message_question.tmpl");
pub const EMOJI_SELECT: &str = include_str!("../../prompts/emoji_select.tmpl");
pub const MEETING_SUMMARY: &str = include_str!("../../prompts/meeting_summary.tmpl");
pub const SUMMARY_ONLY: &str = include_str!("../../prompts/summary_only.tmpl");
pub const MEETING_KEY_POINTS: &str = include_str!("../../prompts/meeting_key_points.tmpl");
pub const SPELLCHECK: &str = include_str!("../../prompts/spellcheck.tmpl");
pub const CHANGE_TONE: &str = include_str!("../../prompts/change_tone.tmpl");

/// Every bundled template as `(file name, source)`
pub const ALL: &[(&str, &str)] = &[
    ("standard_personality.tmpl", STANDARD_PERSONALITY),
    ("summarize_thread.tmpl", SUMMARIZE_THREAD),
    ("direct_message_question.tmpl", DIRECT_MESSAGE_QUESTION),
    ("emoji_select.tmpl", EMOJI_SELECT),
    ("meeting_summary.tmpl", MEETING_SUMMARY),
    ("summary_only.tmpl", SUMMARY_ONLY),
    ("meeting_key_points.tmpl", MEETING_KEY_POINTS),
    ("spellcheck.tmpl", SPELLCHECK),
    ("change_tone.tmpl", CHANGE_TONE),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::PromptName;

    fn embedded(file: &str) -> Option<&'static str> {
        ALL.iter().find(|(name, _)| *name == file).map(|(_, content)| *content)
    }

    #[test]
    fn test_every_registered_prompt_is_embedded() {
        for name in PromptName::ALL {
            let file = format!("{}.tmpl", name);
            assert!(embedded(&file).is_some(), "missing embedded template {}", file);
        }
    }

    #[test]
    fn test_summarize_thread_declares_both_roles() {
        assert!(SUMMARIZE_THREAD.contains("summarize_thread.system"));
        assert!(SUMMARIZE_THREAD.contains("summarize_thread.user"));
    }

    #[test]
    fn test_file_names_are_unique() {
        let mut names: Vec<_> = ALL.iter().map(|(name, _)| *name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ALL.len());
    }
}
