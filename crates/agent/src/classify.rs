//! Command classification for trace tagging.
//!
//! The label never influences how a request is answered; it only tags the
//! telemetry trace.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// What kind of board operation a chat message asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Create,
    Template,
    Layout,
    Modify,
    Delete,
    Query,
    Ambiguous,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Template => "template",
            Self::Layout => "layout",
            Self::Modify => "modify",
            Self::Delete => "delete",
            Self::Query => "query",
            Self::Ambiguous => "ambiguous",
        }
    }
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patterns in priority order. The first match wins, so a message like
/// "create a kanban template" is a template rather than a create.
static PATTERNS: LazyLock<Vec<(CommandType, Regex)>> = LazyLock::new(|| {
    [
        (
            CommandType::Template,
            r"\b(swot|kanban|retrospective|retro|pros.?cons|brainstorm|flowchart|timeline|decision.?matrix|template)\b",
        ),
        (CommandType::Delete, r"\b(delete|remove|clear|erase|get rid of)\b"),
        (
            CommandType::Layout,
            r"\b(arrange|grid|organize|align|layout|sort|group|spread)\b",
        ),
        (
            CommandType::Query,
            r"\b(what('s| is)|how many|list|show me|describe|count|tell me about)\b",
        ),
        (
            CommandType::Modify,
            r"\b(change|update|modify|resize|make .*(larger|smaller|bigger|green|blue|red|yellow|pink|purple)|move|rename|recolor|edit)\b",
        ),
        (
            CommandType::Create,
            r"\b(add|create|make|put|place|insert|draw|new|build|generate)\b",
        ),
    ]
    .into_iter()
    .filter_map(|(label, pattern)| match Regex::new(&format!("(?i){pattern}")) {
        Ok(re) => Some((label, re)),
        Err(e) => {
            tracing::error!(%label, error = %e, "Invalid classifier pattern");
            None
        }
    })
    .collect()
});

/// Classify a chat message. Never fails; unmatched text is `Ambiguous`.
pub fn classify(text: &str) -> CommandType {
    PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(label, _)| *label)
        .unwrap_or(CommandType::Ambiguous)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        assert_eq!(PATTERNS.len(), 6);
    }

    #[test]
    fn single_category_messages() {
        assert_eq!(classify("Add a yellow sticky note"), CommandType::Create);
        assert_eq!(classify("delete the red circle"), CommandType::Delete);
        assert_eq!(classify("Arrange these in a grid"), CommandType::Layout);
        assert_eq!(classify("How many stickies are there?"), CommandType::Query);
        assert_eq!(classify("resize the frame"), CommandType::Modify);
        assert_eq!(classify("Build me a retro board"), CommandType::Template);
    }

    #[test]
    fn earlier_category_wins() {
        assert_eq!(classify("create a kanban template"), CommandType::Template);
        assert_eq!(classify("create a SWOT analysis"), CommandType::Template);
        assert_eq!(classify("remove everything and add a note"), CommandType::Delete);
        assert_eq!(classify("what is in the grid"), CommandType::Layout);
        assert_eq!(classify("list and move"), CommandType::Query);
    }

    #[test]
    fn make_with_color_is_modify() {
        assert_eq!(classify("make the note green"), CommandType::Modify);
        assert_eq!(classify("make a note"), CommandType::Create);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(classify("DELETE IT"), CommandType::Delete);
        assert_eq!(classify("What's here"), CommandType::Query);
    }

    #[test]
    fn word_boundaries_apply() {
        // "address" contains "add" but not as a word
        assert_eq!(classify("address"), CommandType::Ambiguous);
        assert_eq!(classify("pros-cons list"), CommandType::Template);
        assert_eq!(classify("pros and cons"), CommandType::Ambiguous);
    }

    #[test]
    fn unmatched_and_empty_are_ambiguous() {
        assert_eq!(classify("hello there"), CommandType::Ambiguous);
        assert_eq!(classify(""), CommandType::Ambiguous);
    }

    #[test]
    fn display_and_serde_are_lowercase() {
        assert_eq!(CommandType::Template.to_string(), "template");
        assert_eq!(serde_json::to_string(&CommandType::Ambiguous).unwrap(), "\"ambiguous\"");
    }
}
