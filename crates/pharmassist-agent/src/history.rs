use serde::{Deserialize, Serialize};

/// First assistant turn of every session
pub const GREETING: &str =
    "Hi there! I'm a pharmacologist assistant. Ask me anything about drug interactions or general drug information.";

/// One turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum ConversationTurn {
    Human(String),
    Assistant(String),
}

impl ConversationTurn {
    pub fn text(&self) -> &str {
        match self {
            Self::Human(text) | Self::Assistant(text) => text,
        }
    }

    /// Speaker label used when the turn is rendered into a prompt
    pub fn speaker(&self) -> &'static str {
        match self {
            Self::Human(_) => "Human",
            Self::Assistant(_) => "AI",
        }
    }
}

/// Append-only record of a session's turns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History holding only the greeting turn
    pub fn with_greeting() -> Self {
        let mut history = Self::new();
        history.push_assistant(GREETING);
        history
    }

    pub fn push_human(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn::Human(text.into()));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn::Assistant(text.into()));
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// One `Human: ...` / `AI: ...` line per turn
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("{}: {}", turn.speaker(), turn.text()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_is_first_turn() {
        let history = ConversationHistory::with_greeting();
        assert_eq!(history.len(), 1);
        assert_eq!(history.last(), Some(&ConversationTurn::Assistant(GREETING.to_string())));
    }

    #[test]
    fn test_render() {
        let mut history = ConversationHistory::with_greeting();
        history.push_human("What's the interaction of Lepirudin and Apixaban?");

        assert_eq!(
            history.render(),
            format!("AI: {}\nHuman: What's the interaction of Lepirudin and Apixaban?", GREETING)
        );
    }

    #[test]
    fn test_empty_history_renders_empty() {
        assert_eq!(ConversationHistory::new().render(), "");
    }

    #[test]
    fn test_turn_serde_shape() {
        let json = serde_json::to_value(ConversationTurn::Human("hi".into())).unwrap();
        assert_eq!(json, serde_json::json!({"role": "human", "content": "hi"}));
    }
}
