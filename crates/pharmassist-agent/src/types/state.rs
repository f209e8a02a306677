use pharmassist_llm::{Message, ToolCall};

/// Working state of one knowledge-agent run
#[derive(Debug, Clone)]
pub struct AgentState {
    pub run_id: String,
    pub model: String,
    pub messages: Vec<Message>,
}

impl AgentState {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            model: model.into(),
            messages,
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn has_pending_tool_calls(&self) -> bool {
        matches!(
            self.last_message(),
            Some(Message::AI { tool_calls: Some(calls), .. }) if !calls.is_empty()
        )
    }

    pub fn pending_tool_calls(&self) -> Vec<ToolCall> {
        match self.last_message() {
            Some(Message::AI { tool_calls: Some(calls), .. }) => calls.clone(),
            _ => Vec::new(),
        }
    }

    pub fn add_tool_result(&mut self, tool_call_id: String, result: String) {
        self.messages.push(Message::tool_result(tool_call_id, result));
    }

    /// Text of the last model turn when it requested no tools
    pub fn final_answer(&self) -> Option<&str> {
        match self.last_message() {
            Some(message @ Message::AI { .. }) if !self.has_pending_tool_calls() => message.text(),
            _ => None,
        }
    }
}
