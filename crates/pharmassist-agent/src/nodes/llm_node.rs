use anyhow::{Context, Result};
use async_trait::async_trait;
use pharmassist_llm::{ChatClient, ChatOptions, ChatRequest, Message, Tool, ToolChoice};
use std::sync::Arc;

use crate::node::Node;
use crate::types::AgentState;

/// Temperature of every knowledge-agent turn
pub const AGENT_TEMPERATURE: f32 = 0.3;

pub struct LlmNode {
    client: Arc<dyn ChatClient>,
    tools: Vec<Tool>,
}

impl LlmNode {
    pub fn new(client: Arc<dyn ChatClient>, tools: Vec<Tool>) -> Self {
        Self { client, tools }
    }

    fn build_request(&self, state: &AgentState) -> ChatRequest {
        let mut options = ChatOptions::new().temperature(AGENT_TEMPERATURE);
        if !self.tools.is_empty() {
            options = options.tools(self.tools.clone()).tool_choice(ToolChoice::auto());
        }

        ChatRequest::new(state.model.clone(), state.messages.clone()).with_options(options)
    }
}

#[async_trait]
impl Node for LlmNode {
    async fn execute(&self, state: &mut AgentState) -> Result<()> {
        let request = self.build_request(state);
        let response = self
            .client
            .chat(request)
            .await
            .context("Knowledge agent model call failed")?;

        let message = match response.tool_calls {
            Some(calls) if !calls.is_empty() => {
                tracing::debug!(run_id = %state.run_id, calls = calls.len(), "Model requested tools");
                Message::ai_with_tools(response.content, calls)
            }
            _ => Message::ai(response.content.unwrap_or_default()),
        };

        state.add_message(message);
        Ok(())
    }
}
