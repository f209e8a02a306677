use anyhow::Result;
use pharmassist_llm::{ChatClient, Message};
use std::sync::Arc;

use crate::node::{Node, NodeType};
use crate::nodes::{LlmNode, ToolNode};
use crate::prompts;
use crate::router::{NextNode, Router, SimpleRouter};
use crate::tools::KnowledgeTool;
use crate::types::{AgentConfig, AgentState};

/// Reason-act loop over a single knowledge tool.
///
/// Alternates model turns and tool calls until the model answers without
/// requesting a tool. More than `max_iterations` model turns is an error.
pub struct KnowledgeAgent {
    llm_node: LlmNode,
    tool_node: ToolNode,
    system_prompt: String,
    config: AgentConfig,
}

impl KnowledgeAgent {
    pub fn new(client: Arc<dyn ChatClient>, tool: Arc<dyn KnowledgeTool>, config: AgentConfig) -> Self {
        let system_prompt = prompts::knowledge_agent(tool.name(), tool.description());
        let llm_node = LlmNode::new(client, vec![tool.as_llm_tool()]);
        let tool_node = ToolNode::new(vec![tool]);

        Self {
            llm_node,
            tool_node,
            system_prompt,
            config,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Run the loop for `question` and return the final answer text
    pub async fn run(&self, question: &str) -> Result<String> {
        let mut state = AgentState::new(
            self.config.model.clone(),
            vec![Message::system(self.system_prompt.clone()), Message::human(question)],
        );
        let router = SimpleRouter;

        let mut current = NodeType::Llm;
        let mut llm_turns = 0;

        loop {
            if current == NodeType::Llm {
                if llm_turns >= self.config.max_iterations {
                    anyhow::bail!(
                        "Knowledge agent stopped after {} iterations without a final answer",
                        self.config.max_iterations
                    );
                }
                llm_turns += 1;
            }

            match current {
                NodeType::Llm => self.llm_node.execute(&mut state).await?,
                NodeType::Tool => self.tool_node.execute(&mut state).await?,
            }

            current = match router.next(&state, current) {
                NextNode::Llm => NodeType::Llm,
                NextNode::Tool => NodeType::Tool,
                NextNode::End => break,
            };
        }

        tracing::info!(run_id = %state.run_id, iterations = llm_turns, "Knowledge agent finished");

        Ok(state.final_answer().unwrap_or_default().to_string())
    }
}
