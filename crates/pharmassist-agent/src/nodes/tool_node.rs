use anyhow::Result;
use async_trait::async_trait;
use pharmassist_llm::ToolCall;
use std::sync::Arc;
use std::time::Instant;

use crate::node::Node;
use crate::tools::{KnowledgeTool, QueryArgs};
use crate::types::AgentState;

pub struct ToolNode {
    tools: Vec<Arc<dyn KnowledgeTool>>,
}

impl ToolNode {
    pub fn new(tools: Vec<Arc<dyn KnowledgeTool>>) -> Self {
        Self { tools }
    }

    async fn run_call(&self, call: &ToolCall) -> Result<String> {
        let tool = self
            .tools
            .iter()
            .find(|tool| tool.name() == call.function.name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", call.function.name))?;

        let args: QueryArgs = call.parse_arguments()?;
        tool.invoke(&args.query).await
    }
}

#[async_trait]
impl Node for ToolNode {
    async fn execute(&self, state: &mut AgentState) -> Result<()> {
        for call in state.pending_tool_calls() {
            let start = Instant::now();

            // Failures go back to the model as the tool result
            let result = match self.run_call(&call).await {
                Ok(output) => output,
                Err(e) => {
                    tracing::warn!(
                        run_id = %state.run_id,
                        tool = %call.function.name,
                        error = %e,
                        "Tool call failed"
                    );
                    format!("Tool execution failed: {}", e)
                }
            };

            tracing::debug!(
                tool = %call.function.name,
                duration_ms = start.elapsed().as_millis() as u64,
                "Tool call finished"
            );

            state.add_tool_result(call.id, result);
        }

        Ok(())
    }
}
