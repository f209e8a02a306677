use anyhow::Result;
use async_trait::async_trait;

use crate::types::AgentState;

/// One step of the knowledge agent
#[async_trait]
pub trait Node: Send + Sync {
    /// Run the step, appending its messages to `state`
    async fn execute(&self, state: &mut AgentState) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Llm,
    Tool,
}
