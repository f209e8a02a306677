use crate::node::NodeType;
use crate::types::AgentState;

/// Picks the node that runs after `current`
pub trait Router: Send + Sync {
    fn next(&self, state: &AgentState, current: NodeType) -> NextNode;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextNode {
    Llm,
    Tool,
    End,
}

/// LLM -> Tool while the model asks for tools, then LLM -> End
pub struct SimpleRouter;

impl Router for SimpleRouter {
    fn next(&self, state: &AgentState, current: NodeType) -> NextNode {
        match current {
            NodeType::Llm if state.has_pending_tool_calls() => NextNode::Tool,
            NodeType::Llm => NextNode::End,
            NodeType::Tool => NextNode::Llm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmassist_llm::{Message, ToolCall};

    #[test]
    fn test_routes() {
        let mut state = AgentState::new("m", vec![Message::human("q")]);
        state.add_message(Message::ai("answer"));
        assert_eq!(SimpleRouter.next(&state, NodeType::Llm), NextNode::End);

        state.add_message(Message::ai_with_tools(None, vec![ToolCall::new("c", "t", "{}")]));
        assert_eq!(SimpleRouter.next(&state, NodeType::Llm), NextNode::Tool);
        assert_eq!(SimpleRouter.next(&state, NodeType::Tool), NextNode::Llm);
    }
}
