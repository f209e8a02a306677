pub mod llm_node;
pub mod tool_node;

pub use llm_node::LlmNode;
pub use tool_node::ToolNode;
