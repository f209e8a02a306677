use anyhow::Result;
use async_trait::async_trait;
use pharmassist_llm::Tool;
use serde::Deserialize;

/// A lookup the knowledge agent may call: free text in, free text out
#[async_trait]
pub trait KnowledgeTool: Send + Sync {
    /// Function name exposed to the model
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn invoke(&self, query: &str) -> Result<String>;

    /// Function-calling definition taking a single `query` string
    fn as_llm_tool(&self) -> Tool {
        Tool::new(
            self.name(),
            self.description(),
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Free-text search query"
                    }
                },
                "required": ["query"]
            }),
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryArgs {
    pub query: String,
}
