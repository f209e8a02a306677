use anyhow::Result;
use pharmassist_db::SqlDatabase;
use pharmassist_llm::ChatClient;
use std::sync::Arc;

use crate::agent::KnowledgeAgent;
use crate::classifier::{QueryClassifier, RoutingDecision};
use crate::history::ConversationHistory;
use crate::responders::{AnswerStream, KnowledgeResponder, SqlResponder};
use crate::tools::KnowledgeTool;
use crate::types::AgentConfig;

/// What a single question is answered against
pub struct SessionContext<'a> {
    pub handle: Arc<dyn SqlDatabase>,
    pub history: &'a ConversationHistory,
}

impl<'a> SessionContext<'a> {
    pub fn new(handle: Arc<dyn SqlDatabase>, history: &'a ConversationHistory) -> Self {
        Self { handle, history }
    }
}

/// Classifies a question and hands it to one responder
pub struct Dispatcher {
    classifier: QueryClassifier,
    sql: SqlResponder,
    knowledge: KnowledgeResponder,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn new(client: Arc<dyn ChatClient>, tool: Arc<dyn KnowledgeTool>, config: AgentConfig) -> Self {
        let classifier = QueryClassifier::new(Arc::clone(&client), config.model.clone());
        let sql = SqlResponder::new(Arc::clone(&client), config.model.clone());
        let agent = KnowledgeAgent::new(client, tool, config);

        Self {
            classifier,
            sql,
            knowledge: KnowledgeResponder::new(Arc::new(agent)),
        }
    }

    pub async fn classify(&self, question: &str, history: &ConversationHistory) -> Result<RoutingDecision> {
        self.classifier.classify(question, history).await
    }

    /// Classification runs now; the chosen responder runs as the stream is polled.
    ///
    /// Responder failures surface through the stream. There is no fallback
    /// to the other backend.
    pub async fn respond(&self, question: &str, ctx: &SessionContext<'_>) -> Result<AnswerStream> {
        let decision = self.classify(question, ctx.history).await?;

        let stream = match decision {
            RoutingDecision::Database => {
                self.sql.answer(question, Arc::clone(&ctx.handle), ctx.history)
            }
            RoutingDecision::Knowledge => self.knowledge.answer(question),
        };

        Ok(stream)
    }
}

pub struct DispatcherBuilder {
    client: Option<Arc<dyn ChatClient>>,
    tool: Option<Arc<dyn KnowledgeTool>>,
    config: AgentConfig,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            client: None,
            tool: None,
            config: AgentConfig::default(),
        }
    }

    pub fn chat_client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn knowledge_tool(mut self, tool: Arc<dyn KnowledgeTool>) -> Self {
        self.tool = Some(tool);
        self
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Dispatcher> {
        let client = self
            .client
            .ok_or_else(|| anyhow::anyhow!("Chat client is required"))?;
        let tool = self
            .tool
            .ok_or_else(|| anyhow::anyhow!("Knowledge tool is required"))?;

        Ok(Dispatcher::new(client, tool, self.config))
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
