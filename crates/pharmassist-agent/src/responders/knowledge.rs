use anyhow::Result;
use async_stream::try_stream;
use futures::Stream;
use std::sync::Arc;

use super::AnswerStream;
use crate::agent::KnowledgeAgent;

/// Answers general questions through the knowledge agent
#[derive(Clone)]
pub struct KnowledgeResponder {
    agent: Arc<KnowledgeAgent>,
}

impl KnowledgeResponder {
    pub fn new(agent: Arc<KnowledgeAgent>) -> Self {
        Self { agent }
    }

    /// Single-chunk stream holding the agent's final answer unchanged
    pub fn answer(&self, question: &str) -> AnswerStream {
        Box::pin(single_answer(Arc::clone(&self.agent), question.to_string()))
    }
}

fn single_answer(agent: Arc<KnowledgeAgent>, question: String) -> impl Stream<Item = Result<String>> + Send {
    try_stream! {
        let answer = agent.run(&question).await?;
        yield answer;
    }
}
