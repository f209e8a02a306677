use anyhow::{Context, Result};
use pharmassist_llm::{ChatClient, ChatOptions, ChatRequest, Message};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::history::ConversationHistory;
use crate::prompts;

/// Backend chosen for a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingDecision {
    Database,
    Knowledge,
}

impl RoutingDecision {
    /// Database iff the upper-cased output contains `DATABASE`.
    ///
    /// A plain substring match, so "NOT A DATABASE QUESTION" routes to the
    /// database too. Anything unrecognised routes to knowledge.
    pub fn from_model_output(output: &str) -> Self {
        if output.to_uppercase().contains("DATABASE") {
            Self::Database
        } else {
            Self::Knowledge
        }
    }
}

impl fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Knowledge => write!(f, "knowledge"),
        }
    }
}

pub struct QueryClassifier {
    client: Arc<dyn ChatClient>,
    model: String,
}

impl QueryClassifier {
    pub fn new(client: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// One model call at temperature 0, no retries
    pub async fn classify(
        &self,
        question: &str,
        history: &ConversationHistory,
    ) -> Result<RoutingDecision> {
        let prompt = prompts::classification(question, history);
        let request = ChatRequest::new(self.model.clone(), vec![Message::human(prompt)])
            .with_options(ChatOptions::new().temperature(0.0));

        let response = self
            .client
            .chat(request)
            .await
            .context("Classification call failed")?;

        let decision = RoutingDecision::from_model_output(response.text_or_empty());
        tracing::info!(
            decision = %decision,
            raw = response.text_or_empty(),
            "Classified question"
        );

        Ok(decision)
    }
}
