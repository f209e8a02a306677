use anyhow::{Context, Result};
use async_stream::try_stream;
use futures::{Stream, StreamExt};
use pharmassist_db::SqlDatabase;
use pharmassist_llm::{ChatClient, ChatOptions, ChatRequest, Message, StreamEvent};
use std::sync::Arc;

use super::AnswerStream;
use crate::history::ConversationHistory;
use crate::prompts;

/// Temperature of the SQL generation call
pub const SQL_TEMPERATURE: f32 = 0.3;

/// Turns a question into SQL, runs it and streams a narration of the result
#[derive(Clone)]
pub struct SqlResponder {
    client: Arc<dyn ChatClient>,
    model: String,
}

impl SqlResponder {
    pub fn new(client: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Nothing runs until the returned stream is polled.
    ///
    /// The generated SQL goes to `execute` exactly as the model wrote it.
    pub fn answer(
        &self,
        question: &str,
        db: Arc<dyn SqlDatabase>,
        history: &ConversationHistory,
    ) -> AnswerStream {
        Box::pin(narrated_answer(
            Arc::clone(&self.client),
            self.model.clone(),
            db,
            question.to_string(),
            history.clone(),
        ))
    }
}

fn narrated_answer(
    client: Arc<dyn ChatClient>,
    model: String,
    db: Arc<dyn SqlDatabase>,
    question: String,
    history: ConversationHistory,
) -> impl Stream<Item = Result<String>> + Send {
    try_stream! {
        let schema = db.schema_text().await?;
        let sql = generate_sql(client.as_ref(), &model, &schema, &question, &history).await?;
        tracing::debug!(sql = %sql, "Generated SQL");

        let response = db.execute(&sql).await?;

        // Schema is read again for the narration prompt
        let schema = db.schema_text().await?;
        let prompt = prompts::narration(&schema, &sql, &question, &response, &history);
        let request = ChatRequest::new(model.clone(), vec![Message::human(prompt)]);

        let mut events = client
            .chat_stream(request)
            .await
            .context("Narration call failed")?;

        while let Some(event) = events.next().await {
            if let StreamEvent::Message { content } = event? {
                yield content;
            }
        }
    }
}

async fn generate_sql(
    client: &dyn ChatClient,
    model: &str,
    schema: &str,
    question: &str,
    history: &ConversationHistory,
) -> Result<String> {
    let prompt = prompts::sql_generation(schema, question, history);
    let request = ChatRequest::new(model, vec![Message::human(prompt)])
        .with_options(ChatOptions::new().temperature(SQL_TEMPERATURE));

    let response = client.chat(request).await.context("SQL generation call failed")?;
    Ok(response.content.unwrap_or_default())
}
