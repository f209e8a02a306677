use anyhow::Result;
use pharmassist_db::{ConnectionConfig, DatabaseHandle, SqlDatabase};
use std::fmt::Display;
use std::sync::Arc;

use crate::dispatcher::{Dispatcher, SessionContext};
use crate::history::ConversationHistory;
use crate::responders::AnswerStream;

/// Appended to every failure shown to the user, whatever the cause
pub const CONNECTION_NOTICE: &str = "Please make sure you're connected to the database.";

/// One user's conversation: the database handle and the turn history.
///
/// Every failure is turned into an assistant turn by [`ChatSession::record_failure`].
pub struct ChatSession {
    dispatcher: Arc<Dispatcher>,
    handle: Option<Arc<dyn SqlDatabase>>,
    history: ConversationHistory,
}

impl ChatSession {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            handle: None,
            history: ConversationHistory::with_greeting(),
        }
    }

    /// Open a connection, replacing any previous one
    pub async fn connect(&mut self, config: &ConnectionConfig) -> Result<()> {
        let handle = DatabaseHandle::connect(config).await?;
        self.attach(Arc::new(handle));
        Ok(())
    }

    pub fn attach(&mut self, handle: Arc<dyn SqlDatabase>) {
        self.handle = Some(handle);
    }

    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Record the question and start answering it.
    ///
    /// Blank input is ignored and yields `None`. The history passed on
    /// already holds the question.
    pub async fn ask(&mut self, question: &str) -> Result<Option<AnswerStream>> {
        if question.trim().is_empty() {
            return Ok(None);
        }

        self.history.push_human(question);

        let handle = self
            .handle
            .clone()
            .ok_or_else(|| anyhow::anyhow!("not connected to a database"))?;

        let ctx = SessionContext::new(handle, &self.history);
        let stream = self.dispatcher.respond(question, &ctx).await?;
        Ok(Some(stream))
    }

    pub fn record_answer(&mut self, answer: impl Into<String>) {
        self.history.push_assistant(answer);
    }

    /// Record `err` as an assistant turn and return the text shown to the user
    pub fn record_failure(&mut self, err: impl Display) -> String {
        let message = format!("Error: {:#}. {}", err, CONNECTION_NOTICE);
        self.history.push_assistant(message.clone());
        message
    }
}
