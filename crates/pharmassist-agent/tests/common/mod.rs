#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use futures::stream;
use pharmassist_agent::KnowledgeTool;
use pharmassist_db::{DbError, SqlDatabase};
use pharmassist_llm::traits::EventStream;
use pharmassist_llm::{ChatClient, ChatRequest, ChatResponse, StreamEvent};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Chat client replaying queued replies and recording every request
#[derive(Default)]
pub struct ScriptedChatClient {
    replies: Mutex<VecDeque<Result<ChatResponse, String>>>,
    streams: Mutex<VecDeque<Vec<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
    stream_requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(ChatResponse::text(text)));
        self
    }

    pub fn reply_with(self, response: ChatResponse) -> Self {
        self.replies.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn stream(self, fragments: &[&str]) -> Self {
        self.streams
            .lock()
            .unwrap()
            .push_back(fragments.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn stream_requests(&self) -> Vec<ChatRequest> {
        self.stream_requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len() + self.stream_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => anyhow::bail!(message),
            None => anyhow::bail!("no scripted reply left"),
        }
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<EventStream> {
        self.stream_requests.lock().unwrap().push(request);
        let fragments = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted stream left"))?;

        let mut events: Vec<Result<StreamEvent>> = fragments
            .into_iter()
            .map(|content| Ok(StreamEvent::Message { content }))
            .collect();
        events.push(Ok(StreamEvent::Done {
            finish_reason: Some("stop".to_string()),
        }));

        Ok(Box::pin(stream::iter(events)))
    }
}

pub const DDI_SCHEMA: &str = "CREATE TABLE ddi (\n\tdrug_name TEXT NOT NULL,\n\tinteracting_drug_name TEXT NOT NULL,\n\tdescription TEXT\n)";

/// In-memory database returning a fixed result and recording statements
pub struct StubDatabase {
    result: Result<String, DbError>,
    executed: Mutex<Vec<String>>,
    schema_reads: Mutex<usize>,
}

impl StubDatabase {
    pub fn returning(result: &str) -> Self {
        Self {
            result: Ok(result.to_string()),
            executed: Mutex::new(Vec::new()),
            schema_reads: Mutex::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(DbError::Query(message.to_string())),
            executed: Mutex::new(Vec::new()),
            schema_reads: Mutex::new(0),
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn schema_reads(&self) -> usize {
        *self.schema_reads.lock().unwrap()
    }
}

#[async_trait]
impl SqlDatabase for StubDatabase {
    async fn schema_text(&self) -> pharmassist_db::Result<String> {
        *self.schema_reads.lock().unwrap() += 1;
        Ok(DDI_SCHEMA.to_string())
    }

    async fn execute(&self, sql: &str) -> pharmassist_db::Result<String> {
        self.executed.lock().unwrap().push(sql.to_string());
        self.result.clone()
    }
}

/// Knowledge tool with a canned answer
pub struct StubTool {
    answer: Result<String, String>,
    queries: Mutex<Vec<String>>,
}

impl StubTool {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl KnowledgeTool for StubTool {
    fn name(&self) -> &str {
        "wikipedia_search"
    }

    fn description(&self) -> &str {
        "Use this tool to perform Wikipedia searches for drug information."
    }

    async fn invoke(&self, query: &str) -> Result<String> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.answer {
            Ok(answer) => Ok(answer.clone()),
            Err(message) => anyhow::bail!("{}", message),
        }
    }
}
