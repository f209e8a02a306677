pub mod knowledge;
pub mod sql;

use futures::Stream;
use std::pin::Pin;

pub use knowledge::KnowledgeResponder;
pub use sql::{SqlResponder, SQL_TEMPERATURE};

/// Lazy answer: text chunks produced as the caller polls, consumed once
pub type AnswerStream = Pin<Box<dyn Stream<Item = anyhow::Result<String>> + Send>>;
