pub mod agent;
pub mod classifier;
pub mod dispatcher;
pub mod history;
pub mod node;
pub mod nodes;
pub mod prompts;
pub mod responders;
pub mod router;
pub mod session;
pub mod tools;
pub mod types;
pub mod wikipedia;

pub use agent::KnowledgeAgent;
pub use classifier::{QueryClassifier, RoutingDecision};
pub use dispatcher::{Dispatcher, DispatcherBuilder, SessionContext};
pub use history::{ConversationHistory, ConversationTurn, GREETING};
pub use node::{Node, NodeType};
pub use responders::{AnswerStream, KnowledgeResponder, SqlResponder};
pub use router::{NextNode, Router, SimpleRouter};
pub use session::{ChatSession, CONNECTION_NOTICE};
pub use tools::KnowledgeTool;
pub use types::{AgentConfig, AgentState};
pub use wikipedia::{WikipediaConfig, WikipediaSearch};
