pub mod config;
pub mod state;

pub use config::AgentConfig;
pub use state::AgentState;
