use serde::{Deserialize, Serialize};

/// Default chat model for every call site
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_model")]
    pub model: String,

    /// LLM turns the knowledge agent may take before giving up
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_iterations() -> usize {
    15
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }
}
