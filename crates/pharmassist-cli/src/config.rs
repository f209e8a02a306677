use config::{Config as ConfigLoader, ConfigError, Environment, File};
use pharmassist_agent::types::config::DEFAULT_MODEL;
use pharmassist_agent::{AgentConfig, WikipediaConfig};
use pharmassist_db::ConnectionConfig;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub agent: AgentSection,
    #[serde(default)]
    pub wikipedia: WikipediaConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(skip)]
    pub openai_api_key: String,
    #[serde(skip)]
    pub db_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// OpenAI-compatible endpoint; the public API when unset
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: None,
        }
    }
}

/// Connection settings minus the password
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let defaults = ConnectionConfig::default();
        Self {
            host: defaults.host,
            port: defaults.port,
            user: defaults.user,
            database: defaults.database,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentSection {
    pub max_iterations: usize,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            max_iterations: AgentConfig::default().max_iterations,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. the file given with `--config`
    /// 4. `PHARMASSIST_<SECTION>__<KEY>` variables, e.g. `PHARMASSIST_DATABASE__HOST`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("PHARMASSIST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut cfg: Config = config.try_deserialize()?;

        cfg.openai_api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ConfigError::Message("OPENAI_API_KEY environment variable is required".to_string())
        })?;
        cfg.db_password = std::env::var("DB_PASSWORD").unwrap_or_default();

        Ok(cfg)
    }

    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig::new()
            .with_host(&self.database.host)
            .with_port(self.database.port)
            .with_user(&self.database.user)
            .with_password(&self.db_password)
            .with_database(&self.database.database)
    }

    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig::new()
            .with_model(&self.llm.model)
            .with_max_iterations(self.agent.max_iterations)
    }
}
