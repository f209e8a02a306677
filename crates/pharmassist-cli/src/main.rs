mod cli;
mod config;
mod repl;

use clap::Parser;
use pharmassist_agent::{ChatSession, Dispatcher, WikipediaSearch};
use pharmassist_llm::{ClientFactory, ProviderConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Args;
use crate::config::{Config, LoggingConfig};
use crate::repl::Repl;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    args.apply(&mut config);

    init_logging(&config.logging);

    tracing::info!(model = %config.llm.model, "Starting PharmAssist");

    let mut provider = ProviderConfig::openai(config.openai_api_key.clone());
    if let Some(base_url) = &config.llm.base_url {
        provider = provider.with_base_url(base_url.clone());
    }
    let client = ClientFactory::create_chat_client(provider)?;
    let wikipedia = Arc::new(WikipediaSearch::new(config.wikipedia.clone())?);

    let dispatcher = Dispatcher::builder()
        .chat_client(client)
        .knowledge_tool(wikipedia)
        .config(config.agent_config())
        .build()?;

    let mut repl = Repl::new(ChatSession::new(Arc::new(dispatcher)), config.connection());
    if args.connect {
        repl.connect().await;
    }

    repl.run().await
}

fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // stdout belongs to the conversation
    match config.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
