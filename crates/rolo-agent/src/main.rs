//! # rolo-agent
//!
//! Rolo contact assistant server binary — wires the store, the OpenAI
//! gateway, and the HTTP surface together and starts serving.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rolo_assistant::{Assistant, AssistantConfig};
use rolo_llm::{GatewayConfig, OpenAiGateway};
use rolo_server::{build_router, AppState, ContactStore};
use rolo_settings::RoloSettings;
use tracing_subscriber::EnvFilter;

/// Rolo contact assistant server.
#[derive(Parser, Debug)]
#[command(name = "rolo-agent", about = "Rolo contact assistant server")]
struct Cli {
    /// Host to bind (overrides settings if specified).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings if specified).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the settings file (defaults to `~/.rolo/settings.json`).
    #[arg(long)]
    settings_path: Option<PathBuf>,
}

fn init_logging(settings: &RoloSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.server.log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn assistant_config(settings: &RoloSettings) -> AssistantConfig {
    AssistantConfig {
        routing_temperature: settings.assistant.routing_temperature,
        routing_max_tokens: settings.assistant.routing_max_tokens,
        query_temperature: settings.assistant.query_temperature,
        query_max_tokens: settings.assistant.query_max_tokens,
        max_contacts_for_context: settings.assistant.max_contacts_for_context,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let settings_path = args
        .settings_path
        .unwrap_or_else(rolo_settings::loader::settings_path);
    let settings =
        rolo_settings::loader::load_settings_from_path(&settings_path).unwrap_or_default();

    init_logging(&settings);

    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY environment variable is required")?;
    let gateway = OpenAiGateway::new(GatewayConfig {
        api_key,
        model: settings.llm.model.clone(),
        base_url: Some(settings.llm.base_url.clone()),
    })
    .context("failed to construct OpenAI gateway")?;

    let store = Arc::new(ContactStore::new(settings.store.initial_id));
    let assistant = Arc::new(Assistant::new(
        Arc::new(gateway),
        assistant_config(&settings),
    ));
    let router = build_router(AppState::new(store, assistant));

    let host = args.host.unwrap_or_else(|| settings.server.host.clone());
    let port = args.port.unwrap_or(settings.server.port);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        addr = %addr,
        model = %settings.llm.model,
        "rolo agent listening"
    );

    axum::serve(listener, router)
        .await
        .context("server error")?;
    Ok(())
}
