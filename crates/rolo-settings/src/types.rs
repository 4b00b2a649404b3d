//! Settings type tree with compiled defaults.

use serde::{Deserialize, Serialize};

/// Root settings for the Rolo server.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoloSettings {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Language-model gateway settings.
    pub llm: LlmSettings,
    /// Assistant pipeline settings.
    pub assistant: AssistantSettings,
    /// Contact store settings.
    pub store: StoreSettings,
}

/// HTTP server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerSettings {
    /// Host to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Log level filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 4001,
            log_level: "info".into(),
        }
    }
}

/// Language-model gateway settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmSettings {
    /// Model name.
    pub model: String,
    /// API base URL.
    pub base_url: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com".into(),
        }
    }
}

/// Assistant pipeline settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssistantSettings {
    /// Temperature for action-routing completions.
    pub routing_temperature: f32,
    /// Token budget for action-routing completions.
    pub routing_max_tokens: u32,
    /// Temperature for Q&A completions.
    pub query_temperature: f32,
    /// Token budget for Q&A completions.
    pub query_max_tokens: u32,
    /// Maximum contacts passed as Q&A context.
    pub max_contacts_for_context: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            routing_temperature: 0.3,
            routing_max_tokens: 200,
            query_temperature: 0.7,
            query_max_tokens: 100,
            max_contacts_for_context: 20,
        }
    }
}

/// Contact store settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreSettings {
    /// First contact ID the store assigns.
    pub initial_id: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { initial_id: 1 }
    }
}
