//! # rolo-settings
//!
//! Layered configuration for the Rolo contact assistant:
//!
//! 1. compiled [`RoloSettings::default()`]
//! 2. optional `~/.rolo/settings.json`, deep-merged over the defaults
//! 3. environment variable overrides (highest priority)
//!
//! The OpenAI credential is deliberately *not* part of the settings
//! file; it comes from `OPENAI_API_KEY` and its absence is a hard
//! startup failure at gateway construction.

#![deny(unsafe_code)]

pub mod loader;
pub mod types;

pub use loader::{load_settings, load_settings_from_path, settings_path};
pub use types::{AssistantSettings, LlmSettings, RoloSettings, ServerSettings, StoreSettings};

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Errors from settings loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Settings file exists but could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file contains invalid JSON or bad field types.
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}
