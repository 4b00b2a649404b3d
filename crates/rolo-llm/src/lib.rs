//! # rolo-llm
//!
//! Language-model gateway for the Rolo contact assistant.
//!
//! [`Gateway`] is the seam the assistant pipeline talks through; the
//! production implementation is [`OpenAiGateway`] over the OpenAI
//! chat-completions API. [`tokens`] provides the token accounting used
//! for per-call usage logs (observability only — never blocks a call).

#![deny(unsafe_code)]

pub mod gateway;
pub mod tokens;

pub use gateway::{CompletionOptions, Gateway, GatewayConfig, GatewayError, OpenAiGateway};
pub use tokens::{estimate_tokens, ApiUsage, UsageRecord};
