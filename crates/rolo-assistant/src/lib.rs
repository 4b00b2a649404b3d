//! # rolo-assistant
//!
//! The natural-language action-routing pipeline:
//!
//! 1. [`prompts`] renders the routing prompt for a free-text command.
//! 2. The [`Gateway`] returns the model's raw text.
//! 3. [`parser`] extracts and normalizes structured [`Action`]s.
//! 4. [`executor`] performs each action against a contact snapshot,
//!    using [`resolver`] for fuzzy identity and [`relevance`] +
//!    the gateway for contact Q&A.
//!
//! The pipeline never owns the contact store: execution returns
//! [`ActionResult`] descriptors the store applies itself.

#![deny(unsafe_code)]

pub mod executor;
pub mod parser;
pub mod prompts;
pub mod relevance;
pub mod resolver;

use std::sync::Arc;

use rolo_core::errors::COULD_NOT_UNDERSTAND;
use rolo_core::{Action, ActionResult, Contact, ErrorParams};
use rolo_llm::{CompletionOptions, Gateway};
use tracing::warn;

pub use executor::AssistantConfig;

/// The assistant facade: a gateway plus its tuning knobs.
pub struct Assistant {
    gateway: Arc<dyn Gateway>,
    config: AssistantConfig,
}

impl Assistant {
    /// Create an assistant over the given gateway.
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>, config: AssistantConfig) -> Self {
        Self { gateway, config }
    }

    /// Route a free-text command into structured actions.
    ///
    /// A gateway failure degrades to a single error action carrying the
    /// could-not-understand message; unparsable output degrades to an
    /// empty list. Neither is a hard error.
    pub async fn route(&self, query: &str) -> Vec<Action> {
        let prompt = prompts::routing_prompt(query);
        let options = CompletionOptions {
            temperature: self.config.routing_temperature,
            max_tokens: self.config.routing_max_tokens,
        };

        match self.gateway.complete(&prompt, &options).await {
            Ok(raw) => parser::parse_actions(&raw),
            Err(e) => {
                warn!(error = %e, "action routing gateway call failed");
                vec![Action::Error(ErrorParams {
                    message: COULD_NOT_UNDERSTAND.into(),
                })]
            }
        }
    }

    /// Execute one routed action against a contact snapshot.
    pub async fn execute(
        &self,
        action: &Action,
        contacts: &[Contact],
        next_id: u64,
    ) -> ActionResult {
        executor::execute(action, contacts, next_id, self.gateway.as_ref(), &self.config).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
