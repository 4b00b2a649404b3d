//! Executes structured actions against a snapshot of the contact list.
//!
//! Pure function of its inputs: the executor never mutates the canonical
//! store and never invents an ID — the caller supplies the next-available
//! value and applies the returned [`ActionResult`] itself. Gateway
//! failures during Q&A degrade to a fixed apology answer rather than
//! bubbling past this boundary.

use chrono::Utc;
use rolo_core::errors::{COULD_NOT_PROCESS_QUERY, NO_NAMES_OR_EMAILS};
use rolo_core::{Action, ActionResult, AddOrUpdateParams, Contact};
use rolo_llm::{CompletionOptions, Gateway};
use tracing::warn;

use crate::prompts;
use crate::relevance::relevant_contacts;
use crate::resolver::resolve;

/// Tuning knobs for the routing and Q&A gateway calls.
#[derive(Clone, Copy, Debug)]
pub struct AssistantConfig {
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

impl Default for AssistantConfig {
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

/// Execute one action against a contact snapshot.
///
/// `next_id` is the ID a newly created contact will receive; the caller
/// increments its counter only when it applies an add result.
pub async fn execute(
    action: &Action,
    contacts: &[Contact],
    next_id: u64,
    gateway: &dyn Gateway,
    config: &AssistantConfig,
) -> ActionResult {
    match action {
        Action::QueryContacts(params) => {
            answer_query(&params.question, contacts, gateway, config).await
        }
        Action::AddOrUpdate(params) => add_or_update(params, contacts, next_id),
        Action::DeleteContact(params) => match resolve(contacts, &params.identifier) {
            Some(contact) => ActionResult::deleted(contact.id, contact.label()),
            None => ActionResult::failure(format!("Contact \"{}\" not found", params.identifier)),
        },
        Action::Error(params) => ActionResult::failure(params.message.clone()),
    }
}

/// Answer a question about the contacts via the gateway.
///
/// Gateway failure is non-fatal: the result is still a successful query
/// carrying the fixed apology message.
async fn answer_query(
    question: &str,
    contacts: &[Contact],
    gateway: &dyn Gateway,
    config: &AssistantConfig,
) -> ActionResult {
    let relevant = relevant_contacts(contacts, question, config.max_contacts_for_context);
    let prompt = prompts::answer_prompt(question, &prompts::contacts_summary(&relevant));
    let options = CompletionOptions {
        temperature: config.query_temperature,
        max_tokens: config.query_max_tokens,
    };

    match gateway.complete(&prompt, &options).await {
        Ok(answer) => ActionResult::answered(answer),
        Err(e) => {
            warn!(error = %e, "query answering failed, degrading");
            ActionResult::answered(COULD_NOT_PROCESS_QUERY)
        }
    }
}

/// Update the resolved contact, or construct a new one.
fn add_or_update(params: &AddOrUpdateParams, contacts: &[Contact], next_id: u64) -> ActionResult {
    let Some(search_term) = params.search_term() else {
        return ActionResult::failure(NO_NAMES_OR_EMAILS);
    };

    if let Some(existing) = resolve(contacts, search_term) {
        let mut updated = existing.clone();
        // Only explicitly-provided fields overwrite; None means the
        // model didn't mention the field, so the stored value stays.
        if let Some(name) = &params.name {
            updated.name.clone_from(name);
        }
        if let Some(email) = &params.email {
            updated.email.clone_from(email);
        }
        if let Some(company) = &params.company {
            updated.company.clone_from(company);
        }
        if let Some(phone) = &params.phone {
            updated.phone.clone_from(phone);
        }
        ActionResult::updated(updated)
    } else {
        ActionResult::added(Contact {
            id: next_id,
            name: params.name.clone().unwrap_or_default(),
            email: params.email.clone().unwrap_or_default(),
            company: params.company.clone().unwrap_or_default(),
            phone: params.phone.clone().unwrap_or_default(),
            metadata: serde_json::Map::new(),
            created_at: Utc::now(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
