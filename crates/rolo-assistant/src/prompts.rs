//! Prompt templates for the routing and question-answering calls.
//!
//! Pure functions of their inputs — no state, no side effects.

use rolo_core::Contact;

/// Build the action-routing prompt for a user query.
///
/// Instructs the model to emit a JSON array of action objects, to infer
/// `add_or_update` for any interpersonal interaction (meeting, calling,
/// emailing) even without explicit contact fields, to never fabricate
/// unstated details, and to emit one action per distinct person.
#[must_use]
pub fn routing_prompt(user_query: &str) -> String {
    format!(
        "Parse query to JSON actions array.\n\n\
         Actions:\n\
         1. add_or_update: Add/update contact info OR when user mentions meeting/talking/emailing/interacting with people (even without contact details). \
         Params: {{identifier, name, email, company, phone}}. Set field to null if not mentioned. \
         ALWAYS use this for \"met with\", \"talked to\", \"called\", \"emailed\", etc.\n\
         2. delete_contact: Remove contact. Params: {{identifier}}.\n\
         3. query_contacts: Only for questions about existing contacts (what, when, who, etc).\n\n\
         Query: \"{user_query}\"\n\n\
         IMPORTANT: Only extract information EXPLICITLY mentioned. DO NOT invent last names, emails, or other details. \
         Use ONLY what's provided. For MULTIPLE people, return MULTIPLE actions.\n\
         RETURN JSON ARRAY: [{{\"action\":\"add_or_update\",\"params\":{{\"identifier\":null,\"name\":\"Jon\",\"email\":null,\"company\":null,\"phone\":null}}}}, ...]"
    )
}

/// Build the contact-question-answering prompt.
#[must_use]
pub fn answer_prompt(question: &str, contacts_summary: &str) -> String {
    format!("Answer briefly based on these contacts:\n{contacts_summary}\n\nQuestion: \"{question}\"")
}

/// Render one summary line per contact for the Q&A prompt context.
///
/// Format: `{name} ({email}) - {company|No company} - Added: {date}`.
#[must_use]
pub fn contacts_summary(contacts: &[&Contact]) -> String {
    contacts
        .iter()
        .map(|c| {
            let company = if c.company.is_empty() {
                "No company"
            } else {
                &c.company
            };
            format!(
                "{} ({}) - {} - Added: {}",
                c.name,
                c.email,
                company,
                c.created_at.format("%Y-%m-%d")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
