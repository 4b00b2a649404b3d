//! Structured actions derived from free text, and their results.
//!
//! The language model's raw output is inherently untyped; the parser
//! normalizes it into [`Action`] — a tagged variant with an explicit
//! error arm — so downstream callers always get a total function.

use serde::{Deserialize, Serialize};

use crate::contact::Contact;

// ─────────────────────────────────────────────────────────────────────────────
// Action
// ─────────────────────────────────────────────────────────────────────────────

/// A structured instruction routed from a natural-language query.
///
/// Wire format is adjacently tagged, matching the shape the routing
/// prompt asks the model for:
/// `{"action": "add_or_update", "params": {...}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "params", rename_all = "snake_case")]
pub enum Action {
    /// Add a new contact or update an existing one.
    AddOrUpdate(AddOrUpdateParams),
    /// Remove a contact.
    DeleteContact(DeleteParams),
    /// Answer a question about existing contacts.
    QueryContacts(QueryParams),
    /// A routing-time failure carried through as an action.
    Error(ErrorParams),
}

/// Parameters for [`Action::AddOrUpdate`].
///
/// `None` means "not mentioned, do not overwrite" — distinct from
/// `Some(String::new())`, which clears the field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AddOrUpdateParams {
    /// Free-text identifier to resolve against existing contacts.
    #[serde(default)]
    pub identifier: Option<String>,
    /// Contact name, if mentioned.
    #[serde(default)]
    pub name: Option<String>,
    /// Email, if mentioned.
    #[serde(default)]
    pub email: Option<String>,
    /// Company, if mentioned.
    #[serde(default)]
    pub company: Option<String>,
    /// Phone, if mentioned.
    #[serde(default)]
    pub phone: Option<String>,
}

impl AddOrUpdateParams {
    /// The term used to resolve an existing contact:
    /// identifier, falling back to name, falling back to email.
    /// Empty or whitespace-only values count as absent.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        fn pick(field: &Option<String>) -> Option<&str> {
            field.as_deref().filter(|s| !s.trim().is_empty())
        }
        pick(&self.identifier)
            .or_else(|| pick(&self.name))
            .or_else(|| pick(&self.email))
    }
}

/// Parameters for [`Action::DeleteContact`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteParams {
    /// Free-text identifier of the contact to delete.
    #[serde(default)]
    pub identifier: String,
}

/// Parameters for [`Action::QueryContacts`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    /// The user's question.
    #[serde(default)]
    pub question: String,
}

/// Parameters for [`Action::Error`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorParams {
    /// Human-readable failure description.
    #[serde(default)]
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// ActionResult
// ─────────────────────────────────────────────────────────────────────────────

/// The effect kind an executed action resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// A new contact was created.
    Add,
    /// An existing contact was modified.
    Update,
    /// A contact was removed.
    Delete,
    /// A question was answered.
    Query,
}

/// The outcome of executing one [`Action`].
///
/// Produced once per action by the executor, consumed by the store to
/// apply the side effect. The executor itself never mutates the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    /// Whether the action succeeded.
    pub success: bool,
    /// Effect kind, absent for failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionKind>,
    /// The created or updated contact copy (add/update only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    /// ID of the contact to remove (delete only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<u64>,
    /// Human-readable summary shown to the user.
    pub message: String,
}

impl ActionResult {
    /// A failed result carrying only a message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            action: None,
            contact: None,
            contact_id: None,
            message: message.into(),
        }
    }

    /// A successful add result with the new contact copy.
    #[must_use]
    pub fn added(contact: Contact) -> Self {
        let message = format!("Added {}", contact.label());
        Self {
            success: true,
            action: Some(ActionKind::Add),
            contact: Some(contact),
            contact_id: None,
            message,
        }
    }

    /// A successful update result with the updated contact copy.
    #[must_use]
    pub fn updated(contact: Contact) -> Self {
        let message = format!("Updated {}", contact.label());
        Self {
            success: true,
            action: Some(ActionKind::Update),
            contact: Some(contact),
            contact_id: None,
            message,
        }
    }

    /// A successful delete result for the given contact.
    #[must_use]
    pub fn deleted(contact_id: u64, label: &str) -> Self {
        Self {
            success: true,
            action: Some(ActionKind::Delete),
            contact: None,
            contact_id: Some(contact_id),
            message: format!("Deleted {label}"),
        }
    }

    /// A query result with the answer text.
    ///
    /// Degraded answers (gateway failure) are still `success: true` —
    /// user-visible but non-fatal.
    #[must_use]
    pub fn answered(answer: impl Into<String>) -> Self {
        Self {
            success: true,
            action: Some(ActionKind::Query),
            contact: None,
            contact_id: None,
            message: answer.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_wire_format_round_trips() {
        let action = Action::DeleteContact(DeleteParams {
            identifier: "Jon".into(),
        });
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action"], "delete_contact");
        assert_eq!(json["params"]["identifier"], "Jon");

        let back: Action = serde_json::from_value(json).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn add_or_update_null_fields_deserialize_as_none() {
        let json = r#"{"action":"add_or_update","params":{"identifier":null,"name":"Jon","email":null}}"#;
        let action: Action = serde_json::from_str(json).unwrap();
        let Action::AddOrUpdate(params) = action else {
            panic!("wrong variant");
        };
        assert_eq!(params.name.as_deref(), Some("Jon"));
        assert!(params.identifier.is_none());
        assert!(params.email.is_none());
    }

    #[test]
    fn empty_string_is_distinct_from_absent() {
        let json = r#"{"action":"add_or_update","params":{"name":"Jon","email":""}}"#;
        let Action::AddOrUpdate(params) = serde_json::from_str(json).unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(params.email.as_deref(), Some(""));
    }

    #[test]
    fn search_term_precedence() {
        let params = AddOrUpdateParams {
            identifier: Some("jsmith".into()),
            name: Some("Jon Smith".into()),
            email: Some("jon@acme.com".into()),
            ..Default::default()
        };
        assert_eq!(params.search_term(), Some("jsmith"));

        let params = AddOrUpdateParams {
            name: Some("Jon Smith".into()),
            email: Some("jon@acme.com".into()),
            ..Default::default()
        };
        assert_eq!(params.search_term(), Some("Jon Smith"));

        let params = AddOrUpdateParams {
            email: Some("jon@acme.com".into()),
            ..Default::default()
        };
        assert_eq!(params.search_term(), Some("jon@acme.com"));

        assert_eq!(AddOrUpdateParams::default().search_term(), None);
    }

    #[test]
    fn search_term_skips_empty_values() {
        let params = AddOrUpdateParams {
            identifier: Some(String::new()),
            name: Some("Jon".into()),
            ..Default::default()
        };
        assert_eq!(params.search_term(), Some("Jon"));
    }

    #[test]
    fn failure_result_skips_absent_fields() {
        let result = ActionResult::failure("nope");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "nope");
        assert!(json.get("action").is_none());
        assert!(json.get("contact").is_none());
        assert!(json.get("contactId").is_none());
    }

    #[test]
    fn deleted_result_uses_camel_case_contact_id() {
        let result = ActionResult::deleted(7, "Jon");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["action"], "delete");
        assert_eq!(json["contactId"], 7);
        assert_eq!(json["message"], "Deleted Jon");
    }

    #[test]
    fn answered_result_is_success_query() {
        let result = ActionResult::answered("You met Jon on Tuesday.");
        assert!(result.success);
        assert_eq!(result.action, Some(ActionKind::Query));
        assert_eq!(result.message, "You met Jon on Tuesday.");
    }
}
