//! The canonical contact record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored contact.
///
/// Owned exclusively by the contact store; the executor only ever sees
/// per-call copies or borrows and must not assume they persist. IDs are
/// monotonically increasing integers assigned by the store at creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Store-assigned unique ID.
    pub id: u64,
    /// Display name (may be empty when the contact was created by email).
    #[serde(default)]
    pub name: String,
    /// Email address (may be empty when the contact was created by name).
    #[serde(default)]
    pub email: String,
    /// Company, empty when unknown.
    #[serde(default)]
    pub company: String,
    /// Phone number, empty when unknown.
    #[serde(default)]
    pub phone: String,
    /// Free-form metadata (e.g. `userInput` notes from the REST surface).
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Server timestamp assigned at creation.
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// The human-facing label for this contact: name if present, else email.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.email
        } else {
            &self.name
        }
    }

    /// Case-insensitive substring match across name, email, company, and phone.
    ///
    /// Used by `GET /contacts?search=`. The term is expected to be
    /// lowercased by the caller once per request.
    #[must_use]
    pub fn matches_search(&self, term_lower: &str) -> bool {
        self.name.to_lowercase().contains(term_lower)
            || self.email.to_lowercase().contains(term_lower)
            || self.company.to_lowercase().contains(term_lower)
            || self.phone.to_lowercase().contains(term_lower)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, email: &str) -> Contact {
        Contact {
            id: 1,
            name: name.into(),
            email: email.into(),
            company: "Acme".into(),
            phone: "555-0100".into(),
            metadata: Map::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn label_prefers_name() {
        let c = contact("Jon Smith", "jon@acme.com");
        assert_eq!(c.label(), "Jon Smith");
    }

    #[test]
    fn label_falls_back_to_email() {
        let c = contact("", "jon@acme.com");
        assert_eq!(c.label(), "jon@acme.com");
    }

    #[test]
    fn search_matches_name_case_insensitive() {
        let c = contact("Jon Smith", "jon@acme.com");
        assert!(c.matches_search("jon sm"));
    }

    #[test]
    fn search_matches_company_and_phone() {
        let c = contact("Jon Smith", "jon@acme.com");
        assert!(c.matches_search("acme"));
        assert!(c.matches_search("555"));
    }

    #[test]
    fn search_miss() {
        let c = contact("Jon Smith", "jon@acme.com");
        assert!(!c.matches_search("beatrice"));
    }

    #[test]
    fn serializes_camel_case() {
        let c = contact("Jon", "jon@acme.com");
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let json = r#"{"id":3,"name":"Ada","createdAt":"2024-01-15T12:00:00Z"}"#;
        let c: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(c.id, 3);
        assert_eq!(c.email, "");
        assert!(c.metadata.is_empty());
    }
}
