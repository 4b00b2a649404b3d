//! The authoritative in-memory contact store.
//!
//! A single mutex-guarded structure injected into handlers — never
//! ambient module state. All mutation is serialized through the lock,
//! and the lock is never held across an await: assistant execution works
//! on snapshots and applies results back through [`ContactStore::apply`].

use chrono::Utc;
use parking_lot::Mutex;
use rolo_core::errors::{CONTACT_NOT_FOUND, NAME_OR_EMAIL_REQUIRED};
use rolo_core::{ActionKind, ActionResult, ApiError, Contact};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Request body for contact create/update.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactPayload {
    /// Contact name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Company.
    pub company: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Free-form notes, stored under `metadata.userInput`.
    pub notes: Option<String>,
}

impl ContactPayload {
    /// Creation requires at least one of name/email to be non-empty.
    fn validate(&self) -> Result<(), ApiError> {
        let has = |f: &Option<String>| f.as_deref().is_some_and(|s| !s.is_empty());
        if has(&self.name) || has(&self.email) {
            Ok(())
        } else {
            Err(ApiError::Validation(NAME_OR_EMAIL_REQUIRED.into()))
        }
    }

    fn metadata(&self) -> Map<String, Value> {
        let mut metadata = Map::new();
        if let Some(notes) = self.notes.as_deref().filter(|n| !n.is_empty()) {
            let _ = metadata.insert("userInput".into(), Value::String(notes.into()));
        }
        metadata
    }
}

struct StoreInner {
    contacts: Vec<Contact>,
    next_id: u64,
}

/// Mutex-guarded owner of the canonical contact list.
pub struct ContactStore {
    inner: Mutex<StoreInner>,
}

impl ContactStore {
    /// Create an empty store whose first assigned ID is `initial_id`.
    #[must_use]
    pub fn new(initial_id: u64) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                contacts: Vec::new(),
                next_id: initial_id,
            }),
        }
    }

    /// All contacts in insertion order, optionally filtered by a
    /// case-insensitive substring search over name/email/company/phone.
    #[must_use]
    pub fn list(&self, search: Option<&str>) -> Vec<Contact> {
        let inner = self.inner.lock();
        match search.filter(|s| !s.is_empty()) {
            None => inner.contacts.clone(),
            Some(term) => {
                let term_lower = term.to_lowercase();
                inner
                    .contacts
                    .iter()
                    .filter(|c| c.matches_search(&term_lower))
                    .cloned()
                    .collect()
            }
        }
    }

    /// Create a contact from a REST payload.
    pub fn create(&self, payload: &ContactPayload) -> Result<Contact, ApiError> {
        payload.validate()?;
        let mut inner = self.inner.lock();
        let contact = Contact {
            id: inner.next_id,
            name: payload.name.clone().unwrap_or_default(),
            email: payload.email.clone().unwrap_or_default(),
            company: payload.company.clone().unwrap_or_default(),
            phone: payload.phone.clone().unwrap_or_default(),
            metadata: payload.metadata(),
            created_at: Utc::now(),
        };
        inner.next_id += 1;
        inner.contacts.push(contact.clone());
        debug!(id = contact.id, "contact created");
        Ok(contact)
    }

    /// Replace an existing contact's fields from a REST payload.
    ///
    /// PUT semantics: all four string fields and the metadata are
    /// replaced wholesale (absent body fields become empty); the ID and
    /// creation timestamp are preserved.
    pub fn update(&self, id: u64, payload: &ContactPayload) -> Result<Contact, ApiError> {
        payload.validate()?;
        let mut inner = self.inner.lock();
        let contact = inner
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ApiError::NotFound(CONTACT_NOT_FOUND.into()))?;

        contact.name = payload.name.clone().unwrap_or_default();
        contact.email = payload.email.clone().unwrap_or_default();
        contact.company = payload.company.clone().unwrap_or_default();
        contact.phone = payload.phone.clone().unwrap_or_default();
        contact.metadata = payload.metadata();
        debug!(id, "contact updated");
        Ok(contact.clone())
    }

    /// Remove a contact by ID.
    pub fn delete(&self, id: u64) -> Result<(), ApiError> {
        let mut inner = self.inner.lock();
        let index = inner
            .contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ApiError::NotFound(CONTACT_NOT_FOUND.into()))?;
        let _ = inner.contacts.remove(index);
        debug!(id, "contact deleted");
        Ok(())
    }

    /// A consistent copy of the contact list plus the next-available ID,
    /// for the executor to work against without holding the lock.
    #[must_use]
    pub fn snapshot(&self) -> (Vec<Contact>, u64) {
        let inner = self.inner.lock();
        (inner.contacts.clone(), inner.next_id)
    }

    /// Apply one executed action result to the canonical list.
    ///
    /// Add results advance the ID counter past the created contact;
    /// update/delete results locate their target by ID. Failed results
    /// and query results are no-ops.
    pub fn apply(&self, result: &ActionResult) {
        if !result.success {
            return;
        }
        let mut inner = self.inner.lock();
        match (result.action, &result.contact, result.contact_id) {
            (Some(ActionKind::Add), Some(contact), _) => {
                inner.next_id = inner.next_id.max(contact.id + 1);
                inner.contacts.push(contact.clone());
                debug!(id = contact.id, "assistant add applied");
            }
            (Some(ActionKind::Update), Some(contact), _) => {
                if let Some(existing) = inner.contacts.iter_mut().find(|c| c.id == contact.id) {
                    *existing = contact.clone();
                    debug!(id = contact.id, "assistant update applied");
                }
            }
            (Some(ActionKind::Delete), _, Some(id)) => {
                inner.contacts.retain(|c| c.id != id);
                debug!(id, "assistant delete applied");
            }
            _ => {}
        }
    }

    /// Number of stored contacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().contacts.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
