//! REST handlers for the contact collection.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rolo_core::Contact;
use serde::Deserialize;
use tracing::info;

use crate::errors::ApiFailure;
use crate::server::AppState;
use crate::store::ContactPayload;

/// Query string for `GET /contacts`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    /// Case-insensitive substring filter over name/email/company/phone.
    pub search: Option<String>,
}

/// `GET /contacts` — list all contacts, optionally filtered.
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Contact>> {
    Json(state.store.list(query.search.as_deref()))
}

/// `POST /contacts` — create a contact.
pub async fn create_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactPayload>,
) -> Result<(StatusCode, Json<Contact>), ApiFailure> {
    let contact = state.store.create(&payload)?;
    info!(id = contact.id, "contact created via rest");
    Ok((StatusCode::CREATED, Json(contact)))
}

/// `PUT /contacts/{id}` — full replace of a contact's fields.
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<ContactPayload>,
) -> Result<Json<Contact>, ApiFailure> {
    let contact = state.store.update(id, &payload)?;
    info!(id, "contact updated via rest");
    Ok(Json(contact))
}

/// `DELETE /contacts/{id}` — remove a contact.
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiFailure> {
    state.store.delete(id)?;
    info!(id, "contact deleted via rest");
    Ok(StatusCode::NO_CONTENT)
}
