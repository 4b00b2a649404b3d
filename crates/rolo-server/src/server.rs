//! Router assembly and shared application state.

use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post, put};
use axum::{Json, Router};
use rolo_assistant::Assistant;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::assistant::handle_assistant;
use crate::contacts::{create_contact, delete_contact, list_contacts, update_contact};
use crate::store::ContactStore;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// The authoritative contact store.
    pub store: Arc<ContactStore>,
    /// The natural-language assistant.
    pub assistant: Arc<Assistant>,
    /// Process start, for the health report.
    pub start_time: Instant,
}

impl AppState {
    /// Bundle the store and assistant for handler injection.
    #[must_use]
    pub fn new(store: Arc<ContactStore>, assistant: Arc<Assistant>) -> Self {
        Self {
            store,
            assistant,
            start_time: Instant::now(),
        }
    }
}

/// `GET /health` — liveness plus basic stats.
async fn health(axum::extract::State(state): axum::extract::State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "contacts": state.store.len(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Build the application router with CORS and request tracing.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/{id}", put(update_contact).delete(delete_contact))
        .route("/assistant", post(handle_assistant))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
