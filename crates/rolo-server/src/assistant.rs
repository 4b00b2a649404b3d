//! The free-text assistant endpoint.
//!
//! Routes the incoming query into structured actions, then executes
//! them sequentially: each action sees a snapshot that includes the
//! effects of the actions before it. The store lock is never held
//! across the gateway await, so per-action application is atomic but
//! two concurrent requests may interleave at batch granularity.

use axum::extract::State;
use axum::Json;
use rolo_core::errors::{COULD_NOT_UNDERSTAND, QUERY_REQUIRED};
use rolo_core::{ActionResult, ApiError};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::ApiFailure;
use crate::server::AppState;

/// Request body for `POST /assistant`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssistantRequest {
    /// The free-text command or question.
    pub query: Option<String>,
}

/// `POST /assistant` — interpret and apply a free-text command.
pub async fn handle_assistant(
    State(state): State<AppState>,
    Json(request): Json<AssistantRequest>,
) -> Result<Json<Value>, ApiFailure> {
    let query = request
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::Validation(QUERY_REQUIRED.into()))?;

    info!(query_len = query.len(), "assistant query received");
    let actions = state.assistant.route(query).await;
    if actions.is_empty() {
        return Ok(Json(json!({
            "success": false,
            "message": COULD_NOT_UNDERSTAND,
        })));
    }

    let mut results: Vec<ActionResult> = Vec::with_capacity(actions.len());
    for action in &actions {
        let (contacts, next_id) = state.store.snapshot();
        let result = state.assistant.execute(action, &contacts, next_id).await;
        if result.success {
            state.store.apply(&result);
        } else {
            warn!(message = %result.message, "assistant action failed");
        }
        results.push(result);
    }

    if results.len() == 1 {
        let only = results.remove(0);
        return Ok(Json(serde_json::to_value(only).map_err(|e| {
            ApiError::Internal(format!("result serialization failed: {e}"))
        })?));
    }

    let message = results
        .iter()
        .map(|r| r.message.as_str())
        .collect::<Vec<_>>()
        .join(". ");
    Ok(Json(json!({
        "success": true,
        "message": message,
        "results": results,
    })))
}
