//! Error taxonomy for the HTTP surface.
//!
//! Propagation policy: validation and not-found errors surface verbatim
//! to the caller; parser and gateway failures are absorbed into degraded
//! user-facing results before they ever reach this level; only truly
//! unexpected errors become [`ApiError::Internal`] and produce a generic
//! 500 with the detail logged server-side.

use thiserror::Error;

/// Required-field error for contact create/update.
pub const NAME_OR_EMAIL_REQUIRED: &str = "Either name or email is required";
/// Unknown contact ID.
pub const CONTACT_NOT_FOUND: &str = "Contact not found";
/// Missing `query` in an assistant request.
pub const QUERY_REQUIRED: &str = "Query is required";
/// Generic message for unexpected internal failures.
pub const PROCESSING_FAILED: &str = "Failed to process request";
/// Add/update action with no identifier, name, or email.
pub const NO_NAMES_OR_EMAILS: &str = "I couldn't find any names or emails in your message.";
/// Routing produced no usable actions.
pub const COULD_NOT_UNDERSTAND: &str = "I couldn't understand that request.";
/// Q&A gateway failure fallback answer.
pub const COULD_NOT_PROCESS_QUERY: &str = "I couldn't process that query.";

/// Errors surfaced by the REST handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// User input problem — maps to 400.
    #[error("{0}")]
    Validation(String),

    /// Unknown id or identifier — maps to 404.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected failure — maps to 500 with a generic message; the
    /// detail is logged, never sent to the client.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// The HTTP status code this error maps to.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }

    /// The message safe to return to the client.
    #[must_use]
    pub fn client_message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::NotFound(m) => m,
            Self::Internal(_) => PROCESSING_FAILED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400_verbatim() {
        let err = ApiError::Validation(NAME_OR_EMAIL_REQUIRED.into());
        assert_eq!(err.status(), 400);
        assert_eq!(err.client_message(), NAME_OR_EMAIL_REQUIRED);
    }

    #[test]
    fn not_found_maps_to_404_verbatim() {
        let err = ApiError::NotFound(CONTACT_NOT_FOUND.into());
        assert_eq!(err.status(), 404);
        assert_eq!(err.client_message(), CONTACT_NOT_FOUND);
    }

    #[test]
    fn internal_detail_stays_server_side() {
        let err = ApiError::Internal("db exploded at row 42".into());
        assert_eq!(err.status(), 500);
        assert_eq!(err.client_message(), PROCESSING_FAILED);
    }
}
