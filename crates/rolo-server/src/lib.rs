//! HTTP surface for the contact backend.
//!
//! Exposes contact CRUD, the free-text assistant endpoint, and a health
//! probe over an axum router. State is a mutex-guarded contact store plus
//! the assistant, shared via [`AppState`].

pub mod assistant;
pub mod contacts;
pub mod errors;
pub mod server;
pub mod store;

pub use errors::ApiFailure;
pub use server::{build_router, AppState};
pub use store::{ContactPayload, ContactStore};
