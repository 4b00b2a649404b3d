//! # rolo-core
//!
//! Domain types shared across the Rolo contact assistant:
//!
//! - [`Contact`] — the canonical contact record owned by the store
//! - [`Action`] — a structured instruction derived from free text
//! - [`ActionResult`] — the outcome of executing one action
//! - [`errors`] — the error taxonomy mapped to HTTP responses
//!
//! These types define the wire format (camelCase JSON) used by both the
//! REST surface and the assistant routing pipeline.

#![deny(unsafe_code)]

pub mod action;
pub mod contact;
pub mod errors;

pub use action::{
    Action, ActionKind, ActionResult, AddOrUpdateParams, DeleteParams, ErrorParams, QueryParams,
};
pub use contact::Contact;
pub use errors::ApiError;
