//! Client core for the Evently event scheduler.
//!
//! This crate holds everything a front end needs besides rendering:
//! - `session` for token persistence and session bootstrap
//! - `api` for the REST backend (`Backend` trait, `ApiClient`)
//! - `calendar` for the event list, overlay state machine and mutations
//! - `notification` for the notification panel
//! - `search` for debounced, stale-safe search
//! - `validation` for form rules

pub mod api;
pub mod calendar;
pub mod config;
pub mod date_range;
pub mod error;
pub mod event;
pub mod notification;
pub mod profile;
pub mod search;
pub mod session;
pub mod validation;

#[cfg(test)]
mod testing;

pub use error::{EventlyError, EventlyResult};
pub use event::{Event, EventDraft, EventPayload};
