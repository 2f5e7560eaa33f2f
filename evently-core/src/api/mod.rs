//! Backend access.
//!
//! `Backend` covers the calls made by the stateful components (session
//! bootstrap, calendar controller, notification panel). `ApiClient` is the
//! HTTP implementation; account operations that no component drives live
//! on `ApiClient` directly.

mod client;

pub use client::ApiClient;

use crate::error::EventlyResult;
use crate::event::{Event, EventPayload};
use crate::notification::Notification;
use crate::profile::UserProfile;
use crate::session::Session;

#[allow(async_fn_in_trait)]
pub trait Backend {
    /// GET /auth/profile
    async fn profile(&self, session: &Session) -> EventlyResult<UserProfile>;

    /// GET /events
    async fn list_events(&self, session: &Session) -> EventlyResult<Vec<Event>>;

    /// GET /events/search?query=
    async fn search_events(&self, session: &Session, query: &str) -> EventlyResult<Vec<Event>>;

    /// POST /events/create
    async fn create_event(&self, session: &Session, payload: &EventPayload) -> EventlyResult<Event>;

    /// PUT /events/update/:id
    async fn update_event(
        &self,
        session: &Session,
        id: &str,
        payload: &EventPayload,
    ) -> EventlyResult<Event>;

    /// DELETE /events/delete/:id
    async fn delete_event(&self, session: &Session, id: &str) -> EventlyResult<()>;

    /// GET /events/categories
    async fn categories(&self) -> EventlyResult<Vec<String>>;

    /// GET /notifications?userEmail=
    async fn notifications(&self, session: &Session) -> EventlyResult<Vec<Notification>>;

    /// GET /notifications/unread-count?userEmail=
    async fn unread_count(&self, session: &Session) -> EventlyResult<u64>;

    /// PATCH /notifications/:id/read
    async fn mark_read(&self, session: &Session, notification_id: &str) -> EventlyResult<()>;

    /// PATCH /notifications/events/:id/remove-participant
    async fn decline(&self, session: &Session, event_id: &str) -> EventlyResult<()>;
}
