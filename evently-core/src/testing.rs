//! In-memory backend and fixtures for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{TimeZone, Utc};

use crate::api::Backend;
use crate::error::{EventlyError, EventlyResult};
use crate::event::{Event, EventPayload};
use crate::notification::Notification;
use crate::profile::UserProfile;
use crate::session::Session;

/// Build an unsigned JWT carrying `email` (and optionally `exp`).
pub fn token_for(email: &str, exp: Option<i64>) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = match exp {
        Some(exp) => serde_json::json!({ "email": email, "sub": "u1", "exp": exp }),
        None => serde_json::json!({ "email": email, "sub": "u1" }),
    };
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

pub fn session_for(email: &str) -> Session {
    Session::from_token(token_for(email, None)).unwrap()
}

/// The 15-minute standup created by a@x.com with b@x.com invited.
pub fn standup() -> Event {
    Event {
        id: "e1".into(),
        title: "Standup".into(),
        description: String::new(),
        category: "Meeting".into(),
        location: "Room 1".into(),
        start: Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 1, 10, 9, 15, 0).unwrap(),
        creator: "a@x.com".into(),
        participants: vec!["b@x.com".into()],
    }
}

#[derive(Default)]
struct MockState {
    events: Vec<Event>,
    notifications: Vec<Notification>,
    calls: Vec<&'static str>,
    search_queries: Vec<String>,
}

pub struct MockBackend {
    state: Mutex<MockState>,
    fail: AtomicBool,
    unauthorized: AtomicBool,
    next_id: AtomicU64,
    /// Simulated network latency for searches
    search_latency: Mutex<Duration>,
}

impl MockBackend {
    pub fn new() -> Self {
        MockBackend {
            state: Mutex::new(MockState::default()),
            fail: AtomicBool::new(false),
            unauthorized: AtomicBool::new(false),
            next_id: AtomicU64::new(100),
            search_latency: Mutex::new(Duration::ZERO),
        }
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        let backend = Self::new();
        backend.state.lock().unwrap().events = events;
        backend
    }

    pub fn add_event(&self, event: Event) {
        self.state.lock().unwrap().events.push(event);
    }

    pub fn add_notification(&self, notification: Notification) {
        self.state.lock().unwrap().notifications.push(notification);
    }

    pub fn event(&self, id: &str) -> Option<Event> {
        self.state.lock().unwrap().events.iter().find(|e| e.id == id).cloned()
    }

    /// Every request from now on fails with a server error.
    pub fn fail_requests(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn recover(&self) {
        self.fail.store(false, Ordering::SeqCst);
    }

    /// Every authenticated request from now on is rejected with 401.
    pub fn reject_token(&self) {
        self.unauthorized.store(true, Ordering::SeqCst);
    }

    pub fn set_search_latency(&self, latency: Duration) {
        *self.search_latency.lock().unwrap() = latency;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.state.lock().unwrap().search_queries.clone()
    }

    fn record(&self, call: &'static str) -> EventlyResult<()> {
        self.state.lock().unwrap().calls.push(call);
        if self.unauthorized.load(Ordering::SeqCst) {
            return Err(EventlyError::Unauthorized);
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(EventlyError::Server {
                status: 500,
                message: "Internal Server Error".into(),
            });
        }
        Ok(())
    }

    fn not_found(id: &str) -> EventlyError {
        EventlyError::Server { status: 404, message: format!("Event {id} not found") }
    }
}

impl Backend for MockBackend {
    async fn profile(&self, session: &Session) -> EventlyResult<UserProfile> {
        self.record("profile")?;
        Ok(UserProfile {
            email: session.email().to_string(),
            username: "tester".into(),
            picture: None,
            role: Some("user".into()),
        })
    }

    async fn list_events(&self, _session: &Session) -> EventlyResult<Vec<Event>> {
        self.record("list_events")?;
        Ok(self.state.lock().unwrap().events.clone())
    }

    async fn search_events(&self, _session: &Session, query: &str) -> EventlyResult<Vec<Event>> {
        self.record("search_events")?;
        self.state.lock().unwrap().search_queries.push(query.to_string());
        let latency = *self.search_latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let needle = query.to_lowercase();
        Ok(self
            .state
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|e| e.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn create_event(
        &self,
        session: &Session,
        payload: &EventPayload,
    ) -> EventlyResult<Event> {
        self.record("create_event")?;
        let id = format!("e{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let event = Event {
            id,
            title: payload.title.clone(),
            description: payload.description.clone(),
            category: payload.category.clone(),
            location: payload.location.clone(),
            start: payload.start_date,
            end: payload.end_date,
            creator: session.email().to_string(),
            participants: payload.participants.clone(),
        };
        self.state.lock().unwrap().events.push(event.clone());
        Ok(event)
    }

    async fn update_event(
        &self,
        _session: &Session,
        id: &str,
        payload: &EventPayload,
    ) -> EventlyResult<Event> {
        self.record("update_event")?;
        let mut state = self.state.lock().unwrap();
        let event = state
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        event.title = payload.title.clone();
        event.description = payload.description.clone();
        event.category = payload.category.clone();
        event.location = payload.location.clone();
        event.start = payload.start_date;
        event.end = payload.end_date;
        event.participants = payload.participants.clone();
        Ok(event.clone())
    }

    async fn delete_event(&self, _session: &Session, id: &str) -> EventlyResult<()> {
        self.record("delete_event")?;
        let mut state = self.state.lock().unwrap();
        let before = state.events.len();
        state.events.retain(|e| e.id != id);
        if state.events.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn categories(&self) -> EventlyResult<Vec<String>> {
        self.record("categories")?;
        Ok(vec!["Meeting".into(), "Workshop".into(), "Social".into()])
    }

    async fn notifications(&self, _session: &Session) -> EventlyResult<Vec<Notification>> {
        self.record("notifications")?;
        Ok(self.state.lock().unwrap().notifications.clone())
    }

    async fn unread_count(&self, _session: &Session) -> EventlyResult<u64> {
        self.record("unread_count")?;
        Ok(self.state.lock().unwrap().notifications.iter().filter(|n| !n.read).count() as u64)
    }

    async fn mark_read(&self, _session: &Session, notification_id: &str) -> EventlyResult<()> {
        self.record("mark_read")?;
        let mut state = self.state.lock().unwrap();
        if let Some(n) = state.notifications.iter_mut().find(|n| n.id == notification_id) {
            n.read = true;
        }
        Ok(())
    }

    async fn decline(&self, session: &Session, event_id: &str) -> EventlyResult<()> {
        self.record("decline")?;
        let mut state = self.state.lock().unwrap();
        let event = state
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| Self::not_found(event_id))?;
        event.participants.retain(|p| p != session.email());
        Ok(())
    }
}
