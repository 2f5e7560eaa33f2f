//! Calendar view state: the event list, the open overlay, and the
//! mutations that keep both in step with the backend.
//!
//! Every failed call pushes an error notice and leaves the previous state
//! in place. Rescheduling is the one optimistic path: the new times are
//! applied before the server answers and reverted if it fails.

mod notice;
mod overlay;

pub use notice::{Notice, NoticeLevel};
pub use overlay::{Bounds, Overlay, OverlayKind, Point};

use chrono::{DateTime, TimeZone, Utc};

use crate::api::Backend;
use crate::date_range::DateRange;
use crate::error::{EventlyError, EventlyResult};
use crate::event::{Event, EventDraft, EventPayload};
use crate::session::Session;
use crate::validation::{Field, ValidationErrors, is_past, validate_event};

/// Which controls the read panel offers a given viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventControls {
    pub edit: bool,
    pub delete: bool,
}

#[derive(Debug, Default)]
pub struct CalendarController {
    events: Vec<Event>,
    overlay: Overlay,
    notices: Vec<Notice>,
}

impl CalendarController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        CalendarController {
            events,
            ..Self::default()
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events overlapping the visible range, ordered by start.
    pub fn events_in(&self, range: &DateRange) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.iter().filter(|e| range.contains(e)).collect();
        events.sort_by_key(|e| e.start);
        events
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.notices.push(Notice::error(message));
    }

    // LOADING:

    /// Replace the event list with the backend's. On failure the current list is kept.
    pub async fn load<B: Backend>(&mut self, backend: &B, session: &Session) -> EventlyResult<()> {
        match backend.list_events(session).await {
            Ok(events) => {
                tracing::debug!(count = events.len(), "loaded events");
                self.events = events;
                Ok(())
            }
            Err(e) => {
                self.notify_error(format!("Failed to fetch events: {e}"));
                Err(e)
            }
        }
    }

    /// Replace the event list with (already fresh) search results.
    pub fn apply_search_results(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    // OVERLAY TRANSITIONS:

    /// An empty slot was selected: open the create panel for it.
    pub fn select_slot(&mut self, start: DateTime<Utc>) {
        self.overlay = Overlay::Create { slot_start: start };
    }

    /// An existing event was selected: open its read panel.
    pub fn select_event(&mut self, id: &str) -> EventlyResult<()> {
        let event = self
            .event(id)
            .cloned()
            .ok_or_else(|| EventlyError::EventNotFound(id.to_string()))?;
        self.overlay = Overlay::Read(event);
        Ok(())
    }

    /// A pointer press landed somewhere. Closes the read panel when the
    /// press is outside its bounds; other panels close only via cancel or submit.
    pub fn pointer_down(&mut self, point: Point, panel: Bounds) {
        if matches!(self.overlay, Overlay::Read(_)) && !panel.contains(point) {
            self.overlay = Overlay::Closed;
        }
    }

    /// Switch the read panel to the update panel. Creator only.
    pub fn begin_edit(&mut self, session: &Session) -> EventlyResult<()> {
        let Overlay::Read(event) = &self.overlay else {
            return Err(EventlyError::NoOverlay("read"));
        };
        if !event.is_created_by(session.email()) {
            return Err(EventlyError::NotCreator);
        }
        self.overlay = Overlay::Update(event.clone());
        Ok(())
    }

    /// Close the create or update panel without saving.
    pub fn cancel(&mut self) {
        if matches!(self.overlay, Overlay::Create { .. } | Overlay::Update(_)) {
            self.overlay = Overlay::Closed;
        }
    }

    /// Close whatever panel is open.
    pub fn close(&mut self) {
        self.overlay = Overlay::Closed;
    }

    pub fn controls_for(&self, id: &str, viewer: &str) -> EventControls {
        match self.event(id) {
            Some(event) if event.is_created_by(viewer) => EventControls {
                edit: true,
                delete: true,
            },
            _ => EventControls::default(),
        }
    }

    // MUTATIONS:

    /// Submit the create panel. The server's event is appended and the panel closes.
    pub async fn create<B: Backend, Tz: TimeZone>(
        &mut self,
        backend: &B,
        session: &Session,
        draft: &EventDraft,
        categories: &[String],
        now: DateTime<Tz>,
    ) -> EventlyResult<Event> {
        if !matches!(self.overlay, Overlay::Create { .. }) {
            return Err(EventlyError::NoOverlay("create"));
        }
        let payload = validate_event(draft, categories, now)?;

        match backend.create_event(session, &payload).await {
            Ok(created) => {
                tracing::debug!(id = %created.id, "created event");
                self.events.push(created.clone());
                self.overlay = Overlay::Closed;
                self.notices.push(Notice::success(format!("Created \"{}\"", created.title)));
                Ok(created)
            }
            Err(e) => {
                self.notify_error(format!("Failed to create event: {e}"));
                Err(e)
            }
        }
    }

    /// Submit the update panel. The matching event is replaced in place.
    pub async fn update<B: Backend, Tz: TimeZone>(
        &mut self,
        backend: &B,
        session: &Session,
        draft: &EventDraft,
        categories: &[String],
        now: DateTime<Tz>,
    ) -> EventlyResult<Event> {
        let Overlay::Update(selected) = &self.overlay else {
            return Err(EventlyError::NoOverlay("update"));
        };
        if !selected.is_created_by(session.email()) {
            return Err(EventlyError::NotCreator);
        }
        let id = selected.id.clone();
        let payload = validate_event(draft, categories, now)?;

        match backend.update_event(session, &id, &payload).await {
            Ok(updated) => {
                self.replace(&id, updated.clone());
                self.overlay = Overlay::Closed;
                self.notices.push(Notice::success(format!("Updated \"{}\"", updated.title)));
                Ok(updated)
            }
            Err(e) => {
                self.notify_error(format!("Failed to update event: {e}"));
                Err(e)
            }
        }
    }

    /// Delete an event. Creator only. Removes exactly that id and closes
    /// any panel showing it.
    pub async fn delete<B: Backend>(
        &mut self,
        backend: &B,
        session: &Session,
        id: &str,
    ) -> EventlyResult<()> {
        let event = self
            .event(id)
            .ok_or_else(|| EventlyError::EventNotFound(id.to_string()))?;
        if !event.is_created_by(session.email()) {
            self.notify_error("Only the creator can delete this event");
            return Err(EventlyError::NotCreator);
        }

        match backend.delete_event(session, id).await {
            Ok(()) => {
                self.events.retain(|e| e.id != id);
                if self.overlay.references(id) {
                    self.overlay = Overlay::Closed;
                }
                self.notices.push(Notice::success("Event deleted"));
                Ok(())
            }
            Err(e) => {
                self.notify_error(format!("Failed to delete event: {e}"));
                Err(e)
            }
        }
    }

    /// Drag-and-drop rescheduling.
    ///
    /// Rejected without any change when the viewer is not the creator, the
    /// new start is before today, or the new end is not after the new
    /// start. Otherwise the new times are applied at once and persisted;
    /// a failed call restores the previous event.
    pub async fn reschedule<B: Backend, Tz: TimeZone>(
        &mut self,
        backend: &B,
        session: &Session,
        id: &str,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
        now: DateTime<Tz>,
    ) -> EventlyResult<Event> {
        let Some(index) = self.events.iter().position(|e| e.id == id) else {
            return Err(EventlyError::EventNotFound(id.to_string()));
        };

        if !self.events[index].is_created_by(session.email()) {
            self.notify_error("Only the creator can move this event");
            return Err(EventlyError::NotCreator);
        }
        if is_past(new_start, &now) {
            self.notify_error("Cannot move an event to a past date");
            return Err(EventlyError::PastDate);
        }
        if new_end <= new_start {
            let mut errors = ValidationErrors::default();
            errors.insert(Field::EndDate, "End date should be after start date");
            self.notify_error("End date should be after start date");
            return Err(errors.into());
        }

        let previous = self.events[index].clone();
        let mut moved = previous.clone();
        moved.start = new_start;
        moved.end = new_end;
        self.replace(id, moved.clone());

        match backend.update_event(session, id, &EventPayload::from(&moved)).await {
            Ok(saved) => {
                tracing::debug!(id, start = %saved.start, "rescheduled event");
                self.replace(id, saved.clone());
                Ok(saved)
            }
            Err(e) => {
                self.replace(id, previous);
                self.notify_error(format!("Failed to move event: {e}"));
                Err(e)
            }
        }
    }

    /// Swap in a new version of an event, including in the open panel.
    fn replace(&mut self, id: &str, event: Event) {
        if let Some(slot) = self.events.iter_mut().find(|e| e.id == id) {
            *slot = event.clone();
        }
        match &mut self.overlay {
            Overlay::Read(selected) | Overlay::Update(selected) if selected.id == id => {
                *selected = event;
            }
            _ => {}
        }
    }
}
