use chrono::{DateTime, Utc};

use crate::event::Event;

/// The one overlay panel that may be open over the calendar.
///
/// The selected event or slot travels with the variant, so there is never
/// a selection without a panel or two panels at once.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Overlay {
    #[default]
    Closed,
    Create {
        slot_start: DateTime<Utc>,
    },
    Read(Event),
    Update(Event),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Closed,
    Create,
    Read,
    Update,
}

impl Overlay {
    pub fn kind(&self) -> OverlayKind {
        match self {
            Overlay::Closed => OverlayKind::Closed,
            Overlay::Create { .. } => OverlayKind::Create,
            Overlay::Read(_) => OverlayKind::Read,
            Overlay::Update(_) => OverlayKind::Update,
        }
    }

    pub fn selected_event(&self) -> Option<&Event> {
        match self {
            Overlay::Read(event) | Overlay::Update(event) => Some(event),
            _ => None,
        }
    }

    pub fn selected_slot_start(&self) -> Option<DateTime<Utc>> {
        match self {
            Overlay::Create { slot_start } => Some(*slot_start),
            _ => None,
        }
    }

    /// Whether the open panel shows the event with this id.
    pub fn references(&self, event_id: &str) -> bool {
        self.selected_event().is_some_and(|e| e.id == event_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Screen rectangle of a rendered panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}
