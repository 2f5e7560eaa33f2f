//! TUI rendering for evently types.
//!
//! Extension traits that add colored terminal output to evently-core types
//! using owo_colors. Times are shown in the local time zone.

use chrono::{DateTime, Local, Utc};
use evently_core::calendar::{EventControls, Notice, NoticeLevel};
use evently_core::event::Event;
use evently_core::notification::Notification;
use evently_core::profile::UserProfile;
use evently_core::validation::ValidationErrors;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            format_time(self.start),
            self.title,
            format!("[{}]", self.id).dimmed()
        )
    }
}

impl Render for Notice {
    fn render(&self) -> String {
        match self.level {
            NoticeLevel::Success => format!("  {}", self.message.green()),
            NoticeLevel::Error => format!("  {}", self.message.red()),
        }
    }
}

impl Render for Notification {
    fn render(&self) -> String {
        let marker = if self.read {
            " ".to_string()
        } else {
            "●".blue().to_string()
        };
        let event = self
            .event_id
            .as_deref()
            .map(|id| format!(" (event {id})").dimmed().to_string())
            .unwrap_or_default();
        let id = format!("[{}]", self.id).dimmed().to_string();
        let line = format!("{} {}{} {}", marker, self.message, event, id);
        if self.read {
            line.dimmed().to_string()
        } else {
            line
        }
    }
}

impl Render for ValidationErrors {
    fn render(&self) -> String {
        self.iter()
            .map(|(field, message)| format!("  {} {}", format!("{field}:").bold(), message.red()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Render for UserProfile {
    fn render(&self) -> String {
        let mut lines = vec![
            format!("{}", self.username.bold()),
            format!("  {}", self.email),
        ];
        if let Some(role) = &self.role {
            lines.push(format!("  {}", role.dimmed()));
        }
        lines.join("\n")
    }
}

/// Read-detail panel for one event, with the controls the viewer may use.
pub fn render_event_detail(event: &Event, controls: EventControls) -> String {
    let mut lines = vec![
        format!("{}", event.title.bold()),
        format!(
            "  {} {} – {}",
            format_date_label(event.start),
            format_time(event.start).trim(),
            format_time(event.end).trim()
        ),
    ];

    if !event.category.is_empty() {
        lines.push(format!("  {} {}", "Category:".dimmed(), event.category));
    }
    if !event.location.is_empty() {
        lines.push(format!("  {} {}", "Where:".dimmed(), event.location));
    }
    if !event.description.is_empty() {
        lines.push(String::new());
        lines.extend(event.description.lines().map(|l| format!("  {l}")));
        lines.push(String::new());
    }
    lines.push(format!("  {} {}", "Created by:".dimmed(), event.creator));
    if !event.participants.is_empty() {
        lines.push(format!("  {} {}", "Participants:".dimmed(), event.participants.join(", ")));
    }

    let mut actions = Vec::new();
    if controls.edit {
        actions.push(format!("evently edit {}", event.id));
    }
    if controls.delete {
        actions.push(format!("evently delete {}", event.id));
    }
    if !actions.is_empty() {
        lines.push(String::new());
        lines.push(format!("  {}", actions.join("  |  ").dimmed()));
    }

    lines.join("\n")
}

/// Events grouped under day headings, assumed sorted by start.
pub fn render_agenda<'a>(events: impl IntoIterator<Item = &'a Event>) -> String {
    let mut lines = Vec::new();
    let mut current_date: Option<String> = None;

    for event in events {
        let date_label = format_date_label(event.start);
        if current_date.as_ref() != Some(&date_label) {
            if current_date.is_some() {
                lines.push(String::new());
            }
            lines.push(date_label.bold().to_string());
            current_date = Some(date_label);
        }
        lines.push(format!("  {}", event.render()));
    }

    lines.join("\n")
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn format_date_label(time: DateTime<Utc>) -> String {
    let today = Local::now().date_naive();
    let date = time.with_timezone(&Local).date_naive();

    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d %Y").to_string(),
    }
}

/// Format the time of day, right-aligned (e.g. "  15:00")
pub fn format_time(time: DateTime<Utc>) -> String {
    format!("{:>7}", time.with_timezone(&Local).format("%H:%M"))
}
