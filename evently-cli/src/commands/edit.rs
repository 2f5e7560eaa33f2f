use anyhow::Result;
use chrono::Local;
use evently_core::calendar::CalendarController;
use evently_core::event::EventDraft;
use evently_core::error::EventlyError;

use super::finish;
use crate::context::App;
use crate::when::{parse_datetime, parse_end};

pub struct EditArgs {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub participants: Option<String>,
}

pub async fn run(app: &App, id: &str, args: EditArgs) -> Result<()> {
    let (session, _) = app.require_session().await?;
    let categories = app.categories().await?;
    let mut calendar = CalendarController::new();
    let result = calendar.load(&app.api, &session).await;
    finish(&mut calendar, result)?;

    calendar.select_event(id)?;
    match calendar.begin_edit(&session) {
        Ok(()) => {}
        Err(EventlyError::NotCreator) => {
            let title = calendar.event(id).map(|e| e.title.as_str()).unwrap_or(id);
            anyhow::bail!("Only the creator of \"{title}\" can edit it");
        }
        Err(e) => return Err(e.into()),
    }

    let Some(selected) = calendar.overlay().selected_event() else {
        anyhow::bail!("Event {id} is not open for editing");
    };
    let mut draft = EventDraft::from_event(selected);
    let length = selected.duration();

    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(start) = args.start {
        draft.start = parse_datetime(&start)?;
        draft.end = draft.start + length;
    }
    if let Some(end) = args.end {
        draft.end = parse_end(&end, draft.start)?;
    }
    if let Some(category) = args.category {
        draft.category = category;
    }
    if let Some(location) = args.location {
        draft.location = location;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(participants) = args.participants {
        draft.participants = participants;
    }

    let result = calendar.update(&app.api, &session, &draft, &categories, Local::now()).await;
    finish(&mut calendar, result)?;
    Ok(())
}
