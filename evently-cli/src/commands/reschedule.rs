use anyhow::Result;
use chrono::Local;
use evently_core::calendar::CalendarController;
use owo_colors::OwoColorize;

use super::finish;
use crate::context::App;
use crate::render::{format_date_label, format_time};
use crate::when::{parse_datetime, parse_end};

pub async fn run(app: &App, id: &str, start: &str, end: Option<&str>) -> Result<()> {
    let (session, _) = app.require_session().await?;
    let mut calendar = CalendarController::new();
    let result = calendar.load(&app.api, &session).await;
    finish(&mut calendar, result)?;

    let Some(event) = calendar.event(id) else {
        anyhow::bail!("Event not found: {id}");
    };
    let length = event.duration();

    let new_start = parse_datetime(start)?;
    let new_end = match end {
        Some(e) => parse_end(e, new_start)?,
        None => new_start + length,
    };

    let result = calendar
        .reschedule(&app.api, &session, id, new_start, new_end, Local::now())
        .await;
    let moved = finish(&mut calendar, result)?;

    println!(
        "{}",
        format!(
            "  Moved \"{}\" to {} {}",
            moved.title,
            format_date_label(moved.start),
            format_time(moved.start).trim()
        )
        .green()
    );
    Ok(())
}
