use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use dialoguer::Select;
use evently_core::calendar::CalendarController;
use evently_core::event::EventDraft;
use owo_colors::OwoColorize;

use super::finish;
use crate::context::App;
use crate::utils::tui::{print_error, prompt, prompt_optional};
use crate::when::{apply_duration, default_end, parse_datetime, parse_end};

pub struct NewArgs {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub participants: Option<String>,
}

pub async fn run(app: &App, args: NewArgs) -> Result<()> {
    let (session, _) = app.require_session().await?;
    let categories = app.categories().await?;
    let interactive = args.title.is_none() || args.start.is_none();

    // --- Title ---
    let title = match args.title {
        Some(t) => t,
        None => prompt("Title")?,
    };

    // --- Start ---
    let start = match args.start {
        Some(s) => parse_datetime(&s)?,
        None => prompt_with_retry("When?", parse_datetime)?,
    };

    // --- Duration / End ---
    let end = if let Some(end_input) = args.end {
        parse_end(&end_input, start)?
    } else if let Some(dur_input) = args.duration {
        apply_duration(start, &dur_input)?
    } else if interactive {
        prompt_duration(start)?
    } else {
        default_end(start)
    };

    // --- Category ---
    let category = match args.category {
        Some(c) => c,
        None if categories.len() == 1 => categories[0].clone(),
        None if interactive && !categories.is_empty() => {
            let selection = Select::new()
                .with_prompt("  Category")
                .items(&categories)
                .default(0)
                .interact()?;
            categories[selection].clone()
        }
        None => String::new(),
    };

    // --- Location / Description / Participants ---
    let location = match args.location {
        Some(l) => l,
        None if interactive => prompt("Where?")?,
        None => String::new(),
    };
    let description = match args.description {
        Some(d) => d,
        None if interactive => prompt_optional("Description")?,
        None => String::new(),
    };
    let participants = match args.participants {
        Some(p) => p,
        None if interactive => prompt("Who? (comma-separated emails)")?,
        None => String::new(),
    };

    let mut calendar = CalendarController::new();
    calendar.select_slot(start);

    let draft = EventDraft {
        title,
        description,
        category,
        location,
        start,
        end,
        participants,
    };
    let result = calendar.create(&app.api, &session, &draft, &categories, Local::now()).await;
    let event = finish(&mut calendar, result)?;

    println!("  {}", format!("evently show {}", event.id).dimmed());
    Ok(())
}

/// Prompt the user with retry on parse errors.
fn prompt_with_retry<F>(label: &str, parse: F) -> Result<DateTime<Utc>>
where
    F: Fn(&str) -> Result<DateTime<Utc>>,
{
    loop {
        let input = prompt(label)?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => print_error(&e.to_string()),
        }
    }
}

/// Prompt for duration/end with retry on parse errors.
fn prompt_duration(start: DateTime<Utc>) -> Result<DateTime<Utc>> {
    loop {
        let input = prompt_optional("How long? (1 hour)")?;
        if input.is_empty() {
            return Ok(default_end(start));
        }
        match parse_end(&input, start) {
            Ok(result) => return Ok(result),
            Err(e) => print_error(&e.to_string()),
        }
    }
}
