use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::context::App;
use crate::render::{format_date_label, format_time};

pub async fn run(app: &App) -> Result<()> {
    let (session, _) = app.require_session().await?;
    let mut events = app
        .api
        .past_participation(&session)
        .await
        .context("Failed to fetch participation history")?;

    if events.is_empty() {
        println!("{}", "No past events".dimmed());
        return Ok(());
    }

    events.sort_by_key(|e| std::cmp::Reverse(e.start));
    for event in &events {
        println!(
            "{} {} {} {}",
            format_date_label(event.start).bold(),
            format_time(event.start).trim(),
            event.title,
            format!("[{} · {}]", event.category, event.creator).dimmed()
        );
    }
    Ok(())
}
