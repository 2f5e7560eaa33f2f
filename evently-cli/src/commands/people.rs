use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::context::App;

pub async fn run(app: &App, query: &str) -> Result<()> {
    let (session, _) = app.require_session().await?;
    let emails = app
        .api
        .suggest_participants(&session, query)
        .await
        .context("Failed to look up people")?;

    if emails.is_empty() {
        println!("{}", "No one found".dimmed());
    }
    for email in emails {
        println!("{email}");
    }
    Ok(())
}
