use anyhow::Result;
use dialoguer::Confirm;
use evently_core::calendar::CalendarController;

use super::finish;
use crate::context::App;

pub async fn run(app: &App, id: &str, yes: bool) -> Result<()> {
    let (session, _) = app.require_session().await?;
    let mut calendar = CalendarController::new();
    let result = calendar.load(&app.api, &session).await;
    finish(&mut calendar, result)?;

    calendar.select_event(id)?;
    if !yes {
        let title = calendar.event(id).map(|e| e.title.clone()).unwrap_or_default();
        let confirmed = Confirm::new()
            .with_prompt(format!("  Delete \"{title}\"?"))
            .default(false)
            .interact()?;
        if !confirmed {
            calendar.close();
            return Ok(());
        }
    }

    let result = calendar.delete(&app.api, &session, id).await;
    finish(&mut calendar, result)
}
