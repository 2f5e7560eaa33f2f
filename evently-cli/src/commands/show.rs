use anyhow::Result;
use evently_core::calendar::CalendarController;

use super::finish;
use crate::context::App;
use crate::render::render_event_detail;

pub async fn run(app: &App, id: &str) -> Result<()> {
    let (session, _) = app.require_session().await?;
    let mut calendar = CalendarController::new();
    let result = calendar.load(&app.api, &session).await;
    finish(&mut calendar, result)?;

    calendar.select_event(id)?;
    if let Some(event) = calendar.overlay().selected_event() {
        let controls = calendar.controls_for(&event.id, session.email());
        println!("{}", render_event_detail(event, controls));
    }
    Ok(())
}
