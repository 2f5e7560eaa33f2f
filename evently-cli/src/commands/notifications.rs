use anyhow::{Context, Result};
use evently_core::notification::NotificationPanel;
use owo_colors::OwoColorize;

use crate::context::App;
use crate::render::Render;

pub async fn run(app: &App, ack: Option<&str>, decline: Option<&str>) -> Result<()> {
    let (session, _) = app.require_session().await?;
    let mut panel = NotificationPanel::new();

    if let Some(id) = ack {
        panel
            .acknowledge(&app.api, &session, id)
            .await
            .context("Failed to mark notification as read")?;
    } else if let Some(event_id) = decline {
        panel
            .decline(&app.api, &session, event_id)
            .await
            .context("Failed to decline participation")?;
        println!("{}", "  Invitation declined".green());
    } else {
        panel
            .refresh(&app.api, &session)
            .await
            .context("Failed to fetch notifications")?;
    }

    let unread = panel.unread_count();
    let heading = match unread {
        0 => "No unread notifications".to_string(),
        1 => "1 unread notification".to_string(),
        n => format!("{n} unread notifications"),
    };
    println!("{}", heading.bold());

    for notification in panel.notifications() {
        println!("  {}", notification.render());
    }
    Ok(())
}
