use anyhow::Result;
use chrono::Local;
use evently_core::calendar::CalendarController;
use evently_core::date_range::DateRange;
use evently_core::search::{SearchDebouncer, SearchOutcome};
use owo_colors::OwoColorize;

use super::finish;
use crate::context::App;
use crate::render::render_agenda;
use crate::utils::tui::create_spinner;

pub async fn run(
    app: &App,
    from: Option<&str>,
    to: Option<&str>,
    search: Option<&str>,
) -> Result<()> {
    let range = DateRange::from_args(from, to, &Local::now()).map_err(|e| anyhow::anyhow!(e))?;
    let (session, _) = app.require_session().await?;
    let mut calendar = CalendarController::new();

    let spinner = create_spinner("Fetching events");
    match search {
        Some(query) => {
            let debouncer = SearchDebouncer::new(app.config.search_debounce());
            let outcome = debouncer.search(&app.api, &session, query).await;
            spinner.finish_and_clear();
            if let SearchOutcome::Results(events) = outcome? {
                calendar.apply_search_results(events);
            }
        }
        None => {
            let result = calendar.load(&app.api, &session).await;
            spinner.finish_and_clear();
            finish(&mut calendar, result)?;
        }
    }

    let events = calendar.events_in(&range);
    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    println!("{}", render_agenda(events));
    Ok(())
}
