pub mod auth;
pub mod categories;
pub mod delete;
pub mod edit;
pub mod events;
pub mod history;
pub mod new;
pub mod notifications;
pub mod people;
pub mod profile;
pub mod reschedule;
pub mod show;

use anyhow::Result;
use evently_core::calendar::CalendarController;
use evently_core::error::{EventlyError, EventlyResult};

use crate::render::Render;

/// Print the calendar's success notices and turn a failed result into a CLI error.
/// Error notices are not printed: the returned error carries the same message.
pub fn finish<T>(calendar: &mut CalendarController, result: EventlyResult<T>) -> Result<T> {
    for notice in calendar.take_notices() {
        if !notice.is_error() {
            println!("{}", notice.render());
        }
    }

    match result {
        Ok(value) => Ok(value),
        Err(EventlyError::Validation(errors)) => {
            eprintln!("{}", errors.render());
            anyhow::bail!("Event not saved")
        }
        Err(e) => Err(e.into()),
    }
}
