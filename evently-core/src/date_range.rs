//! Visible calendar range.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::event::Event;
use crate::validation::{day_start, midnight_in};

/// Days shown ahead of today when no end is given.
pub const DEFAULT_VIEW_DAYS: i64 = 30;

/// Date range for filtering events.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Default view: from the start of today for DEFAULT_VIEW_DAYS.
    pub fn upcoming<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let from = day_start(now);
        DateRange {
            from: Some(from),
            to: Some(from + Duration::days(DEFAULT_VIEW_DAYS)),
        }
    }

    /// Build a range from command-line arguments.
    /// - `from`: "start" for unbounded, or YYYY-MM-DD (defaults to today)
    /// - `to`: YYYY-MM-DD, inclusive (defaults to DEFAULT_VIEW_DAYS after `from`)
    ///
    /// Days begin at midnight in `now`'s time zone.
    pub fn from_args<Tz: TimeZone>(
        from: Option<&str>,
        to: Option<&str>,
        now: &DateTime<Tz>,
    ) -> Result<Self, String> {
        let tz = now.timezone();
        let from_dt = match from {
            Some("start") => None,
            Some(s) => Some(midnight_in(parse_date(s)?, &tz)),
            None => Some(day_start(now)),
        };

        let to_dt = match to {
            Some(s) => Some(midnight_in(parse_date(s)? + Duration::days(1), &tz)),
            None => {
                let start = from_dt.unwrap_or_else(|| day_start(now));
                Some(start + Duration::days(DEFAULT_VIEW_DAYS))
            }
        };

        if let (Some(f), Some(t)) = (from_dt, to_dt) {
            if t <= f {
                return Err("--to must not be before --from".to_string());
            }
        }

        Ok(DateRange {
            from: from_dt,
            to: to_dt,
        })
    }

    pub fn contains(&self, event: &Event) -> bool {
        let after_from = self.from.is_none_or(|from| event.end > from);
        let before_to = self.to.is_none_or(|to| event.start < to);
        after_from && before_to
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}
