//! Parsing of user-typed dates, times and durations.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Time used when the input names a day but no time of day.
const DEFAULT_HOUR: u32 = 9;

/// Expand common abbreviations that fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    let abbrevs = [
        ("mon", "monday"),
        ("tue", "tuesday"),
        ("tues", "tuesday"),
        ("wed", "wednesday"),
        ("thu", "thursday"),
        ("thur", "thursday"),
        ("thurs", "thursday"),
        ("fri", "friday"),
        ("sat", "saturday"),
        ("sun", "sunday"),
        ("jan", "january"),
        ("feb", "february"),
        ("mar", "march"),
        ("apr", "april"),
        ("jun", "june"),
        ("jul", "july"),
        ("aug", "august"),
        ("sep", "september"),
        ("sept", "september"),
        ("oct", "october"),
        ("nov", "november"),
        ("dec", "december"),
    ];

    lower_words(input)
        .map(|word| {
            abbrevs
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map(|(_, full)| full.to_string())
                .unwrap_or(word)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn lower_words(input: &str) -> impl Iterator<Item = String> + '_ {
    input.split_whitespace().map(str::to_lowercase)
}

/// Parse a date/time typed by the user, in local time.
///
/// Accepts RFC 3339 (`2025-03-20T15:00:00Z`), `YYYY-MM-DDTHH:MM`, and natural
/// language ("tomorrow 3pm", "fri noon"). A day without a time means 09:00.
pub fn parse_datetime(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M") {
        return local_to_utc(naive);
    }

    let expanded = expand_abbreviations(input);
    let naive = fuzzydate::parse(&expanded)
        .map_err(|_| anyhow::anyhow!("Could not parse date/time: \"{}\"", input))?;

    if has_time_component(input) {
        local_to_utc(naive)
    } else {
        let time = NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0).context("Invalid default hour")?;
        local_to_utc(naive.date().and_time(time))
    }
}

fn local_to_utc(naive: NaiveDateTime) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("{naive} does not exist in the local time zone"))
}

/// Check if the user's input string contains time-related tokens.
fn has_time_component(input: &str) -> bool {
    let lower = input.to_lowercase();

    if lower.contains("noon") || lower.contains("midnight") {
        return true;
    }

    // am/pm patterns like "6pm", "6 pm", "11am"
    let bytes = lower.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if (b == b'a' || b == b'p') && i + 1 < bytes.len() && bytes[i + 1] == b'm' {
            if i > 0 && bytes[i - 1].is_ascii_digit() {
                return true;
            }
            if i > 1 && bytes[i - 1] == b' ' && bytes[i - 2].is_ascii_digit() {
                return true;
            }
        }
    }

    // HH:MM
    for (i, &b) in bytes.iter().enumerate() {
        if b == b':' {
            let has_digit_before = i > 0 && bytes[i - 1].is_ascii_digit();
            let has_digit_after = i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit();
            if has_digit_before && has_digit_after {
                return true;
            }
        }
    }

    // "at" followed by a digit (e.g. "at 3", "friday at 15")
    let after_at = lower
        .find(" at ")
        .map(|pos| &lower[pos + 4..])
        .or_else(|| lower.strip_prefix("at "));
    after_at.is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
}

/// Parse an end input: a duration ("45m") or a date/time ("until 5pm").
pub fn parse_end(input: &str, start: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if let Ok(end) = try_apply_duration(start, input) {
        return Ok(end);
    }

    let cleaned = input
        .strip_prefix("until ")
        .or_else(|| input.strip_prefix("to "))
        .unwrap_or(input);

    parse_datetime(cleaned)
}

/// Apply a duration string to a start time.
pub fn apply_duration(start: DateTime<Utc>, dur_input: &str) -> Result<DateTime<Utc>> {
    try_apply_duration(start, dur_input)
        .with_context(|| format!("Could not parse duration: \"{}\"", dur_input))
}

fn try_apply_duration(start: DateTime<Utc>, dur_input: &str) -> Result<DateTime<Utc>> {
    let std_dur =
        humantime::parse_duration(dur_input.trim()).map_err(|e| anyhow::anyhow!("{}", e))?;
    let chrono_dur = Duration::from_std(std_dur).context("Duration too large")?;
    Ok(start + chrono_dur)
}

/// Default end time: one hour after the start.
pub fn default_end(start: DateTime<Utc>) -> DateTime<Utc> {
    start + Duration::hours(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn three_pm() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 20, 15, 0, 0).unwrap()
    }

    #[test]
    fn time_component_am_pm() {
        assert!(has_time_component("tomorrow 6pm"));
        assert!(has_time_component("friday 11am"));
        assert!(has_time_component("sat 3 pm"));
        assert!(has_time_component("9AM"));
    }

    #[test]
    fn time_component_colon_and_keywords() {
        assert!(has_time_component("tomorrow 15:00"));
        assert!(has_time_component("tomorrow noon"));
        assert!(has_time_component("friday midnight"));
    }

    #[test]
    fn time_component_at_digit() {
        assert!(has_time_component("tomorrow at 3"));
        assert!(has_time_component("at 9"));
        assert!(!has_time_component("meet at the cafe"));
    }

    #[test]
    fn no_time_component() {
        assert!(!has_time_component("tomorrow"));
        assert!(!has_time_component("march 20"));
        assert!(!has_time_component("december"));
        assert!(!has_time_component("camp"));
    }

    #[test]
    fn expands_abbreviations() {
        assert_eq!(expand_abbreviations("sat 3pm"), "saturday 3pm");
        assert_eq!(expand_abbreviations("Sept 5"), "september 5");
        assert_eq!(expand_abbreviations("next friday"), "next friday");
    }

    #[test]
    fn rfc3339_is_taken_as_is() {
        assert_eq!(parse_datetime("2026-03-20T15:00:00Z").unwrap(), three_pm());
    }

    #[test]
    fn date_only_defaults_to_morning() {
        let dt = parse_datetime("tomorrow").unwrap().with_timezone(&Local);
        assert_eq!(dt.hour(), DEFAULT_HOUR);
    }

    #[test]
    fn invalid_input_is_an_error() {
        assert!(parse_datetime("not a date at all xyz").is_err());
    }

    #[test]
    fn durations() {
        assert_eq!(apply_duration(three_pm(), "30m").unwrap(), three_pm() + Duration::minutes(30));
        assert_eq!(apply_duration(three_pm(), "2hours").unwrap(), three_pm() + Duration::hours(2));
        assert!(apply_duration(three_pm(), "a while").is_err());
        assert_eq!(default_end(three_pm()), three_pm() + Duration::hours(1));
    }

    #[test]
    fn end_accepts_duration_or_datetime() {
        assert_eq!(parse_end("45m", three_pm()).unwrap(), three_pm() + Duration::minutes(45));
        assert_eq!(
            parse_end("until 2026-03-20T17:00:00Z", three_pm()).unwrap(),
            three_pm() + Duration::hours(2)
        );
    }
}
