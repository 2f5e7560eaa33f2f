//! Client-side form validation.
//!
//! Every rule runs before any request is made. Failures are collected per
//! field so a front end can annotate each offending input at once.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use regex::Regex;

use crate::event::{EventDraft, EventPayload};

static TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}\s\-_.,'!?&():/]*$").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").unwrap());

const MIN_PASSWORD_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Description,
    Category,
    Location,
    StartDate,
    EndDate,
    Participants,
    Username,
    Email,
    Password,
    ConfirmPassword,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Category => "category",
            Field::Location => "location",
            Field::StartDate => "start date",
            Field::EndDate => "end date",
            Field::Participants => "participants",
            Field::Username => "username",
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirm password",
        };
        write!(f, "{name}")
    }
}

/// Per-field validation messages. At most one message per field; a later
/// rule on the same field replaces the earlier message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Midnight of the day containing `now`, in `now`'s own time zone.
/// Dates before this are "in the past" for that viewer.
pub fn day_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    midnight_in(now.date_naive(), &now.timezone())
}

/// Start of `date` in time zone `tz`.
pub fn midnight_in<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight).earliest() {
        Some(start) => start.with_timezone(&Utc),
        // Midnight skipped by a DST change; use the offset in effect around it.
        None => {
            let offset = tz.offset_from_utc_datetime(&midnight).fix().local_minus_utc();
            (midnight - Duration::seconds(offset.into())).and_utc()
        }
    }
}

pub fn is_past<Tz: TimeZone>(date: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    date < day_start(now)
}

pub fn validate_title(title: &str) -> bool {
    !title.trim().is_empty() && TEXT_RE.is_match(title)
}

pub fn validate_description(description: &str) -> bool {
    TEXT_RE.is_match(description)
}

pub fn validate_location(location: &str) -> bool {
    !location.trim().is_empty() && TEXT_RE.is_match(location)
}

pub fn validate_category(category: &str, categories: &[String]) -> bool {
    !category.is_empty() && categories.iter().any(|c| c == category)
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Split comma-separated participant input into trimmed entries.
/// Returns `None` if the input is blank or any entry is empty.
pub fn parse_participants(input: &str) -> Option<Vec<String>> {
    if input.trim().is_empty() {
        return None;
    }
    let participants: Vec<String> = input.split(',').map(|p| p.trim().to_string()).collect();
    if participants.iter().any(String::is_empty) {
        return None;
    }
    Some(participants)
}

/// Validate an event form and normalize it into a request payload.
///
/// `now` carries the viewer's time zone, which decides where "today" starts.
pub fn validate_event<Tz: TimeZone>(
    draft: &EventDraft,
    categories: &[String],
    now: DateTime<Tz>,
) -> Result<EventPayload, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let today = day_start(&now);

    if !validate_title(&draft.title) {
        errors.insert(Field::Title, "Title must be alphabetic and cannot be empty");
    }
    if !validate_description(&draft.description) {
        errors.insert(Field::Description, "Description can have alphabetics and numbers");
    }
    if !validate_category(&draft.category, categories) {
        errors.insert(Field::Category, "Category must be selected");
    }
    if !validate_location(&draft.location) {
        errors.insert(Field::Location, "Location can have alphabetics and numbers");
    }
    if draft.start < today {
        errors.insert(Field::StartDate, "Start date cannot be in the past");
    }
    if draft.end < today {
        errors.insert(Field::EndDate, "End date cannot be in the past");
    }
    if draft.end <= draft.start {
        errors.insert(Field::EndDate, "End date should be after start date");
    }
    let participants = parse_participants(&draft.participants);
    if participants.is_none() {
        errors.insert(Field::Participants, "Participants field cannot be empty");
    }

    errors.into_result(EventPayload {
        title: draft.title.trim().to_string(),
        description: draft.description.trim().to_string(),
        category: draft.category.clone(),
        location: draft.location.trim().to_string(),
        start_date: draft.start,
        end_date: draft.end,
        participants: participants.unwrap_or_default(),
    })
}

/// Sign-in form rules.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if !validate_email(email) {
        errors.insert(Field::Email, "Invalid email address");
    }
    if !validate_password(password) {
        errors.insert(Field::Password, "Password must be at least 4 characters");
    }
    errors.into_result(())
}

/// Sign-up form rules.
pub fn validate_signup(
    username: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = match validate_login(email, password) {
        Ok(()) => ValidationErrors::default(),
        Err(errors) => errors,
    };
    if !validate_username(username) {
        errors.insert(Field::Username, "Username must be alphabetic and cannot be empty");
    }
    if password != confirm_password {
        errors.insert(Field::ConfirmPassword, "Passwords do not match");
    }
    errors.into_result(())
}
