//! Error types for the evently client.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors that can occur in evently operations.
#[derive(Error, Debug)]
pub enum EventlyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Not authorized, please sign in again")]
    Unauthorized,

    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),

    #[error("Only the creator of an event can change it")]
    NotCreator,

    #[error("Events cannot be moved before today")]
    PastDate,

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Not signed in")]
    NoActiveSession,

    #[error("No {0} panel is open")]
    NoOverlay(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<ValidationErrors> for EventlyError {
    fn from(errors: ValidationErrors) -> Self {
        EventlyError::Validation(errors)
    }
}

/// Result type alias for evently operations.
pub type EventlyResult<T> = Result<T, EventlyError>;
