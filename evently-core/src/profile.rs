//! Account and profile types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub username: String,
    /// Server-relative path of the profile picture, e.g. `/uploads/a.png`
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Body of `PUT /users/profile/update`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Sign-up form, sent as multipart.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub picture: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(alias = "access_token")]
    pub token: String,
}
