//! Session lifecycle: token persistence, claim decoding and bootstrap.
//!
//! The bearer token is the only state persisted between runs. A `Session`
//! is created once (at sign-in or bootstrap), passed explicitly to every
//! authenticated call, and torn down at sign-out.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::Backend;
use crate::error::{EventlyError, EventlyResult};
use crate::profile::UserProfile;

/// Claims embedded in the token payload. Only `email` is required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
    pub email: String,
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiry as seconds since the epoch
    #[serde(default)]
    pub exp: Option<i64>,
}

/// An authenticated session: the bearer token plus the identity it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: String,
    claims: Claims,
}

impl Session {
    /// Decode the claims segment of a JWT. The signature is not verified
    /// here; the backend does that on every request.
    pub fn from_token(token: impl Into<String>) -> EventlyResult<Self> {
        let token = token.into();
        let token = token.trim().to_string();

        let mut segments = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) =
            (segments.next(), segments.next(), segments.next(), segments.next())
        else {
            return Err(EventlyError::InvalidToken("expected three segments".into()));
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| EventlyError::InvalidToken(e.to_string()))?;
        let claims: Claims =
            serde_json::from_slice(&bytes).map_err(|e| EventlyError::InvalidToken(e.to_string()))?;

        Ok(Session { token, claims })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// The signed-in user's identity, used for creator checks.
    pub fn email(&self) -> &str {
        &self.claims.email
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.claims.exp.is_some_and(|exp| exp <= now.timestamp())
    }
}

/// File-backed token storage.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token, if any. A missing or blank file means no token.
    pub fn load(&self) -> EventlyResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let token = content.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    pub fn save(&self, token: &str) -> EventlyResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;

        // Owner-only, the file holds a bearer token:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn clear(&self) -> EventlyResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Outcome of session bootstrap. Redirecting to sign-in is left to the caller.
#[derive(Debug, Clone)]
pub enum Bootstrap {
    Unauthenticated,
    Authenticated {
        session: Session,
        profile: UserProfile,
    },
}

impl Bootstrap {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Bootstrap::Authenticated { session, .. } => Some(session),
            Bootstrap::Unauthenticated => None,
        }
    }

    /// The session and profile, or `NoActiveSession` when signed out.
    pub fn into_session(self) -> EventlyResult<(Session, UserProfile)> {
        match self {
            Bootstrap::Authenticated { session, profile } => Ok((session, profile)),
            Bootstrap::Unauthenticated => Err(EventlyError::NoActiveSession),
        }
    }
}

/// Restore the session from the token store and fetch the profile.
///
/// A missing, undecodable, expired or rejected token yields
/// `Unauthenticated`. Any other failure is returned as an error.
pub async fn bootstrap<B: Backend>(
    store: &TokenStore,
    backend: &B,
    now: DateTime<Utc>,
) -> EventlyResult<Bootstrap> {
    let Some(token) = store.load()? else {
        tracing::debug!("no stored token");
        return Ok(Bootstrap::Unauthenticated);
    };

    let session = match Session::from_token(token) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("ignoring stored token: {e}");
            return Ok(Bootstrap::Unauthenticated);
        }
    };

    if session.is_expired(now) {
        tracing::debug!(email = session.email(), "stored token has expired");
        return Ok(Bootstrap::Unauthenticated);
    }

    match backend.profile(&session).await {
        Ok(profile) => Ok(Bootstrap::Authenticated { session, profile }),
        Err(EventlyError::Unauthorized) => {
            tracing::debug!(email = session.email(), "stored token was rejected");
            Ok(Bootstrap::Unauthenticated)
        }
        Err(e) => Err(e),
    }
}
