//! Bearer-token session with an explicit lifecycle.
//!
//! The token is opaque to the client except for the role claim in its
//! JWT payload, which routes the UI (employer vs admin commands). The
//! payload is decoded without signature verification — the server owns
//! verification; the client only needs the claim for display routing.
//!
//! Credentials are always passed explicitly: fetch functions take a
//! `&Session` parameter instead of reading ambient global state, and the
//! session is loaded at startup and cleared on logout.

use std::fs;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use jobdeck_core::AppError;
use jobdeck_core::UserRole;

/// Claims the client cares about from the JWT payload.
#[derive(Debug, Clone, Deserialize)]
struct TokenClaims {
    role: UserRole,
    #[serde(default)]
    sub: Option<String>,
}

/// An authenticated session against the board API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: UserRole,
    /// Subject claim from the token, when present (usually the account id
    /// or email).
    pub subject: Option<String>,
}

impl Session {
    /// Build a session from a bearer token, reading the role claim out
    /// of the JWT payload.
    pub fn from_token(token: impl Into<String>) -> Result<Self, AppError> {
        let token = token.into();
        let claims = decode_claims(&token)?;
        Ok(Self {
            token,
            role: claims.role,
            subject: claims.sub,
        })
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Load a previously saved session.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let data = fs::read_to_string(path).map_err(|e| {
            AppError::SessionError(format!("No session at {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&data)
            .map_err(|e| AppError::SessionError(format!("Corrupt session file: {}", e)))
    }

    /// Persist the session as JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::SessionError(format!("Cannot create {}: {}", parent.display(), e))
            })?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)
            .map_err(|e| AppError::SessionError(format!("Cannot write session: {}", e)))
    }

    /// Remove a saved session. Missing files are fine — logout is
    /// idempotent.
    pub fn clear(path: &Path) -> Result<(), AppError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::SessionError(format!(
                "Cannot remove session: {}",
                e
            ))),
        }
    }
}

/// Decode the payload segment of a JWT without verifying the signature.
fn decode_claims(token: &str) -> Result<TokenClaims, AppError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AppError::AuthError("Token is not a JWT".into()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AppError::AuthError(format!("Token payload is not base64url: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::AuthError(format!("Token payload is not valid JSON: {}", e)))
}
