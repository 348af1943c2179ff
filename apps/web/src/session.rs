//! # Session State
//!
//! Per-visitor state carried in a signed cookie.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Request                                                                │
//! │    Cookie: tally.session=<HS256 token>                                  │
//! │       │                                                                 │
//! │       ▼  SessionCodec::read (bad signature / expired → empty session)  │
//! │  Session { username, error, success, path }                            │
//! │       │                                                                 │
//! │       ▼  handler mutates it (sign in, set flash, remember path)        │
//! │       │                                                                 │
//! │       ├── Render   → error/success taken into the page                 │
//! │       └── Redirect → flashes survive for the next request              │
//! │       │                                                                 │
//! │       ▼  SessionCodec::cookie (new expiry on every response)           │
//! │  Set-Cookie: tally.session=<token>; Path=/; HttpOnly; SameSite=Lax     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The token is signed, not encrypted: its content is readable by the
//! client but cannot be altered without the server key.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WebResult;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "tally.session";

// =============================================================================
// Session
// =============================================================================

/// Session values for one visitor.
///
/// Flashes and the pending path are one-shot: the `take_*` methods remove
/// what they return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    success: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

/// Flash messages taken out of a session for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flashes {
    pub error: Option<String>,
    pub success: Option<String>,
}

impl Session {
    /// The signed-in user, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.username.is_some()
    }

    pub fn sign_in(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    pub fn sign_out(&mut self) {
        self.username = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.success = Some(message.into());
    }

    /// Error flash waiting to be shown, without consuming it.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Success flash waiting to be shown, without consuming it.
    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Removes and returns both flashes.
    pub fn take_flashes(&mut self) -> Flashes {
        Flashes {
            error: self.error.take(),
            success: self.success.take(),
        }
    }

    /// Remembers where to send the visitor after signing in.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = Some(path.into());
    }

    /// Pending post-sign-in destination, without consuming it.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Removes and returns the post-sign-in destination.
    pub fn take_path(&mut self) -> Option<String> {
        self.path.take()
    }
}

// =============================================================================
// Cookie Codec
// =============================================================================

/// Token claims: the session plus standard timestamps.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(flatten)]
    session: Session,

    /// Issued at (Unix timestamp)
    iat: i64,

    /// Expiration (Unix timestamp)
    exp: i64,
}

/// Signs sessions into cookie values and reads them back.
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime_secs: i64,
    secure: bool,
}

impl SessionCodec {
    /// Create a codec with an HS256 `secret`.
    pub fn new(secret: &[u8], lifetime_secs: i64, secure: bool) -> Self {
        SessionCodec {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            lifetime_secs,
            secure,
        }
    }

    /// Sign a session into a token.
    pub fn encode(&self, session: &Session) -> WebResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = SessionClaims {
            session: session.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify a token. Invalid or expired tokens yield an empty session.
    pub fn decode(&self, token: &str) -> Session {
        match decode::<SessionClaims>(token, &self.decoding, &self.validation) {
            Ok(data) => data.claims.session,
            Err(e) => {
                debug!(error = %e, "Discarding invalid session cookie");
                Session::default()
            }
        }
    }

    /// Session carried by the request's `Cookie` headers.
    pub fn read(&self, headers: &HeaderMap) -> Session {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, token)| self.decode(token))
            .unwrap_or_default()
    }

    /// `Set-Cookie` value carrying `session`.
    pub fn cookie(&self, session: &Session) -> WebResult<String> {
        let token = self.encode(session)?;
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, token, self.lifetime_secs
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        Ok(cookie)
    }
}
