//! # Request Context
//!
//! Everything a handler touches during one request, passed explicitly.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RequestContext                                                         │
//! │  ├── session   Session from the cookie (mutable)                       │
//! │  ├── storage   this request's database connection                      │
//! │  ├── auth      password checks + user store                            │
//! │  └── path      path and query, remembered by the sign-in guard         │
//! │                                                                         │
//! │  handler(&mut ctx, ..) ──► Outcome ──► ctx.respond(outcome)            │
//! │                                         ├── Render: page + flashes     │
//! │                                         ├── Redirect: 303              │
//! │                                         ├── Set-Cookie: session        │
//! │                                         └── connection released        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tally_db::Storage;
use tracing::debug;

use crate::auth::Authenticator;
use crate::error::{WebError, WebResult};
use crate::handlers::SIGN_IN_REQUIRED;
use crate::session::{Session, SessionCodec};
use crate::state::AppState;
use crate::views::{Layout, View};

/// What a handler decided to do.
#[derive(Debug)]
pub enum Outcome {
    /// Show a page.
    Render(View),
    /// Send the browser elsewhere.
    Redirect(String),
}

impl Outcome {
    pub fn redirect(to: impl Into<String>) -> Self {
        Outcome::Redirect(to.into())
    }
}

/// Per-request state handed to every handler.
pub struct RequestContext {
    pub session: Session,
    pub storage: Storage,
    pub auth: Arc<Authenticator>,
    sessions: Arc<SessionCodec>,
    path: String,
}

impl RequestContext {
    pub fn new(
        session: Session,
        storage: Storage,
        auth: Arc<Authenticator>,
        sessions: Arc<SessionCodec>,
        path: String,
    ) -> Self {
        RequestContext {
            session,
            storage,
            auth,
            sessions,
            path,
        }
    }

    /// Requested path including the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Sign-in guard.
    ///
    /// `None` when signed in. Otherwise flashes an error, remembers the
    /// requested path and returns the redirect to the sign-in page.
    pub fn require_signed_in(&mut self) -> Option<Outcome> {
        if self.session.is_signed_in() {
            return None;
        }

        debug!(path = %self.path, "Sign-in required");
        self.session.set_error(SIGN_IN_REQUIRED);
        self.session.set_path(self.path.clone());
        Some(Outcome::redirect("/users/signin"))
    }

    /// Turn an outcome into the HTTP response, writing the session cookie.
    ///
    /// Consumes the context, so the connection goes back to the pool here.
    pub fn respond(mut self, outcome: Outcome) -> WebResult<Response> {
        let mut response = match outcome {
            Outcome::Render(view) => {
                let layout = Layout {
                    username: self.session.username().map(str::to_string),
                    flashes: self.session.take_flashes(),
                };
                Html(view.render(&layout)).into_response()
            }
            Outcome::Redirect(to) => Redirect::to(&to).into_response(),
        };

        let cookie = HeaderValue::from_str(&self.sessions.cookie(&self.session)?)?;
        response.headers_mut().insert(SET_COOKIE, cookie);

        Ok(response)
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = WebError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = state.sessions.read(&parts.headers);
        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        state.context(session, path).await
    }
}
