//! # tally-web: HTML Server for Tally
//!
//! Server-rendered pages for browsing and editing the inventory.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Request Flow                                  │
//! │                                                                         │
//! │  HTTP request                                                           │
//! │       │                                                                 │
//! │       ▼  TraceLayer (tower-http)                                        │
//! │  routes.rs ── extracts RequestContext (session cookie + connection),   │
//! │       │       path segments, query, form                               │
//! │       ▼                                                                 │
//! │  handlers/* ── guard → load → validate (tally-core) → write (tally-db)  │
//! │       │                                                                 │
//! │       ▼  Outcome::Render(View) | Outcome::Redirect(path)                │
//! │  RequestContext::respond ── HTML or 303, Set-Cookie, release conn      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Layered configuration
//! - [`state`] - Shared application state
//! - [`context`] - Per-request context and handler outcomes
//! - [`session`] - Signed session cookie
//! - [`auth`] - Password hashing and sign-in checks
//! - [`handlers`] - Category, item and user handlers
//! - [`forms`] - Form and query payloads
//! - [`views`] - HTML rendering
//! - [`routes`] - URL table

pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;

pub use config::AppConfig;
pub use error::{WebError, WebResult};
pub use routes::router;
pub use state::AppState;
