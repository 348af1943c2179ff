//! # tally-db: Database Layer for Tally
//!
//! This crate provides storage access for the inventory tracker.
//! Categories and items live in SQLite (via sqlx); user credentials live in
//! a document store.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Data Flow                                │
//! │                                                                         │
//! │  HTTP request (GET /categories/3)                                      │
//! │       │                                                                 │
//! │       ▼  database.acquire()                                             │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tally-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  UserStore   │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (users.rs)  │  │   │
//! │  │   │               │    │ CategoryRepo   │   │              │  │   │
//! │  │   │ SqlitePool    │───►│ ItemRepo       │   │ Redis hash   │  │   │
//! │  │   │ Storage (1    │    │                │   │ or in-memory │  │   │
//! │  │   │ conn/request) │    │ logs every SQL │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼  Storage dropped at end of request → connection released       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation, per-request [`Storage`]
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Category and item repositories
//! - [`users`] - User document store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("tally.db")).await?;
//!
//! let mut storage = db.acquire().await?;
//! let id = storage.categories().create("Kitchen").await?;
//! let kitchen = storage.categories().find(id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod users;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, Storage};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::item::ItemRepository;
pub use users::{MemoryUserStore, RedisUserStore, UserStore};
