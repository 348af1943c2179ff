//! # Repository Module
//!
//! SQL access for categories and items.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Route handler                                                          │
//! │       │                                                                 │
//! │       │  storage.categories().find(3)                                   │
//! │       ▼                                                                 │
//! │  CategoryRepository<'conn>         ItemRepository<'conn>               │
//! │  ├── find / page                   ├── find / page_for_category        │
//! │  ├── names / names_except          ├── names / names_in_category       │
//! │  └── create / rename / delete      └── create / update / delete        │
//! │       │                                                                 │
//! │       │  log_statement(sql, params)  ← every statement, before running │
//! │       ▼                                                                 │
//! │  the request's SqliteConnection                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories borrow the request's connection instead of cloning the pool,
//! so a request never holds more than one connection.
//!
//! ## Available Repositories
//!
//! - [`category::CategoryRepository`]
//! - [`item::ItemRepository`]

pub mod category;
pub mod item;

use std::fmt::Debug;
use tracing::info;

/// Records a statement and its bound parameters before it runs.
pub(crate) fn log_statement(statement: &str, params: &[&dyn Debug]) {
    let statement = statement.split_whitespace().collect::<Vec<_>>().join(" ");
    info!(%statement, ?params, "Executing statement");
}
