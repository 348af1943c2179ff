//! # tally-core: Pure Domain Logic for Tally
//!
//! This crate holds the rules of the inventory tracker as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/web (axum)                              │   │
//! │  │    Categories ──► Category ──► Items ──► Sign in / Sign up      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌────────────┐                │   │
//! │  │   │   types   │  │ pagination │  │ validation │                │   │
//! │  │   │ Category  │  │ page size  │  │ names      │                │   │
//! │  │   │   Item    │  │ max page   │  │ quantities │                │   │
//! │  │   └───────────┘  └────────────┘  └────────────┘                │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-db (Database Layer)                    │   │
//! │  │          SQLite categories/items, Redis user documents          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, Item, ItemDraft)
//! - [`pagination`] - Page size and page bounds
//! - [`error`] - Validation error type
//! - [`validation`] - Form input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::validation::validate_category_name;
//!
//! let existing = vec!["Kitchen".to_string()];
//! assert!(validate_category_name("  Garage ", &existing).is_ok());
//! assert!(validate_category_name("kitchen", &existing).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use pagination::RESULTS_PER_PAGE;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest allowed category or item name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Largest accepted item quantity. Per-category sums stay far inside `i64`.
pub const MAX_QUANTITY: i64 = i32::MAX as i64;

/// Longest allowed username, in characters.
pub const MAX_USERNAME_LENGTH: usize = 30;

/// Allowed password lengths (inclusive), in characters.
pub const PASSWORD_LENGTH: std::ops::RangeInclusive<usize> = 7..=50;
