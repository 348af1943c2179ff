//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  └── ValidationError  - Bad form input (shown as a flash message)      │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  └── DbError          - Database / document store failures             │
//! │                                                                         │
//! │  web errors (in app)                                                   │
//! │  └── WebError         - Fatal request failure (generic error page)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. The `Display` output IS the flash message the user reads
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Every variant renders as the single-line message shown to the user when
/// a form is re-rendered or a listing redirects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `page` query parameter is not a digit string or is past the last page.
    #[error("The requested page is not valid.")]
    InvalidPage,

    /// Category name is empty or longer than 100 characters.
    #[error("Category name must be between 1 and 100 characters.")]
    CategoryNameLength,

    /// Another category already uses this name (ignoring case).
    #[error("New category name must be unique.")]
    DuplicateCategoryName,

    /// Renaming would collide with another category (ignoring case).
    #[error("Updated category name must be unique.")]
    DuplicateUpdatedCategoryName,

    /// Item name is empty or longer than 100 characters.
    #[error("Item name must be between 1 and 100 characters.")]
    ItemNameLength,

    /// `num_need` or `num_have` is not a non-negative whole number.
    #[error("Quantities must be non-negative whole numbers.")]
    InvalidQuantity,

    /// `num_have` is larger than `num_need`.
    #[error("The inventory of items cannot be greater than the number of items needed.")]
    InventoryExceedsNeed,

    /// Another item (in any category) already uses this name.
    #[error("The name of the item must be unique.")]
    DuplicateItemName,

    /// Editing would collide with another item's name.
    #[error("Updated item name must be unique.")]
    DuplicateUpdatedItemName,

    /// Username is empty or longer than 30 characters.
    #[error("Username must be between 1 and 30 characters.")]
    UsernameLength,

    /// Password is shorter than 7 or longer than 50 characters.
    #[error("Password must be between 7 and 50 characters.")]
    PasswordLength,

    /// Username already registered.
    #[error("Sorry, that username is already taken.")]
    UsernameTaken,
}

// =============================================================================
// Unit Tests
// =============================================================================
