//! # Validation Module
//!
//! Form and query input validation for Tally.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Route glue (apps/web)                                        │
//! │  ├── Raw strings from form fields and query parameters                 │
//! │  └── Name lists fetched from the database for uniqueness               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Trims names, checks lengths                                       │
//! │  ├── Parses quantities and pages into integers                         │
//! │  └── Case-insensitive uniqueness against the supplied names            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checks run in a fixed order and the first failure wins; later checks are
//! never evaluated.
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::validate_item;
//! use tally_core::ValidationError;
//!
//! let names = vec!["Forks".to_string()];
//! let draft = validate_item("Plates", "6", "2", &names).unwrap();
//! assert_eq!(draft.num_need, 6);
//!
//! let err = validate_item("Cups", "1", "3", &names).unwrap_err();
//! assert_eq!(err, ValidationError::InventoryExceedsNeed);
//! ```

use crate::error::ValidationError;
use crate::pagination::max_page;
use crate::types::ItemDraft;
use crate::{MAX_NAME_LENGTH, MAX_QUANTITY, MAX_USERNAME_LENGTH, PASSWORD_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Primitive Parsers
// =============================================================================

/// Parses a non-negative whole number made only of ASCII digits.
///
/// Surrounding whitespace is ignored. Signs, decimals, empty strings and
/// values above [`MAX_QUANTITY`] are rejected.
pub fn parse_whole_number(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok().filter(|n| *n <= MAX_QUANTITY)
}

fn name_length_ok(name: &str) -> bool {
    (1..=MAX_NAME_LENGTH).contains(&name.chars().count())
}

fn name_taken(name: &str, existing: &[String]) -> bool {
    let wanted = name.to_lowercase();
    existing.iter().any(|other| other.to_lowercase() == wanted)
}

// =============================================================================
// Pagination
// =============================================================================

/// Validates the `page` query parameter against a listing of `total` rows.
///
/// A missing parameter means page 0. A present one must be a digit string
/// within `0..=max_page(total)`.
///
/// ## Example
/// ```rust
/// use tally_core::validation::parse_page;
///
/// assert_eq!(parse_page(None, 0), Ok(0));
/// assert_eq!(parse_page(Some("1"), 6), Ok(1));
/// assert!(parse_page(Some("2"), 6).is_err());
/// assert!(parse_page(Some("-1"), 6).is_err());
/// ```
pub fn parse_page(raw: Option<&str>, total: usize) -> ValidationResult<u64> {
    let Some(raw) = raw else {
        return Ok(0);
    };

    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPage);
    }

    let page: u64 = raw.parse().map_err(|_| ValidationError::InvalidPage)?;
    if page > max_page(total) {
        return Err(ValidationError::InvalidPage);
    }

    Ok(page)
}

// =============================================================================
// Category Names
// =============================================================================

/// Validates a new category name.
///
/// ## Rules (in order)
/// 1. Trimmed length is 1 to 100 characters
/// 2. No name in `existing` matches ignoring case
///
/// ## Returns
/// The trimmed name.
pub fn validate_category_name(name: &str, existing: &[String]) -> ValidationResult<String> {
    check_category_name(name, existing, ValidationError::DuplicateCategoryName)
}

/// Validates a category rename. `others` holds every category name except
/// the one being renamed.
pub fn validate_category_rename(name: &str, others: &[String]) -> ValidationResult<String> {
    check_category_name(name, others, ValidationError::DuplicateUpdatedCategoryName)
}

fn check_category_name(
    name: &str,
    existing: &[String],
    duplicate: ValidationError,
) -> ValidationResult<String> {
    let name = name.trim();

    if !name_length_ok(name) {
        return Err(ValidationError::CategoryNameLength);
    }

    if name_taken(name, existing) {
        return Err(duplicate);
    }

    Ok(name.to_string())
}

// =============================================================================
// Items
// =============================================================================

/// Validates a new item form.
///
/// ## Rules (in order)
/// ```text
/// name length 1..=100 ──► quantities are whole numbers ──► have <= need
///                                                             │
///                          unique among ALL item names ◄──────┘
/// ```
pub fn validate_item(
    name: &str,
    num_need: &str,
    num_have: &str,
    existing: &[String],
) -> ValidationResult<ItemDraft> {
    check_item(name, num_need, num_have, existing, ValidationError::DuplicateItemName)
}

/// Validates an item edit. `others` holds every item name except the one
/// being edited.
pub fn validate_item_update(
    name: &str,
    num_need: &str,
    num_have: &str,
    others: &[String],
) -> ValidationResult<ItemDraft> {
    check_item(
        name,
        num_need,
        num_have,
        others,
        ValidationError::DuplicateUpdatedItemName,
    )
}

fn check_item(
    name: &str,
    num_need: &str,
    num_have: &str,
    existing: &[String],
    duplicate: ValidationError,
) -> ValidationResult<ItemDraft> {
    let name = name.trim();

    if !name_length_ok(name) {
        return Err(ValidationError::ItemNameLength);
    }

    let (Some(num_need), Some(num_have)) =
        (parse_whole_number(num_need), parse_whole_number(num_have))
    else {
        return Err(ValidationError::InvalidQuantity);
    };

    if num_have > num_need {
        return Err(ValidationError::InventoryExceedsNeed);
    }

    if name_taken(name, existing) {
        return Err(duplicate);
    }

    Ok(ItemDraft {
        name: name.to_string(),
        num_need,
        num_have,
    })
}

// =============================================================================
// Credentials
// =============================================================================

/// Validates the shape of signup credentials.
///
/// ## Rules (in order)
/// - Username is 1 to 30 characters
/// - Password is 7 to 50 characters
pub fn validate_credential_format(username: &str, password: &str) -> ValidationResult<()> {
    if !(1..=MAX_USERNAME_LENGTH).contains(&username.chars().count()) {
        return Err(ValidationError::UsernameLength);
    }

    if !PASSWORD_LENGTH.contains(&password.chars().count()) {
        return Err(ValidationError::PasswordLength);
    }

    Ok(())
}

/// Validates signup credentials, with `username_taken` supplied by the
/// user store. Format errors take precedence over the taken check.
pub fn validate_credentials(
    username: &str,
    password: &str,
    username_taken: bool,
) -> ValidationResult<()> {
    validate_credential_format(username, password)?;

    if username_taken {
        return Err(ValidationError::UsernameTaken);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_whole_number() {
        assert_eq!(parse_whole_number("0"), Some(0));
        assert_eq!(parse_whole_number(" 12 "), Some(12));
        assert_eq!(parse_whole_number(""), None);
        assert_eq!(parse_whole_number("-1"), None);
        assert_eq!(parse_whole_number("1.5"), None);
        assert_eq!(parse_whole_number("3x"), None);
        assert_eq!(parse_whole_number("99999999999999999999"), None);
        assert_eq!(parse_whole_number("2147483647"), Some(MAX_QUANTITY));
        assert_eq!(parse_whole_number("2147483648"), None);
    }

    #[test]
    fn test_page_bounds_for_every_total() {
        for total in 0..=23usize {
            let last = max_page(total);
            for page in 0..=last {
                assert!(
                    parse_page(Some(&page.to_string()), total).is_ok(),
                    "page {} of total {} should be valid",
                    page,
                    total
                );
            }
            assert_eq!(
                parse_page(Some(&(last + 1).to_string()), total),
                Err(ValidationError::InvalidPage)
            );
        }
    }

    #[test]
    fn test_page_rejects_non_digits() {
        assert!(parse_page(Some("abc"), 50).is_err());
        assert!(parse_page(Some("1a"), 50).is_err());
        assert!(parse_page(Some("-1"), 50).is_err());
        assert!(parse_page(Some(""), 50).is_err());
        assert!(parse_page(Some("99999999999999999999999"), 50).is_err());
        assert_eq!(parse_page(None, 50), Ok(0));
    }

    #[test]
    fn test_category_name_length() {
        assert_eq!(
            validate_category_name("", &[]),
            Err(ValidationError::CategoryNameLength)
        );
        assert_eq!(
            validate_category_name("   ", &[]),
            Err(ValidationError::CategoryNameLength)
        );
        assert_eq!(
            validate_category_name(&"a".repeat(101), &[]),
            Err(ValidationError::CategoryNameLength)
        );
        assert_eq!(
            validate_category_name(&"a".repeat(100), &[]),
            Ok("a".repeat(100))
        );
        // Characters, not bytes
        assert!(validate_category_name(&"é".repeat(100), &[]).is_ok());
    }

    #[test]
    fn test_category_name_uniqueness_ignores_case() {
        let existing = names(&["Kitchen", "Garage"]);

        assert_eq!(
            validate_category_name("KITCHEN", &existing),
            Err(ValidationError::DuplicateCategoryName)
        );
        assert_eq!(
            validate_category_rename("garage", &existing),
            Err(ValidationError::DuplicateUpdatedCategoryName)
        );
        assert_eq!(
            validate_category_name("  Office ", &existing),
            Ok("Office".to_string())
        );
    }

    #[test]
    fn test_length_checked_before_uniqueness() {
        let existing = names(&[""]);
        assert_eq!(
            validate_category_name("", &existing),
            Err(ValidationError::CategoryNameLength)
        );
    }

    #[test]
    fn test_item_check_order() {
        let existing = names(&["Forks"]);

        assert_eq!(
            validate_item("", "x", "y", &existing),
            Err(ValidationError::ItemNameLength)
        );
        assert_eq!(
            validate_item("Forks", "x", "1", &existing),
            Err(ValidationError::InvalidQuantity)
        );
        // Quantity order wins over the duplicate name
        assert_eq!(
            validate_item("forks", "1", "5", &existing),
            Err(ValidationError::InventoryExceedsNeed)
        );
        assert_eq!(
            validate_item("FORKS", "5", "1", &existing),
            Err(ValidationError::DuplicateItemName)
        );
        assert_eq!(
            validate_item_update("FORKS", "5", "1", &existing),
            Err(ValidationError::DuplicateUpdatedItemName)
        );
    }

    #[test]
    fn test_item_quantity_upper_bound() {
        let draft = validate_item("Forks", "2147483647", "2147483647", &[]).unwrap();
        assert_eq!((draft.num_need, draft.num_have), (MAX_QUANTITY, MAX_QUANTITY));

        assert_eq!(
            validate_item("Forks", "2147483648", "0", &[]),
            Err(ValidationError::InvalidQuantity)
        );
        assert_eq!(
            validate_item_update("Forks", "9223372036854775807", "0", &[]),
            Err(ValidationError::InvalidQuantity)
        );
    }

    #[test]
    fn test_valid_item_draft() {
        let draft = validate_item(" Plates ", " 6", "6 ", &[]).unwrap();
        assert_eq!(
            draft,
            ItemDraft {
                name: "Plates".to_string(),
                num_need: 6,
                num_have: 6,
            }
        );
    }

    #[test]
    fn test_credentials() {
        assert_eq!(
            validate_credentials("", "password", false),
            Err(ValidationError::UsernameLength)
        );
        assert_eq!(
            validate_credentials(&"u".repeat(31), "password", false),
            Err(ValidationError::UsernameLength)
        );
        assert_eq!(
            validate_credentials("admin", "short", false),
            Err(ValidationError::PasswordLength)
        );
        assert_eq!(
            validate_credentials("admin", &"p".repeat(51), false),
            Err(ValidationError::PasswordLength)
        );
        assert_eq!(
            validate_credentials("admin", "secret1", true),
            Err(ValidationError::UsernameTaken)
        );
        assert_eq!(validate_credentials("admin", "secret1", false), Ok(()));
    }
}
