//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   1     *   ┌─────────────────┐                   │
//! │  │    Category     │─────────────│      Item       │                   │
//! │  │  ─────────────  │             │  ─────────────  │                   │
//! │  │  id             │             │  id             │                   │
//! │  │  name           │             │  name           │                   │
//! │  │  needed_count   │ = Σ need    │  num_need       │                   │
//! │  │  inventory_count│ = Σ have    │  num_have       │                   │
//! │  └─────────────────┘             │  category_id    │                   │
//! │                                  └─────────────────┘                   │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      User       │   │    RecordId     │                             │
//! │  │  username       │   │  raw path text  │                             │
//! │  │  password_hash  │   │  coerced value  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// CSS class applied to rows whose inventory meets the need.
pub const COMPLETED_CLASS: &str = "completed";

// =============================================================================
// Category
// =============================================================================

/// A named grouping of items with aggregated need/have totals.
///
/// `needed_count` and `inventory_count` are sums over the category's items;
/// a category without items reports zero for both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    /// Generated identifier.
    pub id: i64,

    /// Display name, unique ignoring case.
    pub name: String,

    /// Sum of `num_need` over the category's items.
    pub needed_count: i64,

    /// Sum of `num_have` over the category's items.
    pub inventory_count: i64,
}

impl Category {
    /// Whether every item in the category has what it needs.
    pub fn is_complete(&self) -> bool {
        self.inventory_count >= self.needed_count
    }

    /// CSS class for list rendering.
    pub fn css_class(&self) -> Option<&'static str> {
        self.is_complete().then_some(COMPLETED_CLASS)
    }
}

// =============================================================================
// Item
// =============================================================================

/// A named inventory line with needed and on-hand quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    /// Generated identifier.
    pub id: i64,

    /// Display name, unique ignoring case across all categories.
    pub name: String,

    /// How many are needed.
    pub num_need: i64,

    /// How many are on hand. Never more than `num_need`.
    pub num_have: i64,

    /// Owning category.
    pub category_id: i64,
}

impl Item {
    /// Whether the on-hand quantity meets the need.
    pub fn is_complete(&self) -> bool {
        self.num_have >= self.num_need
    }

    /// CSS class for list rendering.
    pub fn css_class(&self) -> Option<&'static str> {
        self.is_complete().then_some(COMPLETED_CLASS)
    }
}

/// A validated item form: trimmed name and parsed quantities.
///
/// Only [`crate::validation::validate_item`] builds one, so holding an
/// `ItemDraft` means `0 <= num_have <= num_need`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub num_need: i64,
    pub num_have: i64,
}

// =============================================================================
// User
// =============================================================================

/// A registered account as stored in the user document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,

    /// PHC-format password hash. Never the plain password.
    pub password_hash: String,
}

// =============================================================================
// Record Id
// =============================================================================

/// An id taken from a URL path segment.
///
/// The segment is coerced to an integer from its leading digits (`"12abc"`
/// becomes 12, `"abc"` becomes 0), but the record it resolves to is only
/// trusted when the whole segment is digits. See [`RecordId::is_canonical`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordId {
    raw: String,
    value: i64,
}

impl RecordId {
    /// Coerces a raw path segment.
    pub fn parse(raw: &str) -> Self {
        let value = raw
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .fold(0i64, |acc, c| {
                acc.saturating_mul(10)
                    .saturating_add(i64::from(c as u8 - b'0'))
            });

        RecordId {
            raw: raw.to_string(),
            value,
        }
    }

    /// The coerced integer value.
    #[inline]
    pub fn value(&self) -> i64 {
        self.value
    }

    /// True when the segment contains no non-digit characters.
    pub fn is_canonical(&self) -> bool {
        self.raw.chars().all(|c| c.is_ascii_digit())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, num_need: i64, num_have: i64) -> Item {
        Item {
            id: 1,
            name: name.to_string(),
            num_need,
            num_have,
            category_id: 1,
        }
    }

    #[test]
    fn test_item_completion() {
        let forks = item("Forks", 10, 4);
        let plates = item("Plates", 6, 6);

        assert!(!forks.is_complete());
        assert_eq!(forks.css_class(), None);
        assert!(plates.is_complete());
        assert_eq!(plates.css_class(), Some("completed"));
    }

    #[test]
    fn test_empty_category_is_complete() {
        let category = Category {
            id: 1,
            name: "Kitchen".to_string(),
            needed_count: 0,
            inventory_count: 0,
        };
        assert!(category.is_complete());

        let short = Category {
            needed_count: 16,
            inventory_count: 10,
            ..category
        };
        assert!(!short.is_complete());
    }

    #[test]
    fn test_record_id_coercion() {
        let id = RecordId::parse("42");
        assert_eq!(id.value(), 42);
        assert!(id.is_canonical());

        let id = RecordId::parse("abc");
        assert_eq!(id.value(), 0);
        assert!(!id.is_canonical());

        let id = RecordId::parse("12abc");
        assert_eq!(id.value(), 12);
        assert!(!id.is_canonical());
    }

    #[test]
    fn test_record_id_saturates() {
        let id = RecordId::parse("99999999999999999999999");
        assert_eq!(id.value(), i64::MAX);
        assert!(id.is_canonical());
    }
}
