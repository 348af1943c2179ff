//! # Route Handlers
//!
//! Handlers take the [`RequestContext`] plus already-extracted strings and
//! return an [`Outcome`]; they never build HTTP responses themselves.
//!
//! ## Protected Handler Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  require_signed_in ──► not signed in ──► Redirect /users/signin        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load record by id ──► missing / non-digit id ──► Redirect + flash     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate form ──► invalid ──► Render form again + error flash         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write ──► success flash ──► Redirect                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod categories;
pub mod items;
pub mod users;

use tally_core::{Category, Item, RecordId};

use crate::context::{Outcome, RequestContext};
use crate::error::WebResult;

// =============================================================================
// Flash Messages
// =============================================================================

pub const SIGN_IN_REQUIRED: &str = "You must be signed in to do that.";
pub const PAGE_NOT_FOUND: &str = "Sorry, that page was not found.";
pub const CATEGORY_NOT_FOUND: &str = "The specified category was not found.";
pub const ITEM_NOT_FOUND: &str = "The specified item was not found.";

pub const CATEGORY_CREATED: &str = "The new category has been created.";
pub const CATEGORY_RENAMED: &str = "The category name has been updated.";
pub const CATEGORY_DELETED: &str = "The category has been deleted.";
pub const ITEM_CREATED: &str = "The new item has been created.";
pub const ITEM_UPDATED: &str = "The item has been updated.";
pub const ITEM_DELETED: &str = "The item has been deleted.";

pub const WELCOME: &str = "Welcome!";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const SIGNED_OUT: &str = "You have been signed out.";
pub const ACCOUNT_CREATED: &str = "Your account has been created!  Please sign in.";

// =============================================================================
// Shared Loaders
// =============================================================================

/// Category named by a raw path segment.
///
/// `None` when no category has the coerced id, or when the segment carries
/// anything but digits (`/categories/3abc` is not category 3).
pub async fn load_category(ctx: &mut RequestContext, raw_id: &str) -> WebResult<Option<Category>> {
    let id = RecordId::parse(raw_id);
    let category = ctx.storage.categories().find(id.value()).await?;

    Ok(category.filter(|_| id.is_canonical()))
}

/// Item named by raw path segments. It must also belong to the category in
/// the path.
pub async fn load_item(
    ctx: &mut RequestContext,
    raw_category_id: &str,
    raw_item_id: &str,
) -> WebResult<Option<Item>> {
    let category_id = RecordId::parse(raw_category_id);
    let item_id = RecordId::parse(raw_item_id);
    let item = ctx.storage.items().find(item_id.value()).await?;

    Ok(item.filter(|item| {
        category_id.is_canonical()
            && item_id.is_canonical()
            && item.category_id == category_id.value()
    }))
}

/// Flash "category not found" and go back to the list.
pub fn category_not_found(ctx: &mut RequestContext) -> Outcome {
    ctx.session.set_error(CATEGORY_NOT_FOUND);
    Outcome::redirect("/categories")
}

/// Flash "item not found" and go back to the category page.
pub fn item_not_found(ctx: &mut RequestContext, raw_category_id: &str) -> Outcome {
    ctx.session.set_error(ITEM_NOT_FOUND);
    Outcome::Redirect(category_path(RecordId::parse(raw_category_id).value()))
}

/// Unknown routes: flash and go home.
pub fn not_found(ctx: &mut RequestContext) -> Outcome {
    ctx.session.set_error(PAGE_NOT_FOUND);
    Outcome::redirect("/")
}

pub fn category_path(id: i64) -> String {
    format!("/categories/{}", id)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{signed_in, state};

    #[tokio::test]
    async fn test_load_category_requires_digit_id() {
        let state = state().await;
        let mut ctx = signed_in(&state, "/").await;
        let id = ctx.storage.categories().create("Kitchen").await.unwrap();

        assert!(load_category(&mut ctx, &id.to_string()).await.unwrap().is_some());
        assert!(load_category(&mut ctx, &format!("{}abc", id)).await.unwrap().is_none());
        assert!(load_category(&mut ctx, "abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_item_requires_owning_category() {
        let state = state().await;
        let mut ctx = signed_in(&state, "/").await;
        let kitchen = ctx.storage.categories().create("Kitchen").await.unwrap();
        let garage = ctx.storage.categories().create("Garage").await.unwrap();
        let forks = ctx.storage.items().create(kitchen, "Forks", 10, 4).await.unwrap();

        let (k, g, f) = (kitchen.to_string(), garage.to_string(), forks.to_string());
        assert!(load_item(&mut ctx, &k, &f).await.unwrap().is_some());
        assert!(load_item(&mut ctx, &g, &f).await.unwrap().is_none());
        assert!(load_item(&mut ctx, &format!("{}x", k), &f).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_not_found_flashes_and_goes_home() {
        let state = state().await;
        let mut ctx = signed_in(&state, "/nowhere").await;

        let outcome = not_found(&mut ctx);

        assert_eq!(test_support::redirect_target(&outcome), "/");
        assert_eq!(ctx.session.error(), Some(PAGE_NOT_FOUND));
    }
}
