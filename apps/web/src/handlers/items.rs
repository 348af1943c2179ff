//! Item pages: add, edit, delete within a category.

use tally_core::validation::{validate_item, validate_item_update};
use tally_core::RecordId;
use tracing::info;

use super::{
    category_not_found, category_path, item_not_found, load_category, load_item, ITEM_CREATED,
    ITEM_DELETED, ITEM_UPDATED,
};
use crate::context::{Outcome, RequestContext};
use crate::error::WebResult;
use crate::forms::{DeleteForm, ItemForm};
use crate::views::View;

/// `GET /categories/{id}/items/new`
pub async fn new_form(ctx: &mut RequestContext, raw_category_id: &str) -> WebResult<Outcome> {
    if let Some(redirect) = ctx.require_signed_in() {
        return Ok(redirect);
    }

    let Some(category) = load_category(ctx, raw_category_id).await? else {
        return Ok(category_not_found(ctx));
    };

    Ok(Outcome::Render(View::NewItem {
        category,
        form: ItemForm::default(),
    }))
}

/// `POST /categories/{id}/items/new`
pub async fn create(
    ctx: &mut RequestContext,
    raw_category_id: &str,
    form: &ItemForm,
) -> WebResult<Outcome> {
    if let Some(redirect) = ctx.require_signed_in() {
        return Ok(redirect);
    }

    let Some(category) = load_category(ctx, raw_category_id).await? else {
        return Ok(category_not_found(ctx));
    };

    // Item names are unique across every category
    let existing = ctx.storage.items().names().await?;
    let draft = match validate_item(&form.item, &form.num_need, &form.num_have, &existing) {
        Ok(draft) => draft,
        Err(e) => {
            ctx.session.set_error(e.to_string());
            return Ok(Outcome::Render(View::NewItem {
                category,
                form: form.clone(),
            }));
        }
    };

    let id = ctx
        .storage
        .items()
        .create(category.id, &draft.name, draft.num_need, draft.num_have)
        .await?;
    info!(id, category_id = category.id, name = %draft.name, "Item created");

    ctx.session.set_success(ITEM_CREATED);
    Ok(Outcome::Redirect(category_path(category.id)))
}

/// `GET /categories/{id}/items/{item_id}/update`
pub async fn edit_form(
    ctx: &mut RequestContext,
    raw_category_id: &str,
    raw_item_id: &str,
) -> WebResult<Outcome> {
    if let Some(redirect) = ctx.require_signed_in() {
        return Ok(redirect);
    }

    let Some(item) = load_item(ctx, raw_category_id, raw_item_id).await? else {
        return Ok(item_not_found(ctx, raw_category_id));
    };

    Ok(Outcome::Render(View::UpdateItem {
        category_id: item.category_id,
        form: ItemForm::from(&item),
        item,
    }))
}

/// `POST /categories/{id}/items/{item_id}/update`
pub async fn update(
    ctx: &mut RequestContext,
    raw_category_id: &str,
    raw_item_id: &str,
    form: &ItemForm,
) -> WebResult<Outcome> {
    if let Some(redirect) = ctx.require_signed_in() {
        return Ok(redirect);
    }

    let Some(item) = load_item(ctx, raw_category_id, raw_item_id).await? else {
        return Ok(item_not_found(ctx, raw_category_id));
    };

    let others = ctx.storage.items().names_except(item.id).await?;
    let draft = match validate_item_update(&form.item, &form.num_need, &form.num_have, &others) {
        Ok(draft) => draft,
        Err(e) => {
            ctx.session.set_error(e.to_string());
            return Ok(Outcome::Render(View::UpdateItem {
                category_id: item.category_id,
                item,
                form: form.clone(),
            }));
        }
    };

    ctx.storage
        .items()
        .update(item.id, &draft.name, draft.num_need, draft.num_have)
        .await?;
    info!(id = item.id, name = %draft.name, "Item updated");

    ctx.session.set_success(ITEM_UPDATED);
    Ok(Outcome::Redirect(category_path(item.category_id)))
}

/// `POST /categories/{id}/items/{item_id}/delete_confirm`
pub async fn confirm_delete(
    ctx: &mut RequestContext,
    raw_category_id: &str,
    raw_item_id: &str,
) -> WebResult<Outcome> {
    if let Some(redirect) = ctx.require_signed_in() {
        return Ok(redirect);
    }

    let Some(item) = load_item(ctx, raw_category_id, raw_item_id).await? else {
        return Ok(item_not_found(ctx, raw_category_id));
    };

    Ok(Outcome::Render(View::ConfirmDeleteItem {
        category_id: item.category_id,
        item,
    }))
}

/// `POST /categories/{id}/items/{item_id}/destroy`: deletes only when
/// "delete" was chosen.
pub async fn destroy(
    ctx: &mut RequestContext,
    raw_category_id: &str,
    raw_item_id: &str,
    form: &DeleteForm,
) -> WebResult<Outcome> {
    if let Some(redirect) = ctx.require_signed_in() {
        return Ok(redirect);
    }

    if !form.confirmed() {
        let category_id = RecordId::parse(raw_category_id);
        return Ok(Outcome::Redirect(category_path(category_id.value())));
    }

    let Some(item) = load_item(ctx, raw_category_id, raw_item_id).await? else {
        return Ok(item_not_found(ctx, raw_category_id));
    };

    ctx.storage.items().delete(item.id).await?;
    info!(id = item.id, name = %item.name, "Item deleted");

    ctx.session.set_success(ITEM_DELETED);
    Ok(Outcome::Redirect(category_path(item.category_id)))
}
