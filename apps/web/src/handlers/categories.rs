//! Category pages: list, create, show, rename, delete.

use tally_core::validation::{parse_page, validate_category_name, validate_category_rename};
use tracing::info;

use super::{
    category_not_found, category_path, load_category, CATEGORY_CREATED, CATEGORY_DELETED,
    CATEGORY_RENAMED,
};
use crate::context::{Outcome, RequestContext};
use crate::error::WebResult;
use crate::forms::{CategoryForm, DeleteForm};
use crate::views::View;

/// `GET /categories`: one page of categories. Open to anonymous visitors.
pub async fn index(ctx: &mut RequestContext, page: Option<&str>) -> WebResult<Outcome> {
    let total = ctx.storage.categories().names().await?.len();

    let page = match parse_page(page, total) {
        Ok(page) => page,
        Err(e) => {
            ctx.session.set_error(e.to_string());
            return Ok(Outcome::redirect("/categories"));
        }
    };

    let categories = ctx.storage.categories().page(page).await?;
    Ok(Outcome::Render(View::Categories {
        categories,
        page,
        total,
    }))
}

/// `GET /categories/new`
pub async fn new_form(ctx: &mut RequestContext) -> WebResult<Outcome> {
    if let Some(redirect) = ctx.require_signed_in() {
        return Ok(redirect);
    }

    Ok(Outcome::Render(View::NewCategory {
        name: String::new(),
    }))
}

/// `POST /categories/new`
pub async fn create(ctx: &mut RequestContext, form: &CategoryForm) -> WebResult<Outcome> {
    if let Some(redirect) = ctx.require_signed_in() {
        return Ok(redirect);
    }

    let existing = ctx.storage.categories().names().await?;
    let name = match validate_category_name(&form.category, &existing) {
        Ok(name) => name,
        Err(e) => {
            ctx.session.set_error(e.to_string());
            return Ok(Outcome::Render(View::NewCategory {
                name: form.category.trim().to_string(),
            }));
        }
    };

    let id = ctx.storage.categories().create(&name).await?;
    info!(id, %name, "Category created");

    ctx.session.set_success(CATEGORY_CREATED);
    Ok(Outcome::redirect("/categories"))
}

/// `GET /categories/{id}`: the category, its totals and a page of items.
pub async fn show(
    ctx: &mut RequestContext,
    raw_id: &str,
    page: Option<&str>,
) -> WebResult<Outcome> {
    if let Some(redirect) = ctx.require_signed_in() {
        return Ok(redirect);
    }

    let Some(category) = load_category(ctx, raw_id).await? else {
        return Ok(category_not_found(ctx));
    };

    let total = ctx.storage.items().names_in_category(category.id).await?.len();
    let page = match parse_page(page, total) {
        Ok(page) => page,
        Err(e) => {
            ctx.session.set_error(e.to_string());
            return Ok(Outcome::Redirect(category_path(category.id)));
        }
    };

    let items = ctx.storage.items().page_for_category(category.id, page).await?;
    Ok(Outcome::Render(View::Category {
        category,
        items,
        page,
        total,
    }))
}

/// `GET /categories/{id}/update`
pub async fn edit_form(ctx: &mut RequestContext, raw_id: &str) -> WebResult<Outcome> {
    if let Some(redirect) = ctx.require_signed_in() {
        return Ok(redirect);
    }

    let Some(category) = load_category(ctx, raw_id).await? else {
        return Ok(category_not_found(ctx));
    };

    let name = category.name.clone();
    Ok(Outcome::Render(View::UpdateCategory { category, name }))
}

/// `POST /categories/{id}/update`
pub async fn update(
    ctx: &mut RequestContext,
    raw_id: &str,
    form: &CategoryForm,
) -> WebResult<Outcome> {
    if let Some(redirect) = ctx.require_signed_in() {
        return Ok(redirect);
    }

    let Some(category) = load_category(ctx, raw_id).await? else {
        return Ok(category_not_found(ctx));
    };

    let others = ctx.storage.categories().names_except(category.id).await?;
    let name = match validate_category_rename(&form.category, &others) {
        Ok(name) => name,
        Err(e) => {
            ctx.session.set_error(e.to_string());
            return Ok(Outcome::Render(View::UpdateCategory {
                category,
                name: form.category.trim().to_string(),
            }));
        }
    };

    ctx.storage.categories().rename(category.id, &name).await?;
    info!(id = category.id, %name, "Category renamed");

    ctx.session.set_success(CATEGORY_RENAMED);
    Ok(Outcome::redirect("/categories"))
}

/// `POST /categories/{id}/delete_confirm`
pub async fn confirm_delete(ctx: &mut RequestContext, raw_id: &str) -> WebResult<Outcome> {
    if let Some(redirect) = ctx.require_signed_in() {
        return Ok(redirect);
    }

    let Some(category) = load_category(ctx, raw_id).await? else {
        return Ok(category_not_found(ctx));
    };

    let item_count = ctx.storage.items().names_in_category(category.id).await?.len();
    Ok(Outcome::Render(View::ConfirmDeleteCategory {
        category,
        item_count,
    }))
}

/// `POST /categories/{id}/destroy`: deletes only when "delete" was chosen.
pub async fn destroy(
    ctx: &mut RequestContext,
    raw_id: &str,
    form: &DeleteForm,
) -> WebResult<Outcome> {
    if let Some(redirect) = ctx.require_signed_in() {
        return Ok(redirect);
    }

    if !form.confirmed() {
        return Ok(Outcome::redirect("/categories"));
    }

    let Some(category) = load_category(ctx, raw_id).await? else {
        return Ok(category_not_found(ctx));
    };

    ctx.storage.categories().delete(category.id).await?;
    info!(id = category.id, name = %category.name, "Category deleted");

    ctx.session.set_success(CATEGORY_DELETED);
    Ok(Outcome::redirect("/categories"))
}
