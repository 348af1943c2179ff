//! # HTML Views
//!
//! Every page the server renders, as data plus a `render` function.
//!
//! ## Page Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  <nav>  Tally · Categories          Signed in as admin [Sign out]      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  flash.error    (one-shot, from the session)                           │
//! │  flash.success                                                          │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  View::body()                                                           │
//! │    ...                                                                  │
//! │  « Previous page        Next page »   (listing views only)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All user-supplied text goes through [`escape`] before it is written into
//! markup.

use tally_core::pagination::max_page;
use tally_core::{Category, Item};

use crate::forms::ItemForm;
use crate::session::Flashes;

/// Layout inputs taken from the session at render time.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub username: Option<String>,
    pub flashes: Flashes,
}

/// A renderable page.
#[derive(Debug, Clone)]
pub enum View {
    /// Paginated category list (home).
    Categories {
        categories: Vec<Category>,
        page: u64,
        total: usize,
    },
    NewCategory {
        name: String,
    },
    /// One category with a page of its items.
    Category {
        category: Category,
        items: Vec<Item>,
        page: u64,
        total: usize,
    },
    UpdateCategory {
        category: Category,
        name: String,
    },
    /// Shows how many items the deletion takes with it.
    ConfirmDeleteCategory {
        category: Category,
        item_count: usize,
    },
    NewItem {
        category: Category,
        form: ItemForm,
    },
    UpdateItem {
        category_id: i64,
        item: Item,
        form: ItemForm,
    },
    ConfirmDeleteItem {
        category_id: i64,
        item: Item,
    },
    SignIn {
        username: String,
    },
    CreateAccount {
        username: String,
    },
}

impl View {
    /// Text of the `<title>` element.
    pub fn title(&self) -> String {
        match self {
            View::Categories { .. } => "Categories".to_string(),
            View::NewCategory { .. } => "New category".to_string(),
            View::Category { category, .. } => category.name.clone(),
            View::UpdateCategory { category, .. } => format!("Edit {}", category.name),
            View::ConfirmDeleteCategory { category, .. } => format!("Delete {}", category.name),
            View::NewItem { category, .. } => format!("New item in {}", category.name),
            View::UpdateItem { item, .. } => format!("Edit {}", item.name),
            View::ConfirmDeleteItem { item, .. } => format!("Delete {}", item.name),
            View::SignIn { .. } => "Sign in".to_string(),
            View::CreateAccount { .. } => "Create account".to_string(),
        }
    }

    /// Full HTML document.
    pub fn render(&self, layout: &Layout) -> String {
        let account = match &layout.username {
            Some(username) => format!(
                r#"<span>Signed in as {}</span>
      <form class="inline" method="post" action="/users/signout"><button type="submit">Sign out</button></form>"#,
                escape(username)
            ),
            None => r#"<a href="/users/signin">Sign in</a> <a href="/users/create">Create account</a>"#
                .to_string(),
        };

        let mut flashes = String::new();
        if let Some(error) = &layout.flashes.error {
            flashes.push_str(&format!(r#"<div class="flash error">{}</div>"#, escape(error)));
        }
        if let Some(success) = &layout.flashes.success {
            flashes.push_str(&format!(r#"<div class="flash success">{}</div>"#, escape(success)));
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>{title} · Tally</title>
    <style>
      .completed {{ text-decoration: line-through; color: #777; }}
      .flash.error {{ color: #a00; }}
      .flash.success {{ color: #070; }}
      form.inline {{ display: inline; }}
    </style>
  </head>
  <body>
    <nav>
      <a href="/categories">Tally</a>
      {account}
    </nav>
    {flashes}
    <main>
{body}
    </main>
  </body>
</html>
"#,
            title = escape(&self.title()),
            account = account,
            flashes = flashes,
            body = self.body(),
        )
    }

    fn body(&self) -> String {
        match self {
            View::Categories {
                categories,
                page,
                total,
            } => {
                let rows: String = categories
                    .iter()
                    .map(|category| {
                        format!(
                            r#"<li{class}><a href="/categories/{id}">{name}</a> ({have} / {need})</li>"#,
                            class = class_attr(category.css_class()),
                            id = category.id,
                            name = escape(&category.name),
                            have = category.inventory_count,
                            need = category.needed_count,
                        )
                    })
                    .collect();

                format!(
                    r#"<h1>Categories</h1>
<ul class="categories">{rows}</ul>
{pager}
<a href="/categories/new">New category</a>"#,
                    rows = rows,
                    pager = pager("/categories", *page, *total),
                )
            }

            View::NewCategory { name } => format!(
                r#"<h1>New category</h1>
<form method="post" action="/categories/new">
  <label for="category">Category name</label>
  <input id="category" name="category" value="{name}">
  <button type="submit">Create</button>
</form>"#,
                name = escape(name)
            ),

            View::Category {
                category,
                items,
                page,
                total,
            } => {
                let rows: String = items
                    .iter()
                    .map(|item| {
                        format!(
                            r#"<li{class}>{name}: have {have} of {need}
  <a href="/categories/{cid}/items/{iid}/update">Edit</a>
  <form class="inline" method="post" action="/categories/{cid}/items/{iid}/delete_confirm"><button type="submit">Delete</button></form>
</li>"#,
                            class = class_attr(item.css_class()),
                            name = escape(&item.name),
                            have = item.num_have,
                            need = item.num_need,
                            cid = category.id,
                            iid = item.id,
                        )
                    })
                    .collect();

                format!(
                    r#"<h1{class}>{name}</h1>
<p>Inventory: {have} of {need} needed</p>
<a href="/categories/{id}/update">Edit category</a>
<form class="inline" method="post" action="/categories/{id}/delete_confirm"><button type="submit">Delete category</button></form>
<ul class="items">{rows}</ul>
{pager}
<a href="/categories/{id}/items/new">Add item</a>"#,
                    class = class_attr(category.css_class()),
                    name = escape(&category.name),
                    have = category.inventory_count,
                    need = category.needed_count,
                    id = category.id,
                    rows = rows,
                    pager = pager(&format!("/categories/{}", category.id), *page, *total),
                )
            }

            View::UpdateCategory { category, name } => format!(
                r#"<h1>Edit {current}</h1>
<form method="post" action="/categories/{id}/update">
  <label for="category">Category name</label>
  <input id="category" name="category" value="{name}">
  <button type="submit">Save</button>
</form>"#,
                current = escape(&category.name),
                id = category.id,
                name = escape(name)
            ),

            View::ConfirmDeleteCategory {
                category,
                item_count,
            } => format!(
                r#"<h1>Delete {name}?</h1>
<p>Deleting this category also deletes its {count} item(s).</p>
{choice}"#,
                name = escape(&category.name),
                count = item_count,
                choice = delete_choice(&format!("/categories/{}/destroy", category.id)),
            ),

            View::NewItem { category, form } => format!(
                r#"<h1>New item in {name}</h1>
{fields}"#,
                name = escape(&category.name),
                fields = item_fields(
                    &format!("/categories/{}/items/new", category.id),
                    form,
                    "Add"
                ),
            ),

            View::UpdateItem {
                category_id,
                item,
                form,
            } => format!(
                r#"<h1>Edit {name}</h1>
{fields}"#,
                name = escape(&item.name),
                fields = item_fields(
                    &format!("/categories/{}/items/{}/update", category_id, item.id),
                    form,
                    "Save"
                ),
            ),

            View::ConfirmDeleteItem { category_id, item } => format!(
                r#"<h1>Delete {name}?</h1>
{choice}"#,
                name = escape(&item.name),
                choice = delete_choice(&format!(
                    "/categories/{}/items/{}/destroy",
                    category_id, item.id
                )),
            ),

            View::SignIn { username } => credentials_form(
                "Sign in",
                "/users/signin",
                username,
                r#"<p>No account? <a href="/users/create">Create one</a>.</p>"#,
            ),

            View::CreateAccount { username } => credentials_form(
                "Create account",
                "/users/create",
                username,
                r#"<p>Usernames are 1 to 30 characters, passwords 7 to 50.</p>"#,
            ),
        }
    }
}

/// Page shown for fatal request errors. Carries no detail.
pub fn error_page() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
  <head><meta charset="utf-8"><title>Error · Tally</title></head>
  <body>
    <h1>Something went wrong</h1>
    <p>The request could not be completed. Please try again later.</p>
    <a href="/categories">Back to categories</a>
  </body>
</html>
"#
    .to_string()
}

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

// =============================================================================
// Fragments
// =============================================================================

fn class_attr(class: Option<&str>) -> String {
    class
        .map(|c| format!(r#" class="{}""#, c))
        .unwrap_or_default()
}

/// Previous/next links for a listing of `total` rows.
fn pager(base: &str, page: u64, total: usize) -> String {
    let mut links = Vec::new();
    if page > 0 {
        links.push(format!(
            r#"<a rel="prev" href="{}?page={}">&laquo; Previous page</a>"#,
            base,
            page - 1
        ));
    }
    if page < max_page(total) {
        links.push(format!(
            r#"<a rel="next" href="{}?page={}">Next page &raquo;</a>"#,
            base,
            page + 1
        ));
    }
    format!(r#"<div class="pager">{}</div>"#, links.join(" "))
}

fn delete_choice(action: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
  <label><input type="radio" name="optionsRadios" value="delete"> Delete</label>
  <label><input type="radio" name="optionsRadios" value="cancel" checked> Cancel</label>
  <button type="submit">Submit</button>
</form>"#,
        action = action
    )
}

fn item_fields(action: &str, form: &ItemForm, submit: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
  <label for="item">Item name</label>
  <input id="item" name="item" value="{name}">
  <label for="num_need">Number needed</label>
  <input id="num_need" name="num_need" value="{need}">
  <label for="num_have">Number in inventory</label>
  <input id="num_have" name="num_have" value="{have}">
  <button type="submit">{submit}</button>
</form>"#,
        action = action,
        name = escape(&form.item),
        need = escape(&form.num_need),
        have = escape(&form.num_have),
        submit = submit,
    )
}

fn credentials_form(heading: &str, action: &str, username: &str, note: &str) -> String {
    format!(
        r#"<h1>{heading}</h1>
<form method="post" action="{action}">
  <label for="username">Username</label>
  <input id="username" name="username" value="{username}">
  <label for="password">Password</label>
  <input id="password" name="password" type="password">
  <button type="submit">{heading}</button>
</form>
{note}"#,
        heading = heading,
        action = action,
        username = escape(username),
        note = note,
    )
}
