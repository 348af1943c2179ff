//! # Router
//!
//! URL table and the thin adapters between axum extractors and handlers.
//!
//! ```text
//! GET  /                                         → /categories
//! GET  /categories                                 list (public)
//! GET  /categories/new              POST           create category
//! GET  /categories/{id}                            show category + items
//! GET  /categories/{id}/update      POST           rename
//!      /categories/{id}/delete_confirm  POST       confirm page
//!      /categories/{id}/destroy         POST       delete
//! GET  /categories/{id}/items/new   POST           add item
//! GET  /categories/{id}/items/{item_id}/update  POST   edit item
//!      /categories/{id}/items/{item_id}/delete_confirm  POST
//!      /categories/{id}/items/{item_id}/destroy         POST
//! GET  /users/signin                POST           sign in
//!      /users/signout                   POST       sign out
//! GET  /users/create                POST           create account
//! GET  /health                                     liveness (database ping)
//! *                                              → / with "not found" flash
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::context::{Outcome, RequestContext};
use crate::error::WebResult;
use crate::forms::{CategoryForm, CredentialsForm, DeleteForm, ItemForm, PageParam, Submitted};
use crate::handlers::{self, categories, items, users};
use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        // Categories
        .route("/categories", get(category_index))
        .route("/categories/new", get(category_new_form).post(category_create))
        .route("/categories/{id}", get(category_show))
        .route(
            "/categories/{id}/update",
            get(category_edit_form).post(category_update),
        )
        .route("/categories/{id}/delete_confirm", post(category_confirm_delete))
        .route("/categories/{id}/destroy", post(category_destroy))
        // Items
        .route("/categories/{id}/items/new", get(item_new_form).post(item_create))
        .route(
            "/categories/{id}/items/{item_id}/update",
            get(item_edit_form).post(item_update),
        )
        .route(
            "/categories/{id}/items/{item_id}/delete_confirm",
            post(item_confirm_delete),
        )
        .route("/categories/{id}/items/{item_id}/destroy", post(item_destroy))
        // Users
        .route("/users/signin", get(signin_form).post(signin))
        .route("/users/signout", post(signout))
        .route("/users/create", get(signup_form).post(signup))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
    }
}

async fn home(ctx: RequestContext) -> WebResult<Response> {
    ctx.respond(Outcome::redirect("/categories"))
}

async fn not_found(mut ctx: RequestContext) -> WebResult<Response> {
    let outcome = handlers::not_found(&mut ctx);
    ctx.respond(outcome)
}

// =============================================================================
// Categories
// =============================================================================

async fn category_index(
    mut ctx: RequestContext,
    page: PageParam,
) -> WebResult<Response> {
    let outcome = categories::index(&mut ctx, page.as_deref()).await?;
    ctx.respond(outcome)
}

async fn category_new_form(mut ctx: RequestContext) -> WebResult<Response> {
    let outcome = categories::new_form(&mut ctx).await?;
    ctx.respond(outcome)
}

async fn category_create(
    mut ctx: RequestContext,
    Submitted(form): Submitted<CategoryForm>,
) -> WebResult<Response> {
    let outcome = categories::create(&mut ctx, &form).await?;
    ctx.respond(outcome)
}

async fn category_show(
    mut ctx: RequestContext,
    Path(id): Path<String>,
    page: PageParam,
) -> WebResult<Response> {
    let outcome = categories::show(&mut ctx, &id, page.as_deref()).await?;
    ctx.respond(outcome)
}

async fn category_edit_form(
    mut ctx: RequestContext,
    Path(id): Path<String>,
) -> WebResult<Response> {
    let outcome = categories::edit_form(&mut ctx, &id).await?;
    ctx.respond(outcome)
}

async fn category_update(
    mut ctx: RequestContext,
    Path(id): Path<String>,
    Submitted(form): Submitted<CategoryForm>,
) -> WebResult<Response> {
    let outcome = categories::update(&mut ctx, &id, &form).await?;
    ctx.respond(outcome)
}

async fn category_confirm_delete(
    mut ctx: RequestContext,
    Path(id): Path<String>,
) -> WebResult<Response> {
    let outcome = categories::confirm_delete(&mut ctx, &id).await?;
    ctx.respond(outcome)
}

async fn category_destroy(
    mut ctx: RequestContext,
    Path(id): Path<String>,
    Submitted(form): Submitted<DeleteForm>,
) -> WebResult<Response> {
    let outcome = categories::destroy(&mut ctx, &id, &form).await?;
    ctx.respond(outcome)
}

// =============================================================================
// Items
// =============================================================================

async fn item_new_form(mut ctx: RequestContext, Path(id): Path<String>) -> WebResult<Response> {
    let outcome = items::new_form(&mut ctx, &id).await?;
    ctx.respond(outcome)
}

async fn item_create(
    mut ctx: RequestContext,
    Path(id): Path<String>,
    Submitted(form): Submitted<ItemForm>,
) -> WebResult<Response> {
    let outcome = items::create(&mut ctx, &id, &form).await?;
    ctx.respond(outcome)
}

async fn item_edit_form(
    mut ctx: RequestContext,
    Path((id, item_id)): Path<(String, String)>,
) -> WebResult<Response> {
    let outcome = items::edit_form(&mut ctx, &id, &item_id).await?;
    ctx.respond(outcome)
}

async fn item_update(
    mut ctx: RequestContext,
    Path((id, item_id)): Path<(String, String)>,
    Submitted(form): Submitted<ItemForm>,
) -> WebResult<Response> {
    let outcome = items::update(&mut ctx, &id, &item_id, &form).await?;
    ctx.respond(outcome)
}

async fn item_confirm_delete(
    mut ctx: RequestContext,
    Path((id, item_id)): Path<(String, String)>,
) -> WebResult<Response> {
    let outcome = items::confirm_delete(&mut ctx, &id, &item_id).await?;
    ctx.respond(outcome)
}

async fn item_destroy(
    mut ctx: RequestContext,
    Path((id, item_id)): Path<(String, String)>,
    Submitted(form): Submitted<DeleteForm>,
) -> WebResult<Response> {
    let outcome = items::destroy(&mut ctx, &id, &item_id, &form).await?;
    ctx.respond(outcome)
}

// =============================================================================
// Users
// =============================================================================

async fn signin_form(mut ctx: RequestContext) -> WebResult<Response> {
    let outcome = users::signin_form(&mut ctx).await?;
    ctx.respond(outcome)
}

async fn signin(
    mut ctx: RequestContext,
    Submitted(form): Submitted<CredentialsForm>,
) -> WebResult<Response> {
    let outcome = users::signin(&mut ctx, &form).await?;
    ctx.respond(outcome)
}

async fn signout(mut ctx: RequestContext) -> WebResult<Response> {
    let outcome = users::signout(&mut ctx).await?;
    ctx.respond(outcome)
}

async fn signup_form(mut ctx: RequestContext) -> WebResult<Response> {
    let outcome = users::signup_form(&mut ctx).await?;
    ctx.respond(outcome)
}

async fn signup(
    mut ctx: RequestContext,
    Submitted(form): Submitted<CredentialsForm>,
) -> WebResult<Response> {
    let outcome = users::signup(&mut ctx, &form).await?;
    ctx.respond(outcome)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
    use axum::http::Request;
    use tower::ServiceExt;

    use tally_core::ValidationError;

    use crate::handlers::{CATEGORY_CREATED, PAGE_NOT_FOUND, SIGN_IN_REQUIRED};
    use crate::session::{Session, SESSION_COOKIE};
    use crate::state::test_support::state;

    fn location(response: &Response) -> &str {
        response.headers()[LOCATION].to_str().unwrap()
    }

    /// Session written by the response's `Set-Cookie`.
    fn session_of(state: &AppState, response: &Response) -> Session {
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        let token = cookie
            .strip_prefix(&format!("{}=", SESSION_COOKIE))
            .and_then(|rest| rest.split(';').next())
            .unwrap();
        state.sessions.decode(token)
    }

    fn signed_in_cookie(state: &AppState) -> String {
        let mut session = Session::default();
        session.sign_in("admin");
        format!("{}={}", SESSION_COOKIE, state.sessions.encode(&session).unwrap())
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_home_redirects_to_categories() {
        let state = state().await;

        let response = router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/categories");
    }

    #[tokio::test]
    async fn test_health() {
        let state = state().await;

        let response = router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn test_unknown_route_flashes_and_goes_home() {
        let state = state().await;

        let response = router(state.clone())
            .oneshot(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(session_of(&state, &response).error(), Some(PAGE_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_wrong_method_is_not_found() {
        let state = state().await;

        let response = router(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/categories/1/destroy")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(location(&response), "/");
        assert_eq!(session_of(&state, &response).error(), Some(PAGE_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_protected_page_requires_sign_in() {
        let state = state().await;

        let response = router(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/categories/new")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(location(&response), "/users/signin");
        let session = session_of(&state, &response);
        assert_eq!(session.error(), Some(SIGN_IN_REQUIRED));
        assert_eq!(session.path(), Some("/categories/new"));
    }

    #[tokio::test]
    async fn test_create_category_then_list() {
        let state = state().await;
        let app = router(state.clone());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/categories/new")
                    .header(COOKIE, signed_in_cookie(&state))
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("category=Kitchen"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/categories");
        let cookie = response.headers()[SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        assert_eq!(session_of(&state, &response).success(), Some(CATEGORY_CREATED));

        // The flash is shown once, on the next rendered page
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/categories")
                    .header(COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(session_of(&state, &response).success(), None);
        let html = body_text(response).await;
        assert!(html.contains(CATEGORY_CREATED));
        assert!(html.contains("Kitchen"));
        assert!(html.contains("Signed in as admin"));
    }

    #[tokio::test]
    async fn test_repeated_page_uses_first_value() {
        let state = state().await;
        let app = router(state.clone());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/categories?page=0&page=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/categories?page=1&page=0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/categories");
        assert_eq!(
            session_of(&state, &response).error(),
            Some(ValidationError::InvalidPage.to_string().as_str())
        );
    }

    #[tokio::test]
    async fn test_undecodable_form_reads_as_empty() {
        let state = state().await;
        let app = router(state.clone());
        let message = ValidationError::CategoryNameLength.to_string();

        let bodies = [
            ("application/x-www-form-urlencoded", "category=Kitchen&category=Garage"),
            ("text/plain", "category=Kitchen"),
        ];
        for (content_type, body) in bodies {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/categories/new")
                        .header(COOKIE, signed_in_cookie(&state))
                        .header(CONTENT_TYPE, content_type)
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "{}", content_type);
            assert!(body_text(response).await.contains(&message));
        }
    }
}
