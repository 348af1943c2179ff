//! Sign in, sign out and account creation.

use tracing::info;

use super::{ACCOUNT_CREATED, INVALID_CREDENTIALS, SIGNED_OUT, WELCOME};
use crate::context::{Outcome, RequestContext};
use crate::error::WebResult;
use crate::forms::CredentialsForm;
use crate::views::View;

/// `GET /users/signin`
pub async fn signin_form(_ctx: &mut RequestContext) -> WebResult<Outcome> {
    Ok(Outcome::Render(View::SignIn {
        username: String::new(),
    }))
}

/// `POST /users/signin`: on success, continue to the page that required
/// signing in, or home.
pub async fn signin(ctx: &mut RequestContext, form: &CredentialsForm) -> WebResult<Outcome> {
    if !ctx.auth.authenticate(&form.username, &form.password).await? {
        ctx.session.set_error(INVALID_CREDENTIALS);
        return Ok(Outcome::Render(View::SignIn {
            username: form.username.clone(),
        }));
    }

    info!(username = %form.username, "Signed in");
    ctx.session.sign_in(form.username.clone());
    ctx.session.set_success(WELCOME);

    let destination = ctx.session.take_path().unwrap_or_else(|| "/".to_string());
    Ok(Outcome::Redirect(destination))
}

/// `POST /users/signout`
pub async fn signout(ctx: &mut RequestContext) -> WebResult<Outcome> {
    ctx.session.sign_out();
    ctx.session.set_success(SIGNED_OUT);
    Ok(Outcome::redirect("/"))
}

/// `GET /users/create`
pub async fn signup_form(_ctx: &mut RequestContext) -> WebResult<Outcome> {
    Ok(Outcome::Render(View::CreateAccount {
        username: String::new(),
    }))
}

/// `POST /users/create`
pub async fn signup(ctx: &mut RequestContext, form: &CredentialsForm) -> WebResult<Outcome> {
    if let Err(e) = ctx.auth.register(&form.username, &form.password).await? {
        ctx.session.set_error(e.to_string());
        return Ok(Outcome::Render(View::CreateAccount {
            username: form.username.clone(),
        }));
    }

    ctx.session.set_success(ACCOUNT_CREATED);
    Ok(Outcome::redirect("/users/signin"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{redirect_target, rendered};
    use crate::state::test_support::{anonymous, state};

    fn credentials(username: &str, password: &str) -> CredentialsForm {
        CredentialsForm {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_signin() {
        let state = state().await;
        let mut ctx = anonymous(&state, "/users/create").await;

        let outcome = signup(&mut ctx, &credentials("admin", "secret123")).await.unwrap();
        assert_eq!(redirect_target(&outcome), "/users/signin");
        assert_eq!(ctx.session.success(), Some(ACCOUNT_CREATED));

        let outcome = signin(&mut ctx, &credentials("admin", "secret123")).await.unwrap();
        assert_eq!(redirect_target(&outcome), "/");
        assert_eq!(ctx.session.username(), Some("admin"));
        assert_eq!(ctx.session.success(), Some(WELCOME));
    }

    #[tokio::test]
    async fn test_wrong_password_rerenders_signin() {
        let state = state().await;
        let mut ctx = anonymous(&state, "/users/signin").await;
        signup(&mut ctx, &credentials("admin", "secret123")).await.unwrap();

        let view = rendered(signin(&mut ctx, &credentials("admin", "wrong-pass")).await.unwrap());

        assert!(matches!(view, View::SignIn { ref username } if username == "admin"));
        assert_eq!(ctx.session.username(), None);
        assert_eq!(ctx.session.error(), Some(INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_unknown_user_is_invalid_credentials() {
        let state = state().await;
        let mut ctx = anonymous(&state, "/users/signin").await;

        rendered(signin(&mut ctx, &credentials("ghost", "secret123")).await.unwrap());

        assert_eq!(ctx.session.username(), None);
        assert_eq!(ctx.session.error(), Some(INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_signin_returns_to_remembered_path() {
        let state = state().await;
        let mut ctx = anonymous(&state, "/categories/new").await;
        signup(&mut ctx, &credentials("admin", "secret123")).await.unwrap();
        assert!(ctx.require_signed_in().is_some());

        let outcome = signin(&mut ctx, &credentials("admin", "secret123")).await.unwrap();

        assert_eq!(redirect_target(&outcome), "/categories/new");
        assert_eq!(ctx.session.path(), None);
    }

    #[tokio::test]
    async fn test_signout() {
        let state = state().await;
        let mut ctx = anonymous(&state, "/users/signout").await;
        ctx.session.sign_in("admin");

        let outcome = signout(&mut ctx).await.unwrap();

        assert_eq!(redirect_target(&outcome), "/");
        assert!(!ctx.session.is_signed_in());
        assert_eq!(ctx.session.success(), Some(SIGNED_OUT));
    }

    #[tokio::test]
    async fn test_signup_validation_order() {
        let state = state().await;
        let mut ctx = anonymous(&state, "/users/create").await;
        signup(&mut ctx, &credentials("admin", "secret123")).await.unwrap();

        let cases = [
            (
                credentials(&"u".repeat(31), "secret123"),
                "Username must be between 1 and 30 characters.",
            ),
            (credentials("admin", "short"), "Password must be between 7 and 50 characters."),
            (credentials("admin", "secret123"), "Sorry, that username is already taken."),
        ];
        for (form, message) in cases {
            let view = rendered(signup(&mut ctx, &form).await.unwrap());
            assert!(matches!(view, View::CreateAccount { .. }));
            assert_eq!(ctx.session.take_flashes().error.as_deref(), Some(message));
        }
    }
}
