//! Password authentication.
//!
//! Passwords are stored as argon2id PHC strings (`$argon2id$v=19$...`) in
//! the user store. Sign-in always runs one argon2 verification, against a
//! decoy hash when the username is unknown, so a failed sign-in takes the
//! same time whether or not the account exists.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier};
use tally_core::validation::{validate_credentials, ValidationResult};
use tally_core::{User, ValidationError};
use tally_db::{DbError, UserStore};
use tracing::{debug, info};

use crate::error::WebResult;

/// Verified against when the requested user does not exist.
const DECOY_PASSWORD: &str = "tally-decoy-password";

/// Signs users in and registers new accounts.
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    argon2: Argon2<'static>,
    decoy_hash: String,
}

impl Authenticator {
    /// Authenticator with argon2's default cost parameters.
    pub fn new(users: Arc<dyn UserStore>) -> WebResult<Self> {
        Self::with_argon2(users, Argon2::default())
    }

    /// Authenticator hashing with custom argon2id cost parameters.
    pub fn with_params(users: Arc<dyn UserStore>, params: Params) -> WebResult<Self> {
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        Self::with_argon2(users, argon2)
    }

    fn with_argon2(users: Arc<dyn UserStore>, argon2: Argon2<'static>) -> WebResult<Self> {
        let decoy_hash = hash_with(&argon2, DECOY_PASSWORD)?;
        Ok(Authenticator {
            users,
            argon2,
            decoy_hash,
        })
    }

    /// Hash a password into a PHC string with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> WebResult<String> {
        hash_with(&self.argon2, password)
    }

    /// Whether `username` exists and `password` matches its stored hash.
    pub async fn authenticate(&self, username: &str, password: &str) -> WebResult<bool> {
        let user = self.users.find(username).await?;

        let stored_hash = user
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(self.decoy_hash.as_str());
        let matches = verify_with(&self.argon2, password, stored_hash);

        let authenticated = user.is_some() && matches;
        debug!(%username, authenticated, "Sign-in attempt");
        Ok(authenticated)
    }

    /// Validate and store a new account.
    ///
    /// ## Returns
    /// * `Ok(Ok(()))` - Account created
    /// * `Ok(Err(ValidationError))` - Bad credentials or username taken
    /// * `Err(WebError)` - User store or hashing failure
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> WebResult<ValidationResult<()>> {
        let taken = self.users.exists(username).await?;
        if let Err(e) = validate_credentials(username, password, taken) {
            return Ok(Err(e));
        }

        let user = User {
            username: username.to_string(),
            password_hash: self.hash_password(password)?,
        };

        match self.users.create(&user).await {
            Ok(()) => {
                info!(%username, "Account created");
                Ok(Ok(()))
            }
            // Lost a race with a concurrent signup for the same name
            Err(DbError::UniqueViolation { .. }) => Ok(Err(ValidationError::UsernameTaken)),
            Err(e) => Err(e.into()),
        }
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> WebResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_with(argon2: &Argon2<'_>, password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}


#[cfg(test)]
mod tests {
    use super::test_support::fast_params;
    use super::*;
    use tally_db::MemoryUserStore;

    fn authenticator() -> Authenticator {
        Authenticator::with_params(Arc::new(MemoryUserStore::new()), fast_params()).unwrap()
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let auth = authenticator();

        assert_eq!(auth.register("admin", "secret123").await.unwrap(), Ok(()));

        assert!(auth.authenticate("admin", "secret123").await.unwrap());
        assert!(!auth.authenticate("admin", "secret124").await.unwrap());
        assert!(!auth.authenticate("nobody", "secret123").await.unwrap());
    }

    #[tokio::test]
    async fn test_password_is_not_stored_in_clear() {
        let users = Arc::new(MemoryUserStore::new());
        let auth = Authenticator::with_params(users.clone(), fast_params()).unwrap();

        auth.register("admin", "secret123").await.unwrap().unwrap();

        let stored = users.find("admin").await.unwrap().unwrap();
        assert!(stored.password_hash.starts_with("$argon2id$"));
        assert!(!stored.password_hash.contains("secret123"));
    }

    #[tokio::test]
    async fn test_register_rejects_taken_username() {
        let auth = authenticator();
        auth.register("admin", "secret123").await.unwrap().unwrap();

        assert_eq!(
            auth.register("admin", "another-password").await.unwrap(),
            Err(ValidationError::UsernameTaken)
        );
    }

    #[tokio::test]
    async fn test_register_checks_format_first() {
        let auth = authenticator();
        auth.register("admin", "secret123").await.unwrap().unwrap();

        // Short password reported even though the name is also taken
        assert_eq!(
            auth.register("admin", "short").await.unwrap(),
            Err(ValidationError::PasswordLength)
        );
        assert_eq!(
            auth.register("", "secret123").await.unwrap(),
            Err(ValidationError::UsernameLength)
        );
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let argon2 = Argon2::default();
        assert!(!verify_with(&argon2, "secret123", "plaintext"));
    }
}
