//! Shared application state.

use std::sync::Arc;

use tally_db::Database;

use crate::auth::Authenticator;
use crate::config::AppConfig;
use crate::context::RequestContext;
use crate::error::WebResult;
use crate::session::{Session, SessionCodec};

/// State shared by every request. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: Arc<Authenticator>,
    pub sessions: Arc<SessionCodec>,
}

impl AppState {
    pub fn new(db: Database, auth: Authenticator, config: &AppConfig) -> Self {
        let sessions = SessionCodec::new(
            config.session_secret.as_bytes(),
            config.session_lifetime_secs,
            config.secure_cookies,
        );

        AppState {
            db,
            auth: Arc::new(auth),
            sessions: Arc::new(sessions),
        }
    }

    /// Open the context for one request: checks out its connection.
    pub async fn context(
        &self,
        session: Session,
        path: impl Into<String>,
    ) -> WebResult<RequestContext> {
        let storage = self.db.acquire().await?;

        Ok(RequestContext::new(
            session,
            storage,
            self.auth.clone(),
            self.sessions.clone(),
            path.into(),
        ))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::auth::test_support::fast_params;
    use tally_db::{DbConfig, MemoryUserStore};

    /// State over a fresh in-memory database and user store.
    pub async fn state() -> AppState {
        let config = AppConfig::from_builder(AppConfig::defaults().unwrap()).unwrap();
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = Arc::new(MemoryUserStore::new());
        let auth = Authenticator::with_params(users, fast_params()).unwrap();

        AppState::new(db, auth, &config)
    }

    /// Context for a request to `path` by a signed-in user.
    pub async fn signed_in(state: &AppState, path: &str) -> RequestContext {
        let mut session = Session::default();
        session.sign_in("admin");
        state.context(session, path).await.unwrap()
    }

    /// Context for a request to `path` by an anonymous visitor.
    pub async fn anonymous(state: &AppState, path: &str) -> RequestContext {
        state.context(Session::default(), path).await.unwrap()
    }
}
