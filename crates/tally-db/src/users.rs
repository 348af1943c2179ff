//! # User Document Store
//!
//! Credentials live outside the relational database, one JSON document per
//! user.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Redis                                                                  │
//! │                                                                         │
//! │  HASH tally:users                                                       │
//! │  ├── "alice" → {"username":"alice","password_hash":"$argon2id$..."}     │
//! │  └── "bob"   → {"username":"bob","password_hash":"$argon2id$..."}       │
//! │                                                                         │
//! │  create = HSETNX  (atomic: a second signup for "alice" is rejected)    │
//! │  find   = HGET                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`MemoryUserStore`] keeps the same contract in a map, for tests and for
//! running without Redis.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tally_core::User;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Redis hash holding every user document.
pub const USERS_KEY: &str = "tally:users";

/// Storage for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Loads a user by exact username.
    async fn find(&self, username: &str) -> DbResult<Option<User>>;

    /// Stores a new user.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Username already stored
    async fn create(&self, user: &User) -> DbResult<()>;

    /// Whether `username` is registered.
    async fn exists(&self, username: &str) -> DbResult<bool> {
        Ok(self.find(username).await?.is_some())
    }
}

// =============================================================================
// Redis
// =============================================================================

/// Redis-backed user store.
#[derive(Clone)]
pub struct RedisUserStore {
    conn: ConnectionManager,
}

impl RedisUserStore {
    /// Connects to Redis at `url` (e.g. `redis://127.0.0.1/`).
    pub async fn connect(url: &str) -> DbResult<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        let conn = ConnectionManager::new(client).await?;

        info!("Connected to Redis user store");
        Ok(RedisUserStore { conn })
    }
}

#[async_trait]
impl UserStore for RedisUserStore {
    async fn find(&self, username: &str) -> DbResult<Option<User>> {
        debug!(key = USERS_KEY, %username, "HGET");

        let mut conn = self.conn.clone();
        let document: Option<String> = conn.hget(USERS_KEY, username).await?;

        document
            .map(|doc| serde_json::from_str(&doc))
            .transpose()
            .map_err(DbError::from)
    }

    async fn create(&self, user: &User) -> DbResult<()> {
        debug!(key = USERS_KEY, username = %user.username, "HSETNX");

        let document = serde_json::to_string(user)?;
        let mut conn = self.conn.clone();
        let inserted: bool = conn.hset_nx(USERS_KEY, &user.username, document).await?;

        if !inserted {
            return Err(DbError::duplicate("username", &user.username));
        }
        Ok(())
    }
}

// =============================================================================
// In-Memory
// =============================================================================

/// Process-local user store. Accounts vanish on restart.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find(&self, username: &str) -> DbResult<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn create(&self, user: &User) -> DbResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(DbError::duplicate("username", &user.username));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }
}
