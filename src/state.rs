use std::sync::Arc;

use crate::auth::{Credentials, TokenService};
use crate::config::Config;
use crate::error::AppError;
use crate::store::{MemoryStore, PgStore, TodoStore, UserStore};

/// Everything a request handler needs, built once at startup and shared
/// read-only through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Credentials,
    pub todos: Arc<dyn TodoStore>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        todos: Arc<dyn TodoStore>,
        tokens: TokenService,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            credentials: Credentials::new(users, bcrypt_cost),
            todos,
            tokens,
        }
    }

    /// State backed by a fresh [`MemoryStore`].
    pub fn in_memory(tokens: TokenService, bcrypt_cost: u32) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, tokens, bcrypt_cost)
    }

    /// Connects to PostgreSQL and runs migrations when `DATABASE_URL` is set,
    /// otherwise falls back to the in-memory store.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expires_in);

        match &config.database_url {
            Some(url) => {
                let store = Arc::new(PgStore::connect(url).await?);
                store.migrate().await?;
                log::info!("Using PostgreSQL store");
                Ok(Self::new(store.clone(), store, tokens, config.bcrypt_cost))
            }
            None => {
                log::warn!("DATABASE_URL is not set; using the in-memory store, data is lost on restart");
                Ok(Self::in_memory(tokens, config.bcrypt_cost))
            }
        }
    }
}
