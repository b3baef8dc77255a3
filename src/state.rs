use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::auth::{
    jwt::SessionKeys,
    repo::{MemoryUserStore, PgUserStore, UserStore},
    services::AuthService,
};
use crate::config::{AppConfig, Environment};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
    pub started_at: Instant,
}

impl AppState {
    /// Reads config from the environment and connects the user store.
    ///
    /// Returns the pool (if any) so the caller can run migrations.
    pub async fn init() -> anyhow::Result<(Self, Option<PgPool>)> {
        let config = AppConfig::from_env()?;

        let (store, pool): (Arc<dyn UserStore>, Option<PgPool>) = match &config.database_url {
            Some(url) => {
                let db = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("connect to database")?;
                info!("database connected");
                (Arc::new(PgUserStore::new(db.clone())), Some(db))
            }
            None => {
                warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
                (Arc::new(MemoryUserStore::new()), None)
            }
        };

        Ok((Self::from_parts(config, store), pool))
    }

    pub fn from_parts(config: AppConfig, store: Arc<dyn UserStore>) -> Self {
        let keys = SessionKeys::from_config(&config.jwt);
        Self {
            auth: Arc::new(AuthService::new(store, keys)),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Isolated state over an empty in-memory store.
    pub fn fake(environment: Environment) -> Self {
        Self::from_parts(
            AppConfig::local("test-secret", environment),
            Arc::new(MemoryUserStore::new()),
        )
    }
}
