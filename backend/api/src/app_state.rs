//! Central application state; the only place dependencies are wired.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::security::jwt::JwtService;
use crate::services::mailer::Mailer;
use crate::services::oauth::{GoogleIdentityProvider, IdentityProvider};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtService>,
    pub mailer: Arc<Mailer>,
    pub identity_provider: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub async fn initialize(config: Config) -> anyhow::Result<Self> {
        tracing::info!("initializing application state");

        let db = crate::db::create_pool(&config.database).await?;

        crate::db::run_migrations(&db).await?;

        Ok(Self::with_pool(config, db)?)
    }

    /// Wire state over an existing pool. Tests use this with a lazy pool.
    pub fn with_pool(config: Config, db: PgPool) -> anyhow::Result<Self> {
        let jwt = Arc::new(JwtService::new(&config.jwt.secret, config.jwt.ttl_secs));
        let mailer = Arc::new(Mailer::new(&config.email, &config.app.frontend_url)?);
        let identity_provider: Arc<dyn IdentityProvider> =
            Arc::new(GoogleIdentityProvider::new());

        Ok(Self {
            db,
            config: Arc::new(config),
            jwt,
            mailer,
            identity_provider,
        })
    }
}
