pub mod audit_repo;
pub mod comment_repo;
pub mod follow_repo;
pub mod growth_record_repo;
pub mod guide_repo;
pub mod like_repo;
pub mod notification_repo;
pub mod plant_repo;
pub mod post_repo;
pub mod sequence_repo;
pub mod token_revocation;
pub mod user_repo;

use crate::config::DatabaseConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../migrations").run(pool).await
}
