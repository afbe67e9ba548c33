//! Background task management
//!
//! The only long-running task is the revoked-token sweeper: entries in the
//! revocation list are useless once the token itself has expired, so they
//! are deleted on an interval to keep the table small.

use crate::app_state::AppState;
use crate::db::token_revocation;
use chrono::Utc;
use std::time::Duration;

const CLEANUP_INTERVAL_SECS: u64 = 3600;

/// Spawn the revoked-token cleanup worker (hourly).
pub fn spawn_revocation_cleanup(state: &AppState) -> tokio::task::JoinHandle<()> {
    let db = state.db.clone();

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));

        loop {
            interval.tick().await;
            match token_revocation::cleanup_expired(&db, Utc::now()).await {
                Ok(removed) if removed > 0 => {
                    tracing::info!("revocation cleanup removed {} expired entries", removed);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("revocation cleanup failed: {}", e),
            }
        }
    })
}
