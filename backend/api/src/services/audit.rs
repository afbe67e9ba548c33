//! Audit trail for authentication attempts. Writes are fire-and-forget: a
//! failed audit insert is logged and never fails or delays the request.

use sqlx::PgPool;

use crate::db::audit_repo;

/// Context captured once per request before the pipeline runs.
pub struct AuthAttempt {
    pub pool: PgPool,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl AuthAttempt {
    /// Record one authentication event. Only the event name, user id,
    /// outcome, caller IP, and truncated user-agent are persisted; tokens
    /// and credentials never are.
    pub fn record(&self, event: &'static str, user_id: Option<i64>, success: bool) {
        let pool = self.pool.clone();
        let ip = self.ip.clone();
        let user_agent = self.user_agent.clone();

        tokio::spawn(async move {
            if let Err(e) = audit_repo::record_auth_event(
                &pool,
                user_id,
                event,
                success,
                ip.as_deref(),
                user_agent.as_deref(),
            )
            .await
            {
                tracing::warn!("audit write failed for {}: {}", event, e);
            }
        });
    }
}
