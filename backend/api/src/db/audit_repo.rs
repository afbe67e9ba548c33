use sqlx::PgPool;

/// User agents are stored truncated; long strings are attack surface, not
/// signal.
pub const USER_AGENT_MAX_LEN: usize = 255;

/// Append an authentication audit row. Never stores credentials or token
/// contents.
pub async fn record_auth_event(
    pool: &PgPool,
    user_id: Option<i64>,
    event: &str,
    success: bool,
    ip_address: Option<&str>,
    user_agent: Option<&str>,
) -> Result<(), sqlx::Error> {
    let truncated_agent = user_agent.map(truncate_user_agent);

    sqlx::query(
        r#"
        INSERT INTO auth_logs (user_id, event, success, ip_address, user_agent)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(user_id)
    .bind(event)
    .bind(success)
    .bind(ip_address)
    .bind(truncated_agent)
    .execute(pool)
    .await?;

    Ok(())
}

fn truncate_user_agent(agent: &str) -> String {
    if agent.len() <= USER_AGENT_MAX_LEN {
        agent.to_string()
    } else {
        agent
            .char_indices()
            .take_while(|(i, _)| *i < USER_AGENT_MAX_LEN)
            .map(|(_, c)| c)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_agent_unchanged() {
        assert_eq!(truncate_user_agent("curl/8.0"), "curl/8.0");
    }

    #[test]
    fn long_agent_truncated() {
        let long = "x".repeat(1000);
        assert_eq!(truncate_user_agent(&long).len(), USER_AGENT_MAX_LEN);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let long = "あ".repeat(200); // 3 bytes each
        let truncated = truncate_user_agent(&long);
        assert!(truncated.len() <= USER_AGENT_MAX_LEN);
        assert!(truncated.chars().all(|c| c == 'あ'));
    }
}
