pub mod requests;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Verification tokens are valid for 24 hours.
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;
/// Password reset tokens are valid for 2 hours.
pub const PASSWORD_RESET_TTL_HOURS: i64 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    #[serde(skip_serializing)]
    pub provider: Option<String>,
    #[serde(skip_serializing)]
    pub provider_uid: Option<String>,
    pub email_verified: bool,
    #[serde(skip_serializing)]
    pub email_verification_token: Option<String>,
    #[serde(skip_serializing)]
    pub email_verification_sent_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub password_reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub password_reset_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the pending email verification token is past its lifetime.
    pub fn verification_token_expired(&self, now: DateTime<Utc>) -> bool {
        match self.email_verification_sent_at {
            Some(sent_at) => {
                now - sent_at > chrono::Duration::hours(VERIFICATION_TOKEN_TTL_HOURS)
            }
            None => true,
        }
    }

    pub fn password_reset_token_expired(&self, now: DateTime<Utc>) -> bool {
        match self.password_reset_sent_at {
            Some(sent_at) => now - sent_at > chrono::Duration::hours(PASSWORD_RESET_TTL_HOURS),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RevokedToken {
    pub jti: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthLog {
    pub id: i64,
    pub user_id: Option<i64>,
    pub event: String,
    pub success: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Plant {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub variety: Option<String>,
    pub planted_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GrowthRecord {
    pub id: i64,
    pub plant_id: i64,
    pub user_id: i64,
    pub record_number: i32,
    pub note: String,
    pub recorded_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Like {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Follow {
    pub id: i64,
    pub follower_id: i64,
    pub followed_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Guide {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub plant_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub actor_id: i64,
    pub kind: String,
    pub post_id: Option<i64>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user, safe to embed in any response.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email_verified: user.email_verified,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_sent_at(sent_at: Option<DateTime<Utc>>) -> User {
        User {
            id: 1,
            email: "taro@example.com".to_string(),
            name: "太郎".to_string(),
            password_hash: Some("x".to_string()),
            provider: None,
            provider_uid: None,
            email_verified: false,
            email_verification_token: Some("tok".to_string()),
            email_verification_sent_at: sent_at,
            password_reset_token: None,
            password_reset_sent_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn fresh_verification_token_not_expired() {
        let user = user_with_sent_at(Some(Utc::now()));
        assert!(!user.verification_token_expired(Utc::now()));
    }

    #[test]
    fn old_verification_token_expired() {
        let sent = Utc::now() - chrono::Duration::hours(VERIFICATION_TOKEN_TTL_HOURS + 1);
        let user = user_with_sent_at(Some(sent));
        assert!(user.verification_token_expired(Utc::now()));
    }

    #[test]
    fn missing_sent_at_counts_as_expired() {
        let user = user_with_sent_at(None);
        assert!(user.verification_token_expired(Utc::now()));
    }

    #[test]
    fn user_serialization_hides_secrets() {
        let user = user_with_sent_at(Some(Utc::now()));
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("email_verification_token"));
    }
}
