//! External identity provider integration. The provider's own verification
//! service is an opaque dependency: we hand it a provider token and get
//! back a verified identity tuple, or a rejection.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;

/// Verified identity as returned by the provider.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub provider: String,
    pub provider_uid: String,
    pub email: String,
    pub name: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a provider-issued token and return the identity it proves.
    async fn verify(&self, provider_token: &str) -> Result<VerifiedIdentity, AppError>;
}

/// Google's tokeninfo endpoint implementation.
pub struct GoogleIdentityProvider {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct TokenInfoResponse {
    sub: String,
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email_verified: String,
}

impl GoogleIdentityProvider {
    pub fn new() -> Self {
        Self::with_endpoint("https://oauth2.googleapis.com/tokeninfo")
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

impl Default for GoogleIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn verify(&self, provider_token: &str) -> Result<VerifiedIdentity, AppError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("id_token", provider_token)])
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("identity provider unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::InvalidCredentials);
        }

        let info: TokenInfoResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("identity provider response: {}", e)))?;

        if info.email_verified != "true" {
            return Err(AppError::InvalidCredentials);
        }

        let name = display_name(info.name, &info.email);

        Ok(VerifiedIdentity {
            provider: "google".to_string(),
            provider_uid: info.sub,
            email: info.email,
            name,
        })
    }
}

/// Providers may omit the display name; the address stands in for it.
fn display_name(name: String, email: &str) -> String {
    if name.is_empty() {
        email.to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_name_is_kept() {
        assert_eq!(
            display_name("山田太郎".to_string(), "taro@example.com"),
            "山田太郎"
        );
    }

    #[test]
    fn missing_name_falls_back_to_email() {
        assert_eq!(
            display_name(String::new(), "taro@example.com"),
            "taro@example.com"
        );
    }
}
