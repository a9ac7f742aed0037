use async_trait::async_trait;
use serde_json::json;

use super::IdentityProvider;
use crate::error::Result;

/// HTTP client for the Clerk Backend API
pub struct ClerkClient {
    http: reqwest::Client,
    secret_key: String,
    api_url: String,
}

impl ClerkClient {
    /// Create a client with the given bearer token and API base URL
    /// (normally `https://api.clerk.com/v1`)
    pub fn new(secret_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into();
        Self {
            http: reqwest::Client::new(),
            secret_key: secret_key.into(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn metadata_url(&self, clerk_id: &str) -> String {
        format!("{}/users/{}/metadata", self.api_url, clerk_id)
    }
}

#[async_trait]
impl IdentityProvider for ClerkClient {
    async fn update_user_metadata(&self, clerk_id: &str, user_id: &str) -> Result<()> {
        let body = json!({
            "public_metadata": {
                "userId": user_id,
            }
        });

        self.http
            .patch(self.metadata_url(clerk_id))
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!(
            clerk_id = clerk_id,
            user_id = user_id,
            "public metadata updated"
        );
        Ok(())
    }
}

impl std::fmt::Debug for ClerkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClerkClient")
            .field("secret_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .finish()
    }
}
