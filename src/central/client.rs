use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

use crate::models::{Assignment, Credentials, ProfileRef};

use super::types::{bulk_body, ScopeMapCreate};

/// Central configuration API client
pub struct CentralClient {
    base_url: String,
    token: String,
    client: Client,
}

impl CentralClient {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
            token: credentials.access_token.clone(),
            client,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/network-config/v1alpha1{}", self.base_url, path)
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Test connectivity to Central before any profile work
    pub async fn test_connection(&self) -> bool {
        match self
            .client
            .get(self.api_url("/scope-maps?limit=1"))
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// Create a profile under the given endpoint in bulk form.
    /// Returns the platform's response body, surfaced to the user.
    pub async fn create_profile(
        &self,
        endpoint: &str,
        bulk_key: &str,
        payload: &serde_json::Value,
    ) -> Result<String> {
        let resp = self
            .client
            .post(self.api_url(&format!("/{}", endpoint)))
            .header("Authorization", self.auth_header())
            .json(&bulk_body(bulk_key, payload))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Central API error {}: {}", status, body));
        }

        Ok(resp.text().await?)
    }

    /// Attach a created profile to a scope for devices of the given
    /// persona. Transport errors are Err; the platform's verdict is
    /// the returned bool.
    pub async fn assign_profile_to_scope(
        &self,
        profile: &ProfileRef,
        assignment: &Assignment,
    ) -> Result<bool> {
        let resp = self
            .client
            .post(self.api_url("/scope-maps"))
            .header("Authorization", self.auth_header())
            .json(&ScopeMapCreate {
                profile: profile.to_string(),
                persona: assignment.device_persona.clone(),
                scope_type: assignment.scope_type.clone(),
                scope_name: assignment.scope_name.clone(),
            })
            .send()
            .await?;

        Ok(resp.status().is_success())
    }
}
