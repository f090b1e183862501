use crate::constants::{SOCIAL_BASE_URL, SOCIAL_SOURCE};
use crate::error::{DatalensError, Result};
use crate::types::RawRecord;
use std::time::Duration;
use tracing::{info, instrument};

/// Fetches an account's follower list in a single `followers/list` call.
/// The service caps one call at 200 users; accounts above the cap are
/// truncated (pagination is deliberately unimplemented).
pub struct SocialClient {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl SocialClient {
    pub fn new(bearer_token: String, timeout_seconds: u64) -> Result<Self> {
        Self::with_base_url(SOCIAL_BASE_URL, bearer_token, timeout_seconds)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        bearer_token: String,
        timeout_seconds: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            bearer_token,
        })
    }

    /// Fetch up to `cap` followers of `handle` as raw user objects.
    /// Field extraction happens in the transformer, not here.
    #[instrument(skip(self))]
    pub async fn fetch_followers(&self, handle: &str, cap: u32) -> Result<Vec<RawRecord>> {
        let count = cap.to_string();
        let response = self
            .client
            .get(format!("{}/followers/list.json", self.base_url))
            .query(&[("screen_name", handle), ("count", count.as_str())])
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = if status.as_u16() == 401 || status.as_u16() == 403 {
                format!("authentication failed (HTTP {})", status.as_u16())
            } else {
                format!("HTTP {}", status.as_u16())
            };
            return Err(DatalensError::source_unavailable(SOCIAL_SOURCE, message));
        }

        let body: serde_json::Value = response.json().await?;
        let users = body["users"]
            .as_array()
            .ok_or_else(|| DatalensError::MissingField("users".to_string()))?
            .clone();

        info!("Fetched {} followers for @{}", users.len(), handle);
        Ok(users)
    }
}
