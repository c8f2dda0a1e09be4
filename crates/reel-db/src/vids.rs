//! Video record queries.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A video record as the index serves it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoRecord {
    pub id: String,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub ipfs_hash: String,
    pub price: u64,
    pub duration: Option<String>,
}

pub struct DbClient {
    http: reqwest::Client,
    provider: String,
}

impl DbClient {
    /// `provider` is the API root, e.g. `https://index.reel.video/api/v1/`.
    pub fn new(provider: &str) -> Self {
        let provider = if provider.ends_with('/') {
            provider.to_string()
        } else {
            format!("{provider}/")
        };
        Self {
            http: reqwest::Client::new(),
            provider,
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Fetch one video record by id.
    pub async fn video(&self, video_id: &str) -> Result<VideoRecord> {
        let url = format!("{}videos/{video_id}", self.provider);
        let response = self.http.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::VideoNotFound(video_id.to_string()));
        }
        Ok(response.error_for_status()?.json().await?)
    }

    /// Full-text search over the index.
    pub async fn search(&self, keyword: &str) -> Result<Vec<VideoRecord>> {
        let url = format!("{}videos", self.provider);
        let response = self
            .http
            .get(&url)
            .query(&[("s", keyword)])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Whether the provider root answers at all. Never errors; a dead
    /// provider just reads `false`.
    pub async fn check_provider_status(&self) -> bool {
        match self.http.get(&self.provider).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(provider = %self.provider, error = %e, "index provider unreachable");
                false
            }
        }
    }
}
