//! Thin JSON client over the IPFS HTTP API.

use std::io::Cursor;

use futures::TryStreamExt;
use ipfs_api_backend_hyper::{IpfsApi, IpfsClient, TryFromUri};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Error, Result};

pub struct ContentStore {
    client: IpfsClient,
    api_url: String,
}

impl ContentStore {
    pub fn new(api_url: &str) -> Result<Self> {
        let client = IpfsClient::from_str(api_url)
            .map_err(|e| Error::InvalidApiUrl(format!("{api_url}: {e}")))?;
        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Store a JSON value; returns its content hash.
    pub async fn add_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let bytes = serde_json::to_vec(value)?;
        let response = self
            .client
            .add(Cursor::new(bytes))
            .await
            .map_err(|e| Error::ConnectionFailed(e.to_string()))?;
        tracing::debug!(hash = %response.hash, "stored JSON blob");
        Ok(response.hash)
    }

    /// Read back a JSON value by content hash.
    pub async fn get_json<T: DeserializeOwned>(&self, hash: &str) -> Result<T> {
        let bytes = self
            .client
            .cat(hash)
            .map_ok(|chunk| chunk.to_vec())
            .try_concat()
            .await
            .map_err(|_| Error::NotFound(hash.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Pin a hash so the node keeps it.
    pub async fn pin(&self, hash: &str) -> Result<()> {
        self.client
            .pin_add(hash, true)
            .await
            .map_err(|e| Error::PinFailed {
                hash: hash.to_string(),
                reason: e.to_string(),
            })?;
        tracing::debug!(hash, "pinned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_accepts_api_url() {
        let store = ContentStore::new("http://127.0.0.1:5001").unwrap();
        assert_eq!(store.api_url(), "http://127.0.0.1:5001");
    }

    #[test]
    fn test_constructor_rejects_garbage_url() {
        assert!(ContentStore::new("not a url at all").is_err());
    }
}
