//! Raw dataset retrieval from disk or over HTTP.

use flate2::read::GzDecoder;
use reqwest::Client;
use std::io::Read;
use std::time::Duration;
use tracing::{debug, info};

use super::DatasetLocator;
use crate::error::Result;
use crate::models::Role;
use crate::normalize::{normalize, Normalized};

const USER_AGENT: &str = "radius/0.1 (nearby address finder)";

/// Fetches raw dataset bytes. Holds no cache of its own.
#[derive(Clone)]
pub struct DatasetLoader {
    client: Client,
}

impl DatasetLoader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Read the dataset's bytes, decompressing `.gz` content.
    pub async fn fetch(&self, locator: &DatasetLocator) -> Result<Vec<u8>> {
        let bytes = match locator {
            DatasetLocator::Path(path) => tokio::fs::read(path).await?,
            DatasetLocator::Url(url) => {
                debug!("GET {}", url);
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await?
                    .error_for_status()?;
                response.bytes().await?.to_vec()
            }
        };
        info!("Fetched {} bytes from {}", bytes.len(), locator);

        if !locator.is_gzip() {
            return Ok(bytes);
        }

        let mut decoded = Vec::new();
        GzDecoder::new(bytes.as_slice()).read_to_end(&mut decoded)?;
        debug!("Decompressed to {} bytes", decoded.len());
        Ok(decoded)
    }

    /// Fetch and normalize in one step.
    pub async fn load(&self, locator: &DatasetLocator, role: Role) -> Result<Normalized> {
        let bytes = self.fetch(locator).await?;
        normalize(&bytes, role)
    }
}
