//! Thin GET wrapper every remote call goes through.
//!
//! One attempt per call. Failures are classified into [`FetchError`] so callers
//! can tell a dead network from a 404 from a malformed body.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::FetchError;
use crate::model::ImageBytes;

#[derive(Clone)]
pub struct FetchClient {
    client: Client,
}

impl FetchClient {
    /// Every request made through this client gives up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// GET `url` and decode the JSON body into `T`
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        self.get(url)
            .await?
            .json::<T>()
            .await
            .map_err(|e| FetchError::from((url, e)))
    }

    /// GET `url` and return the raw body with its declared content type
    pub async fn fetch_binary(&self, url: &str) -> Result<ImageBytes, FetchError> {
        let response = self.get(url).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from((url, e)))?;

        Ok(ImageBytes::new(body.to_vec(), content_type))
    }

    async fn get(&self, url: &str) -> Result<Response, FetchError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from((url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(
                url,
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
            ));
        }

        Ok(response)
    }
}
