use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};

use crate::error::FetchError;

/// Acquires the raw bytes behind an identifier.
///
/// Implementations are shared read-only by every concurrent fetch of a run.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration, max_bytes: u64)
    -> Result<Bytes, FetchError>;
}

/// HTTP transport backed by a single pooled `reqwest::Client`.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(FetchError::Request)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        timeout: Duration,
        max_bytes: u64,
    ) -> Result<Bytes, FetchError> {
        let mut response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // Reject early when the server announces an oversize body.
        if let Some(len) = response.content_length() {
            if len > max_bytes {
                return Err(FetchError::TooLarge { limit: max_bytes });
            }
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?
        {
            if (body.len() + chunk.len()) as u64 > max_bytes {
                return Err(FetchError::TooLarge { limit: max_bytes });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body.freeze())
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;
