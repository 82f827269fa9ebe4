use std::{sync::Arc, time::Duration};

use tokio::sync::Semaphore;

use crate::{
    decode,
    error::FetchError,
    transport::Transport,
    types::{Dimensions, FetchOutcome, Identifier},
};

/// Fetches one identifier and decodes its dimensions.
///
/// Cloning is cheap: the transport and the permit pool are shared.
#[derive(Clone)]
pub struct ItemFetcher {
    transport: Arc<dyn Transport>,
    permits: Arc<Semaphore>,
    timeout: Duration,
    max_body_bytes: u64,
}

impl ItemFetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        permits: Arc<Semaphore>,
        timeout: Duration,
        max_body_bytes: u64,
    ) -> Self {
        Self {
            transport,
            permits,
            timeout,
            max_body_bytes,
        }
    }

    /// Never fails: every per-item error becomes [`FetchOutcome::Failure`].
    pub async fn fetch(&self, id: Identifier) -> (Identifier, FetchOutcome) {
        match self.try_fetch(&id).await {
            Ok(dimensions) => {
                log::trace!("{}: {}", id, dimensions);
                (id, FetchOutcome::Success(dimensions))
            }
            Err(e) => {
                log::debug!("{}: {}", id, e);
                (id, FetchOutcome::Failure)
            }
        }
    }

    async fn try_fetch(&self, id: &str) -> Result<Dimensions, FetchError> {
        let bytes = {
            // The permit only covers the network part.
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|_| FetchError::PermitsClosed)?;
            tokio::time::timeout(
                self.timeout,
                self.transport.get(id, self.timeout, self.max_body_bytes),
            )
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??
        };
        decode::decode_dimensions(&bytes)
    }
}

#[cfg(test)]
#[path = "fetcher_test.rs"]
mod fetcher_test;
