use std::{pin::pin, sync::Arc, time::Duration};

use futures::{StreamExt, stream};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::{
    aggregate::BatchAggregator,
    batch,
    error::PipelineError,
    fetcher::ItemFetcher,
    transport::Transport,
    types::{Identifier, ResultMap},
};

pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

/// Run parameters, fixed for the lifetime of a [`Pipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub batch_size: usize,
    pub request_timeout: Duration,
    pub max_body_bytes: u64,
    /// Ceiling on simultaneous requests. `None` means `batch_size`.
    pub max_in_flight: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_in_flight: None,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.batch_size == 0 {
            return Err(PipelineError::InvalidArgument(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.max_in_flight == Some(0) {
            return Err(PipelineError::InvalidArgument(
                "max in flight must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(PipelineError::InvalidArgument(
                "request timeout must be positive".to_string(),
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(PipelineError::InvalidArgument(
                "max body bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Never more than the semaphore can hold.
    pub fn in_flight_limit(&self) -> usize {
        self.max_in_flight
            .unwrap_or(self.batch_size)
            .min(Semaphore::MAX_PERMITS)
    }

    /// Enough batches to keep the in-flight ceiling saturated.
    pub fn concurrent_batches(&self) -> usize {
        self.in_flight_limit().div_ceil(self.batch_size).max(1)
    }
}

/// Splits identifiers into batches, runs them concurrently and merges the results.
pub struct Pipeline {
    config: PipelineConfig,
    transport: Arc<dyn Transport>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    /// Runs to completion or until `cancel` fires.
    ///
    /// Per-item failures never surface here; they are recorded as
    /// [`crate::FetchOutcome::Failure`]. Cancellation drops every in-flight fetch and
    /// returns [`PipelineError::Cancelled`]. When the same identifier ends up in two
    /// batches, the batch that completes last wins.
    pub async fn run<I>(
        &self,
        identifiers: I,
        cancel: &CancellationToken,
    ) -> Result<ResultMap, PipelineError>
    where
        I: IntoIterator<Item = Identifier>,
    {
        let batches = batch::split(identifiers, self.config.batch_size)?;
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let fetcher = ItemFetcher::new(
            Arc::clone(&self.transport),
            Arc::new(Semaphore::new(self.config.in_flight_limit())),
            self.config.request_timeout,
            self.config.max_body_bytes,
        );
        let aggregator = BatchAggregator::new(fetcher);
        let concurrent_batches = self.config.concurrent_batches();
        log::debug!(
            "pipeline: batch_size={}, in_flight={}, concurrent_batches={}",
            self.config.batch_size,
            self.config.in_flight_limit(),
            concurrent_batches
        );

        let work = async {
            let mut completed = pin!(
                stream::iter(batches)
                    .map(|batch| aggregator.run_batch(batch))
                    .buffer_unordered(concurrent_batches)
            );

            let mut merged = ResultMap::new();
            let mut done = 0usize;
            while let Some(batch_map) = completed.next().await {
                done += 1;
                log::debug!("pipeline: batch {} finished with {} entries", done, batch_map.len());
                merged.extend(batch_map);
            }
            merged
        };

        let merged = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::warn!("pipeline: cancelled, dropping in-flight fetches");
                return Err(PipelineError::Cancelled);
            }
            merged = work => merged,
        };

        let ok = merged.values().filter(|o| o.is_success()).count();
        log::info!(
            "pipeline: {} identifiers, {} resolved, {} failed",
            merged.len(),
            ok,
            merged.len() - ok
        );
        Ok(merged)
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
