use std::time::Duration;

/// Errors that abort a whole pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("pipeline cancelled")]
    Cancelled,
}

/// Per-item fetch/decode failure. Never leaves [`crate::fetcher::ItemFetcher`]; it is
/// logged there and folded into [`crate::FetchOutcome::Failure`].
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("response body exceeds {limit} bytes")]
    TooLarge { limit: u64 },
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
    /// The permit pool handed to [`crate::fetcher::ItemFetcher::new`] was closed by its
    /// owner; outstanding and later fetches stop without touching the network.
    #[error("fetch permits closed")]
    PermitsClosed,
}

impl FetchError {
    /// Classify a reqwest error, surfacing its timeouts as [`FetchError::Timeout`].
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else {
            FetchError::Request(err)
        }
    }
}
