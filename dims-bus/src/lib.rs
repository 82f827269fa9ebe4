//! Concurrent batched fetch of remote images, reporting each image's pixel size.
//!
//! Data flow:
//! ```text
//! identifiers ──► Batches ──► [BatchAggregator] ──► batch ResultMap ──┐
//!                                   │                                    │
//!                                   └─► ItemFetcher per identifier       ▼
//!                                        (Transport + decode)   merged ResultMap
//! ```
//!
//! Every fetch is gated by one shared semaphore, so the number of requests in flight
//! never exceeds the configured ceiling no matter how many batches are running.

pub mod aggregate;
pub mod batch;
pub mod decode;
pub mod error;
pub mod fetcher;
pub mod pipeline;
pub mod report;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{FetchError, PipelineError};
pub use pipeline::{Pipeline, PipelineConfig};
pub use transport::{HttpTransport, Transport};
pub use types::{Dimensions, FetchOutcome, Identifier, ResultMap};
