use futures::future::join_all;

use crate::{batch::Batch, fetcher::ItemFetcher, types::ResultMap};

/// Runs every fetch of one batch concurrently and folds them into a local map.
pub struct BatchAggregator {
    fetcher: ItemFetcher,
}

impl BatchAggregator {
    pub fn new(fetcher: ItemFetcher) -> Self {
        Self { fetcher }
    }

    /// Resolves once every item of `batch` has an outcome. Nothing is spawned, so
    /// dropping the returned future drops all of its in-flight fetches with it.
    pub async fn run_batch(&self, batch: Batch) -> ResultMap {
        let results = join_all(batch.into_iter().map(|id| self.fetcher.fetch(id))).await;

        // Duplicates within a batch: later entry wins.
        let mut map = ResultMap::new();
        for (id, outcome) in results {
            map.insert(id, outcome);
        }
        map
    }
}
