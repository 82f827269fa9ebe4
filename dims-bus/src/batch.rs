use crate::{error::PipelineError, types::Identifier};

/// A contiguous, non-empty slice of the input, at most `batch_size` long.
pub type Batch = Vec<Identifier>;

/// Lazily partitions an iterator into consecutive groups of `size` items.
///
/// Only the batch currently being yielded is materialized; the source is pulled on
/// demand, so arbitrarily long inputs never get buffered as a whole.
pub struct Batches<I> {
    iter: I,
    size: usize,
}

impl<I: Iterator> Iterator for Batches<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch: Vec<I::Item> = self.iter.by_ref().take(self.size).collect();
        if batch.is_empty() { None } else { Some(batch) }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        (
            lower.div_ceil(self.size),
            upper.map(|u| u.div_ceil(self.size)),
        )
    }
}

/// Splits `items` into batches of `batch_size`, the last one holding the remainder.
///
/// Order is preserved within and across batches. Empty input yields no batches.
pub fn split<I>(items: I, batch_size: usize) -> Result<Batches<I::IntoIter>, PipelineError>
where
    I: IntoIterator,
{
    if batch_size == 0 {
        return Err(PipelineError::InvalidArgument(
            "batch size must be at least 1".to_string(),
        ));
    }
    Ok(Batches {
        iter: items.into_iter(),
        size: batch_size,
    })
}
