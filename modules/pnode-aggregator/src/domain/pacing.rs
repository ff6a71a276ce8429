use futures::future::join_all;
use std::future::Future;
use std::time::Duration;

/// Rate-limit policy for per-item calls against a throttled service.
///
/// Items are processed in batches of `batch_size` concurrent calls with a
/// fixed `delay` between consecutive batches (none after the last one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSchedule {
    pub batch_size: usize,
    pub delay: Duration,
}

impl BatchSchedule {
    #[must_use]
    pub fn new(batch_size: usize, delay: Duration) -> Self {
        Self { batch_size, delay }
    }

    /// Run `call` for every item under this schedule.
    ///
    /// Results are returned in input order.
    pub async fn run<T, R, F, Fut>(&self, items: &[T], mut call: F) -> Vec<R>
    where
        F: FnMut(&T) -> Fut,
        Fut: Future<Output = R>,
    {
        let mut results = Vec::with_capacity(items.len());
        let mut batches = items.chunks(self.batch_size.max(1)).enumerate().peekable();

        while let Some((index, batch)) = batches.next() {
            tracing::debug!(batch = index + 1, size = batch.len(), "running batch");
            results.extend(join_all(batch.iter().map(&mut call)).await);

            if batches.peek().is_some() {
                tokio::time::sleep(self.delay).await;
            }
        }

        results
    }
}
