//! Wave-based parallel executor

use super::outcome::{BatchSummary, Outcome};
use crate::config::ExecutorConfig;
use futures::FutureExt;
use futures::future::{self, Either, join_all};
use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Runs one operation per item, at most `concurrency` at a time.
///
/// A zero concurrency is coerced to 1. A zero timeout means no timeout.
///
/// When an item loses its timeout race its future is dropped, which stops
/// it at its next suspension point. Work the operation handed off to
/// `tokio::spawn` is detached and keeps running; its result is discarded.
#[derive(Debug, Clone)]
pub struct ParallelExecutor {
    concurrency: usize,
    timeout: Option<Duration>,
    cancellation_token: CancellationToken,
}

impl ParallelExecutor {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            timeout: None,
            cancellation_token: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &ExecutorConfig) -> Self {
        let executor = Self::new(config.concurrency);
        match config.timeout_ms {
            Some(ms) => executor.with_timeout(Duration::from_millis(ms)),
            None => executor,
        }
    }

    /// Race every item against `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Share a parent cancellation scope
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Get a child cancellation token
    pub fn child_token(&self) -> CancellationToken {
        self.cancellation_token.child_token()
    }

    /// Cancel in-flight items and skip the waves that have not started
    pub fn cancel_all(&self) {
        self.cancellation_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    /// Run `op` over `items` in waves and return one outcome per item, in
    /// input order.
    pub async fn run<T, R, E, F, Fut>(&self, items: Vec<T>, op: F) -> Vec<Outcome<R>>
    where
        F: Fn(T, usize) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Display,
    {
        if items.is_empty() {
            return Vec::new();
        }

        let total = items.len();
        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(total);
        let mut pending = items.into_iter().enumerate().peekable();
        let mut wave = 0usize;

        while pending.peek().is_some() {
            let batch: Vec<(usize, T)> = pending.by_ref().take(self.concurrency).collect();

            if self.is_cancelled() {
                outcomes.extend(batch.iter().map(|_| Outcome::cancelled()));
                continue;
            }

            debug!(
                wave,
                size = batch.len(),
                first_index = batch[0].0,
                "Starting batch wave"
            );

            // `op` itself may panic before it hands back a future
            let futures = batch.into_iter().map(|(index, item)| {
                match std::panic::catch_unwind(AssertUnwindSafe(|| op(item, index))) {
                    Ok(operation) => Either::Left(self.settle(index, operation)),
                    Err(payload) => {
                        Either::Right(future::ready(panicked(index, payload.as_ref())))
                    }
                }
            });
            outcomes.extend(join_all(futures).await);
            wave += 1;
        }

        let summary = BatchSummary::from_outcomes(&outcomes);
        debug!(
            total,
            waves = wave,
            succeeded = summary.succeeded,
            failed = summary.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Parallel run finished"
        );

        outcomes
    }

    async fn settle<R, E, Fut>(&self, index: usize, operation: Fut) -> Outcome<R>
    where
        Fut: Future<Output = Result<R, E>>,
        E: Display,
    {
        let guarded = AssertUnwindSafe(operation).catch_unwind();
        let raced = async {
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, guarded)
                    .await
                    .map_err(|_| limit),
                None => Ok(guarded.await),
            }
        };

        tokio::select! {
            _ = self.cancellation_token.cancelled() => {
                debug!(index, "Item cancelled");
                Outcome::cancelled()
            }
            settled = raced => match settled {
                Ok(Ok(Ok(value))) => Outcome::Success(value),
                Ok(Ok(Err(error))) => {
                    debug!(index, error = %error, "Item failed");
                    Outcome::failure(error.to_string())
                }
                Ok(Err(payload)) => panicked(index, payload.as_ref()),
                Err(limit) => {
                    warn!(index, timeout_ms = limit.as_millis() as u64, "Item timed out");
                    Outcome::timed_out(limit)
                }
            }
        }
    }
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::from_config(&ExecutorConfig::default())
    }
}

fn panicked<R>(index: usize, payload: &(dyn Any + Send)) -> Outcome<R> {
    let message = panic_message(payload);
    warn!(index, panic = %message, "Item panicked");
    Outcome::panicked(message)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::FailureKind;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_empty_items_launch_nothing() {
        let calls = AtomicUsize::new(0);
        let executor = ParallelExecutor::new(4);
        let outcomes = executor
            .run(Vec::<u32>::new(), |_, _| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, String>(()) }
            })
            .await;
        assert!(outcomes.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_coerced() {
        let executor = ParallelExecutor::new(0);
        assert_eq!(executor.concurrency(), 1);

        let outcomes = executor
            .run(vec![1, 2, 3], |item, _| async move { Ok::<_, String>(item * 2) })
            .await;
        let values: Vec<_> = outcomes.iter().filter_map(|o| o.value().copied()).collect();
        assert_eq!(values, vec![2, 4, 6]);
    }

    #[tokio::test]
    async fn test_zero_timeout_disables_timeout() {
        let executor = ParallelExecutor::new(2).with_timeout(Duration::ZERO);
        assert_eq!(executor.timeout(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_is_input_order_not_completion_order() {
        let executor = ParallelExecutor::new(4);
        let delays = vec![40u64, 10, 30, 0];
        let outcomes = executor
            .run(delays, |delay, index| async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok::<_, String>(index)
            })
            .await;
        let indices: Vec<_> = outcomes.iter().filter_map(|o| o.value().copied()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_never_exceeds_concurrency() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let high_water = Arc::new(AtomicUsize::new(0));
        let executor = ParallelExecutor::new(3);

        let outcomes = executor
            .run((0..10).collect(), |item: u64, _| {
                let in_flight = in_flight.clone();
                let high_water = high_water.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    high_water.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5 + item % 3)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, String>(item)
                }
            })
            .await;

        assert_eq!(outcomes.len(), 10);
        assert!(outcomes.iter().all(Outcome::is_success));
        assert_eq!(high_water.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_wave_waits_for_previous_wave() {
        let finished = Arc::new(AtomicUsize::new(0));
        let executor = ParallelExecutor::new(2);

        let outcomes = executor
            .run(vec![30u64, 5, 1], |delay, index| {
                let finished = finished.clone();
                async move {
                    let settled_before_start = finished.load(Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    finished.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>((index, settled_before_start))
                }
            })
            .await;

        let observed: Vec<_> = outcomes.iter().filter_map(|o| o.value().copied()).collect();
        assert_eq!(observed, vec![(0, 0), (1, 0), (2, 2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_isolated_per_item() {
        let executor = ParallelExecutor::new(2).with_timeout(Duration::from_millis(10));
        let outcomes = executor
            .run(vec![50u64, 1], |delay, _| async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok::<_, String>(delay)
            })
            .await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].failure_kind(), Some(FailureKind::Timeout));
        assert!(outcomes[0].error().unwrap().contains("timed out after 10ms"));
        assert_eq!(outcomes[1].value(), Some(&1));
    }

    #[tokio::test]
    async fn test_errors_and_panics_are_isolated() {
        let executor = ParallelExecutor::new(3);
        let outcomes = executor
            .run(vec![0u8, 1, 2, 3], |item, _| async move {
                match item {
                    1 => Err(format!("item {item} failed")),
                    2 => panic!("item exploded"),
                    _ => Ok(item),
                }
            })
            .await;

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].value(), Some(&0));
        assert_eq!(outcomes[1].error(), Some("item 1 failed"));
        assert_eq!(outcomes[2].failure_kind(), Some(FailureKind::Panicked));
        assert!(outcomes[2].error().unwrap().contains("item exploded"));
        assert_eq!(outcomes[3].value(), Some(&3));
    }

    #[tokio::test]
    async fn test_panic_before_future_is_built_is_isolated() {
        let executor = ParallelExecutor::new(3);
        let outcomes = executor
            .run(vec![0u8, 1, 2], |item, _| {
                if item == 1 {
                    panic!("could not build operation for item {item}");
                }
                async move { Ok::<_, String>(item) }
            })
            .await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].value(), Some(&0));
        assert_eq!(outcomes[1].failure_kind(), Some(FailureKind::Panicked));
        assert!(
            outcomes[1]
                .error()
                .unwrap()
                .contains("could not build operation for item 1")
        );
        assert_eq!(outcomes[2].value(), Some(&2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_fills_remaining_slots() {
        let executor = ParallelExecutor::new(1);
        let canceller = executor.clone();

        let outcomes = executor
            .run(vec![0u8, 1, 2], |item, _| {
                let canceller = canceller.clone();
                async move {
                    if item == 0 {
                        canceller.cancel_all();
                        // parked until the cancellation branch wins
                        tokio::time::sleep(Duration::from_secs(60)).await;
                    }
                    Ok::<_, String>(item)
                }
            })
            .await;

        assert_eq!(outcomes.len(), 3);
        assert!(
            outcomes
                .iter()
                .all(|o| o.failure_kind() == Some(FailureKind::Cancelled))
        );
    }

    #[test]
    fn test_from_config() {
        let config = ExecutorConfig {
            concurrency: 7,
            timeout_ms: Some(250),
        };
        let executor = ParallelExecutor::from_config(&config);
        assert_eq!(executor.concurrency(), 7);
        assert_eq!(executor.timeout(), Some(Duration::from_millis(250)));
    }
}
