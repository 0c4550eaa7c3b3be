//! Bounded concurrent execution of sub-requests.

use futures::stream::{self, StreamExt};
use std::future::Future;
use tracing::debug;

use stratus_types::Result;

/// Runs `tasks` through `run` with at most `worker_limit` in flight,
/// returning the results in input order.
///
/// Workers complete in arbitrary order; results are reassembled by each
/// task's original position so downstream merging stays deterministic. The
/// first error aborts the logical call: no further tasks are started and
/// results of tasks already in flight are discarded. Retryable failures
/// are expected to have been absorbed by the transport before they reach
/// this point.
pub async fn execute_concurrently<T, F, Fut, R>(
    tasks: Vec<T>,
    worker_limit: usize,
    run: F,
) -> Result<Vec<R>>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let total = tasks.len();
    let concurrency = worker_limit.max(1);
    debug!(total, concurrency, "dispatching sub-requests");

    let mut in_flight = stream::iter(tasks.into_iter().enumerate())
        .map(|(index, task)| {
            let fut = run(task);
            async move { (index, fut.await) }
        })
        .buffer_unordered(concurrency);

    let mut completed: Vec<(usize, R)> = Vec::with_capacity(total);
    while let Some((index, result)) = in_flight.next().await {
        completed.push((index, result?));
    }

    completed.sort_by_key(|(index, _)| *index);
    Ok(completed.into_iter().map(|(_, result)| result).collect())
}
