//! Concurrent fetch coordination
//!
//! Runs the fetch tasks of one session against a bounded worker pool and
//! blocks until every task has returned. There is no partial-result
//! streaming, no per-task progress, and no cancellation once started; a
//! hung subprocess stalls the whole session.

use super::{AudioFetcher, FetchFailure, FetchTask};
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Outcome of running one session's task list
///
/// Per-task failures are recorded here instead of being surfaced; only the
/// zero-success aggregate becomes a user-visible error (checked by the
/// caller via [`FetchReport::succeeded`]).
#[derive(Debug)]
pub struct FetchReport {
    /// Number of tasks submitted
    pub attempted: usize,
    /// Number of tasks that completed without a failure
    pub succeeded: usize,
    /// The failed queries and why they failed
    pub failures: Vec<(String, FetchFailure)>,
}

impl FetchReport {
    /// True when not a single task produced a file
    pub fn all_failed(&self) -> bool {
        self.succeeded == 0
    }
}

/// Execute all tasks with at most `worker_count` in flight
///
/// Blocks until the last task has completed. Each failure is logged at
/// `warn` and swallowed into the report.
pub async fn run_tasks(
    fetcher: Arc<dyn AudioFetcher>,
    tasks: Vec<FetchTask>,
    worker_count: usize,
) -> FetchReport {
    let attempted = tasks.len();
    tracing::info!(tasks = attempted, workers = worker_count, "starting fetch batch");

    let results: Vec<(String, std::result::Result<(), FetchFailure>)> =
        stream::iter(tasks.into_iter().map(|task| {
            let fetcher = fetcher.clone();
            async move {
                let outcome = fetcher.fetch(&task).await;
                (task.query, outcome)
            }
        }))
        .buffer_unordered(worker_count.max(1))
        .collect()
        .await;

    let mut succeeded = 0;
    let mut failures = Vec::new();
    for (query, outcome) in results {
        match outcome {
            Ok(()) => succeeded += 1,
            Err(failure) => {
                tracing::warn!(query = %query, error = %failure, "fetch task failed");
                failures.push((query, failure));
            }
        }
    }

    tracing::info!(attempted, succeeded, failed = failures.len(), "fetch batch finished");

    FetchReport {
        attempted,
        succeeded,
        failures,
    }
}
