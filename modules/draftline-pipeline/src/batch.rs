//! Concurrent batch generation.
//!
//! Independent content items generate in parallel under a semaphore cap to
//! respect external-service quotas. Retries *within* one item stay strictly
//! sequential; each attempt depends on the previous attempt's word-count
//! feedback.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::info;

use draftline_common::types::GenerationOutcome;
use draftline_common::DraftlineError;

use crate::generation::DraftRunner;
use crate::traits::DraftRequest;

/// Generate a batch of items, at most `concurrency` in flight at once.
/// Results come back in request order; per-item failures don't abort the
/// rest of the batch.
pub async fn generate_batch(
    runner: Arc<DraftRunner>,
    requests: Vec<DraftRequest>,
    concurrency: usize,
) -> Vec<Result<GenerationOutcome, DraftlineError>> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    info!(items = requests.len(), concurrency, "Starting batch generation");

    let tasks = requests.into_iter().map(|request| {
        let runner = Arc::clone(&runner);
        let semaphore = Arc::clone(&semaphore);
        async move {
            let _permit = semaphore.acquire().await.expect("semaphore closed");
            runner.generate_with_retry(&request).await
        }
    });

    join_all(tasks).await
}
