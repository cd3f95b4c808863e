use std::future::Future;

use tokio::task::{JoinError, JoinSet};

/// Run `task` over `items`, at most `batch_size` at a time, and return the
/// results in input order. The first error stops the run; tasks still in
/// flight are aborted.
pub(crate) async fn in_batches<I, T, E, F, Fut>(
    items: Vec<I>,
    batch_size: usize,
    target: &'static str,
    task: F,
    join_error: fn(JoinError) -> E,
) -> Result<Vec<T>, E>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let batch_size = batch_size.max(1);
    let total = items.len();
    let mut results: Vec<Option<T>> = (0..total).map(|_| None).collect();
    let mut pending = items.into_iter().enumerate().peekable();

    while let Some(&(first, _)) = pending.peek() {
        let mut set = JoinSet::new();
        for (index, item) in pending.by_ref().take(batch_size) {
            let fut = task(item);
            set.spawn(async move { (index, fut.await) });
        }
        log::debug!(target: target, "batch {}..{} of {total}", first, first + set.len());
        while let Some(joined) = set.join_next().await {
            let (index, result) = joined.map_err(join_error)?;
            results[index] = Some(result?);
        }
    }

    Ok(results.into_iter().flatten().collect())
}
