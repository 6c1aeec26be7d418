use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::ActivityPolicy;

/// Outcome of a single attempt against an endpoint that may still be computing.
#[derive(Debug)]
pub enum Attempt<T> {
    Ready(T),
    Pending,
    Failed,
    Abort,
}

/// Polls `attempt` up to `policy.max_attempts` times.
///
/// `Pending` sleeps the fixed delay before the next attempt, `Failed` retries
/// straight away and `Abort` gives up immediately. Returns `None` when no
/// attempt produced a value.
pub async fn poll_until_ready<T, F, Fut>(policy: ActivityPolicy, mut attempt: F) -> Option<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    for n in 1..=policy.max_attempts.max(1) {
        match attempt(n).await {
            Attempt::Ready(value) => return Some(value),
            Attempt::Pending => {
                tracing::debug!("Statistics still computing (attempt {})", n);
                sleep(policy.retry_delay).await;
            }
            Attempt::Failed => {
                tracing::debug!("Statistics request failed (attempt {})", n);
            }
            Attempt::Abort => return None,
        }
    }

    None
}
