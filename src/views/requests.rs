use std::future::Future;

use log::error;
use tokio::task::JoinSet;

/// Requests issued by one view, tied to that view's lifetime.
///
/// Each request runs as its own task and settles into a value of type `E`.
/// The owning view drains settled values on tick with [`Requests::ready`].
/// [`Requests::cancel_all`] (and dropping the scope) aborts whatever is still
/// in flight and discards anything that settled but was not drained yet, so a
/// torn-down view never observes a late answer.
pub struct Requests<E> {
    tasks: JoinSet<E>,
}

impl<E: Send + 'static> Requests<E> {
    pub fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
        }
    }

    pub fn spawn<F>(&mut self, request: F)
    where
        F: Future<Output = E> + Send + 'static,
    {
        self.tasks.spawn(request);
    }

    /// Number of requests that have not been drained yet.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Collects every request that has already settled, without waiting.
    pub fn ready(&mut self) -> Vec<E> {
        let mut settled = Vec::new();
        while let Some(joined) = self.tasks.try_join_next() {
            match joined {
                Ok(event) => settled.push(event),
                Err(err) => error!("request task did not complete: {}", err),
            }
        }
        settled
    }

    /// Waits for the next request to settle. `None` once nothing is in flight.
    pub async fn next(&mut self) -> Option<E> {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(event) => return Some(event),
                Err(err) => error!("request task did not complete: {}", err),
            }
        }
        None
    }

    pub fn cancel_all(&mut self) {
        // Dropping the old set aborts its tasks and forgets unjoined results.
        self.tasks = JoinSet::new();
    }
}

impl<E: Send + 'static> Default for Requests<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn next_returns_settled_values_then_none() {
        let mut requests = Requests::new();
        requests.spawn(async { 7 });
        assert_eq!(requests.in_flight(), 1);
        assert_eq!(requests.next().await, Some(7));
        assert!(requests.is_idle());
        assert_eq!(requests.next().await, None);
    }

    #[tokio::test]
    async fn cancel_discards_settled_but_undrained_results() {
        let mut requests = Requests::new();
        requests.spawn(async { "late" });
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        requests.cancel_all();
        assert!(requests.ready().is_empty());
        assert_eq!(requests.next().await, None);
    }

    #[tokio::test]
    async fn cancel_aborts_pending_requests() {
        let mut requests: Requests<u8> = Requests::new();
        requests.spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            1
        });
        requests.cancel_all();
        assert!(requests.is_idle());
    }

    #[tokio::test]
    async fn ready_does_not_wait_for_pending_requests() {
        let mut requests = Requests::new();
        requests.spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            1u8
        });
        assert!(requests.ready().is_empty());
        assert_eq!(requests.in_flight(), 1);
    }
}
