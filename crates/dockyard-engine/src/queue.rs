//! Shared FIFO hand-off queue of job identifiers.

use std::collections::VecDeque;

use tokio::sync::{Mutex, Notify};

use dockyard_entity::job::JobId;

/// FIFO queue connecting the dispatcher to the worker pool.
///
/// The queue performs no deduplication: the dispatcher re-enqueues every
/// still-pending id on every tick, and the store's atomic acquisition is
/// what decides ownership, so duplicate entries are expected and harmless.
///
/// Any number of producers and consumers may share one queue. The internal
/// lock is only ever held for the push/pop itself, never across an await.
#[derive(Debug, Default)]
pub struct JobQueue {
    items: Mutex<VecDeque<JobId>>,
    notify: Notify,
}

impl JobQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an id to the back of the queue and wake one waiting worker.
    pub async fn push(&self, id: JobId) {
        let mut items = self.items.lock().await;
        items.push_back(id);
        drop(items);
        self.notify.notify_one();
    }

    /// Remove and return the id at the front of the queue, waiting until
    /// one is available.
    pub async fn pop(&self) -> JobId {
        loop {
            // Register for a wakeup before checking, so a push that lands
            // between the check and the await is not missed.
            let notified = self.notify.notified();

            {
                let mut items = self.items.lock().await;
                if let Some(id) = items.pop_front() {
                    if !items.is_empty() {
                        // Pass the signal on: more items are waiting and a
                        // single notify may have woken only this consumer.
                        self.notify.notify_one();
                    }
                    return id;
                }
            }

            notified.await;
        }
    }

    /// Number of ids currently queued.
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    /// Whether the queue is currently empty.
    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn pop_returns_in_fifo_order() {
        let queue = JobQueue::new();
        queue.push(JobId::from("a")).await;
        queue.push(JobId::from("b")).await;
        queue.push(JobId::from("c")).await;

        assert_eq!(queue.pop().await, JobId::from("a"));
        assert_eq!(queue.pop().await, JobId::from("b"));
        assert_eq!(queue.pop().await, JobId::from("c"));
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn pop_blocks_until_push() {
        let queue = Arc::new(JobQueue::new());

        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.pop().await })
        };

        // Give the consumer time to park on the empty queue.
        tokio::task::yield_now().await;
        queue.push(JobId::from("late")).await;

        let id = tokio::time::timeout(Duration::from_secs(5), consumer)
            .await
            .expect("pop should complete after push")
            .unwrap();
        assert_eq!(id, JobId::from("late"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn items_distribute_across_consumers_without_loss() {
        let queue = Arc::new(JobQueue::new());

        let mut consumers = Vec::new();
        for _ in 0..4 {
            let queue = Arc::clone(&queue);
            consumers.push(tokio::spawn(async move {
                let mut seen = Vec::new();
                for _ in 0..5 {
                    seen.push(queue.pop().await);
                }
                seen
            }));
        }

        for i in 0..20 {
            queue.push(JobId::from(format!("job-{i}"))).await;
        }

        let mut all = HashSet::new();
        for consumer in consumers {
            for id in consumer.await.unwrap() {
                // A duplicate delivery would collide here.
                assert!(all.insert(id));
            }
        }
        assert_eq!(all.len(), 20);
    }
}
