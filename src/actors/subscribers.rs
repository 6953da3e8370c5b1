//! Registry of live feed subscribers
//!
//! The registry only stores handles; the connections themselves belong to
//! their transport tasks. A broadcast works on a snapshot of the registry,
//! so subscribers connecting or leaving mid-broadcast never corrupt the set
//! and nobody is notified twice:
//!
//! ```text
//! lock → snapshot → unlock → deliver to all (concurrently) → lock → prune failed → unlock → close pruned
//! ```
//!
//! A pruned subscriber is told to close, so its transport ends the
//! connection instead of lingering unregistered.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, trace};

/// A live connection that can receive serialized payloads
#[async_trait]
pub trait Subscriber: Send + Sync {
    async fn deliver(&self, payload: &str) -> anyhow::Result<()>;

    /// Called once the registry has dropped this subscriber
    fn close(&self) {}
}

/// Identifies a registered subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber-{}", self.0)
    }
}

/// Outcome of one broadcast pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    /// Subscribers whose delivery failed; they have been removed
    pub failed: Vec<SubscriberId>,
}

#[derive(Clone)]
pub struct SubscriberRegistry {
    subscribers: Arc<Mutex<HashMap<SubscriberId, Arc<dyn Subscriber>>>>,
    next_id: Arc<AtomicU64>,
    send_timeout: Duration,
}

impl SubscriberRegistry {
    pub fn new(send_timeout: Duration) -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            send_timeout,
        }
    }

    pub async fn add(&self, subscriber: Arc<dyn Subscriber>) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let count = {
            let mut subscribers = self.subscribers.lock().await;
            subscribers.insert(id, subscriber);
            subscribers.len()
        };
        debug!("{id} registered ({count} connected)");
        id
    }

    /// Returns whether `id` was still registered
    pub async fn remove(&self, id: SubscriberId) -> bool {
        let (removed, count) = {
            let mut subscribers = self.subscribers.lock().await;
            (subscribers.remove(&id).is_some(), subscribers.len())
        };
        if removed {
            debug!("{id} removed ({count} connected)");
        }
        removed
    }

    /// Remove `id` and tell it to close its connection
    pub async fn disconnect(&self, id: SubscriberId) -> bool {
        let Some(subscriber) = self.subscribers.lock().await.remove(&id) else {
            return false;
        };
        subscriber.close();
        debug!("{id} disconnected");
        true
    }

    pub async fn len(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.subscribers.lock().await.is_empty()
    }

    pub async fn ids(&self) -> Vec<SubscriberId> {
        let mut ids: Vec<_> = self.subscribers.lock().await.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Deliver `payload` to every registered subscriber
    ///
    /// Deliveries are independent: a failed or timed out send only drops that
    /// subscriber, after all deliveries of this pass have finished. Errors are
    /// never returned to the caller.
    pub async fn broadcast(&self, payload: &str) -> BroadcastReport {
        let snapshot: Vec<(SubscriberId, Arc<dyn Subscriber>)> = self
            .subscribers
            .lock()
            .await
            .iter()
            .map(|(id, subscriber)| (*id, Arc::clone(subscriber)))
            .collect();

        let results = join_all(snapshot.into_iter().map(|(id, subscriber)| async move {
            match tokio::time::timeout(self.send_timeout, subscriber.deliver(payload)).await {
                Ok(Ok(())) => (id, true),
                Ok(Err(e)) => {
                    debug!("delivery to {id} failed: {e:#}");
                    (id, false)
                }
                Err(_) => {
                    debug!("delivery to {id} timed out after {:?}", self.send_timeout);
                    (id, false)
                }
            }
        }))
        .await;

        let mut report = BroadcastReport::default();
        for (id, ok) in results {
            if ok {
                report.delivered += 1;
            } else {
                report.failed.push(id);
            }
        }
        report.failed.sort();

        if !report.failed.is_empty() {
            let pruned: Vec<Arc<dyn Subscriber>> = {
                let mut subscribers = self.subscribers.lock().await;
                let pruned: Vec<_> = report
                    .failed
                    .iter()
                    .filter_map(|id| subscribers.remove(id))
                    .collect();
                debug!(
                    "pruned {} failed subscriber(s) ({} connected)",
                    pruned.len(),
                    subscribers.len()
                );
                pruned
            };

            for subscriber in pruned {
                subscriber.close();
            }
        }

        trace!("broadcast delivered to {} subscriber(s)", report.delivered);
        report
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}
