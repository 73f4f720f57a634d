// libs/sync-cell/src/services/hub.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use shared_store::{Collection, DocumentStore};

use crate::models::CollectionSnapshot;

struct FeedChannel {
    sender: broadcast::Sender<CollectionSnapshot>,
    observers: usize,
    task: JoinHandle<()>,
}

/// Fans the store's change feeds out as full collection snapshots.
///
/// One feed task runs per collection with at least one observer; all
/// observers of that collection share it. The first subscription starts
/// the task, the last handle dropped stops it. Each change notice makes
/// the task re-materialize the whole collection and broadcast it.
pub struct SyncHub {
    store: Arc<DocumentStore>,
    fanout_capacity: usize,
    channels: Mutex<HashMap<Collection, FeedChannel>>,
}

impl SyncHub {
    pub fn new(store: Arc<DocumentStore>, fanout_capacity: usize) -> Self {
        Self {
            store,
            fanout_capacity,
            channels: Mutex::new(HashMap::new()),
        }
    }

    /// Begin observing a collection. The returned subscription yields the
    /// current snapshot first, then one snapshot per subsequent change.
    pub async fn subscribe(self: &Arc<Self>, collection: Collection) -> Subscription {
        // Hook into the change feed before reading the snapshot. A write
        // landing between the two then shows up as a (possibly redundant)
        // delivery instead of silently missing from a stale initial view.
        let notices = self.store.watch(collection).await;

        let receiver = {
            let mut channels = self.channels_guard();
            let channel = channels.entry(collection).or_insert_with(|| {
                let (sender, _) = broadcast::channel(self.fanout_capacity);
                let task =
                    spawn_feed_task(Arc::clone(&self.store), collection, notices, sender.clone());
                debug!("started feed task for {}", collection);
                FeedChannel {
                    sender,
                    observers: 0,
                    task,
                }
            });
            channel.observers += 1;
            channel.sender.subscribe()
        };

        let initial = self.snapshot(collection).await;

        Subscription {
            collection,
            initial: Some(initial),
            receiver,
            hub: Arc::clone(self),
        }
    }

    /// One-shot read of a collection's current state.
    pub async fn snapshot(&self, collection: Collection) -> CollectionSnapshot {
        CollectionSnapshot {
            collection,
            documents: self.store.list(collection).await,
        }
    }

    fn channels_guard(&self) -> MutexGuard<'_, HashMap<Collection, FeedChannel>> {
        // A poisoned registry still holds consistent counts; keep going.
        self.channels.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn release(&self, collection: Collection) {
        let mut channels = self.channels_guard();
        if let Some(channel) = channels.get_mut(&collection) {
            channel.observers -= 1;
            if channel.observers == 0 {
                channel.task.abort();
                channels.remove(&collection);
                debug!("released feed task for {}", collection);
            }
        }
    }

    /// Number of collections currently backed by a running feed task.
    pub fn active_feeds(&self) -> usize {
        self.channels_guard().len()
    }

    /// Stop every feed task, e.g. on server shutdown. Live observers are
    /// not torn down: their next delivery degrades to an empty snapshot
    /// and the view keeps rendering.
    pub fn shutdown(&self) {
        let mut channels = self.channels_guard();
        for (collection, channel) in channels.drain() {
            channel.task.abort();
            debug!("stopped feed task for {}", collection);
        }
    }
}

fn spawn_feed_task(
    store: Arc<DocumentStore>,
    collection: Collection,
    mut notices: broadcast::Receiver<shared_store::ChangeNotice>,
    sender: broadcast::Sender<CollectionSnapshot>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match notices.recv().await {
                // A lagged feed skipped notices, but the snapshot we build
                // now reflects them all anyway.
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                    let snapshot = CollectionSnapshot {
                        collection,
                        documents: store.list(collection).await,
                    };
                    // No receivers means every observer dropped between the
                    // notice and now; nothing to deliver.
                    let _ = sender.send(snapshot);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    warn!("change feed for {} closed, degrading to empty view", collection);
                    let _ = sender.send(CollectionSnapshot::empty(collection));
                    break;
                }
            }
        }
    })
}

/// One observer's handle on a collection feed. Dropping it unsubscribes;
/// the last drop for a collection stops the shared feed task.
pub struct Subscription {
    collection: Collection,
    initial: Option<CollectionSnapshot>,
    receiver: broadcast::Receiver<CollectionSnapshot>,
    hub: Arc<SyncHub>,
}

impl Subscription {
    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// The next snapshot delivery. Never fails: a lagged observer is
    /// resynced with a fresh snapshot, and a dead feed degrades to an
    /// empty one so the view keeps rendering.
    pub async fn recv(&mut self) -> CollectionSnapshot {
        if let Some(initial) = self.initial.take() {
            return initial;
        }

        match self.receiver.recv().await {
            Ok(snapshot) => snapshot,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(
                    "observer of {} lagged {} snapshots, resyncing",
                    self.collection, skipped
                );
                self.hub.snapshot(self.collection).await
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!(
                    "feed for {} is gone, delivering empty snapshot",
                    self.collection
                );
                CollectionSnapshot::empty(self.collection)
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.release(self.collection);
    }
}
