//! Per-key mutual exclusion without a global lock.
//!
//! The ledger must apply mutations for one user strictly one at a time while
//! letting unrelated users proceed in parallel. [`KeyedLock`] maps each key
//! to its own async mutex; the map itself sits behind a short-held std mutex
//! that only covers the lookup, never the guarded operation, so map
//! contention cannot stall on operation duration.
//!
//! Waiters suspend on the per-key mutex rather than spinning, and tokio's
//! mutex wakes them in acquisition order, so mutations on one key observe a
//! single serial order.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Mutex as AsyncMutex;

/// Map of lazily created per-key exclusive-access primitives.
pub struct KeyedLock<K> {
    entries: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> Default for KeyedLock<K> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedLock<K>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty lock map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `operation` while holding the exclusive right for `key`.
    ///
    /// Operations on the same key execute one at a time, in the order they
    /// acquire the key's mutex; operations on distinct keys never wait on
    /// each other. The exclusive right is released on every exit path: the
    /// guard drops whether the operation completes, returns an error value,
    /// or the caller is cancelled while suspended.
    pub async fn run_exclusive<T, F, Fut>(&self, key: K, operation: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let slot = self.slot(&key);
        let result = {
            let _guard = slot.lock().await;
            operation().await
        };
        drop(slot);
        self.reclaim(&key);
        result
    }

    /// Number of keys currently holding coordination state.
    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.lock_entries().len()
    }

    fn slot(&self, key: &K) -> Arc<AsyncMutex<()>> {
        let mut entries = self.lock_entries();
        entries.entry(key.clone()).or_default().clone()
    }

    /// Drop a key's entry once nothing references it.
    ///
    /// Every acquirer clones the slot under the map mutex before suspending,
    /// so a strong count of one proves the map holds the only reference: no
    /// holder and no waiters. A fresh slot created later for the same key is
    /// equivalent to the old one — no state outlives the guarded operation.
    fn reclaim(&self, key: &K) {
        let mut entries = self.lock_entries();
        if entries
            .get(key)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            entries.remove(key);
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<K, Arc<AsyncMutex<()>>>> {
        // Map poisoning cannot corrupt the entries; recover the guard.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::sync::oneshot;
    use tokio::time::timeout;

    use super::*;

    /// Hold the lock for `key` until the returned sender fires.
    ///
    /// The returned receiver resolves once the holder has entered its
    /// critical section.
    fn hold_key(
        lock: &Arc<KeyedLock<u64>>,
        key: u64,
    ) -> (
        oneshot::Sender<()>,
        oneshot::Receiver<()>,
        tokio::task::JoinHandle<()>,
    ) {
        let (release_tx, release_rx) = oneshot::channel();
        let (entered_tx, entered_rx) = oneshot::channel();
        let lock = Arc::clone(lock);
        let holder = tokio::spawn(async move {
            lock.run_exclusive(key, || async move {
                entered_tx.send(()).ok();
                release_rx.await.ok();
            })
            .await;
        });
        (release_tx, entered_rx, holder)
    }

    #[tokio::test]
    async fn same_key_operations_are_serialized() {
        let lock = Arc::new(KeyedLock::new());
        let (release, entered, holder) = hold_key(&lock, 1);
        entered.await.expect("holder entered");

        let mut contender = {
            let lock = Arc::clone(&lock);
            tokio::spawn(async move { lock.run_exclusive(1, || async { 42 }).await })
        };

        // The contender must stay suspended while the key is held.
        let premature = timeout(Duration::from_millis(50), &mut contender).await;
        assert!(premature.is_err(), "contender ran while the key was held");

        release.send(()).expect("release holder");
        holder.await.expect("holder completes");

        let value = contender.await.expect("contender task");
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn waiter_resumes_after_release() {
        let lock = Arc::new(KeyedLock::new());
        let (release, entered, holder) = hold_key(&lock, 1);
        entered.await.expect("holder entered");

        let waiter = {
            let lock = Arc::clone(&lock);
            tokio::spawn(async move { lock.run_exclusive(1, || async { 42 }).await })
        };

        release.send(()).expect("release holder");
        holder.await.expect("holder completes");

        let value = timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter resumed promptly")
            .expect("waiter task");
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn distinct_keys_do_not_block_each_other() {
        let lock = Arc::new(KeyedLock::new());
        let (release, entered, holder) = hold_key(&lock, 1);
        entered.await.expect("holder entered");

        let value = timeout(
            Duration::from_secs(1),
            lock.run_exclusive(2, || async { "independent" }),
        )
        .await
        .expect("other key proceeds while key 1 is held");
        assert_eq!(value, "independent");

        release.send(()).expect("release holder");
        holder.await.expect("holder completes");
    }

    #[tokio::test]
    async fn lock_is_released_when_the_operation_fails() {
        let lock: KeyedLock<u64> = KeyedLock::new();
        let failed: Result<(), &str> = lock.run_exclusive(1, || async { Err("store down") }).await;
        assert!(failed.is_err());

        let value = timeout(
            Duration::from_secs(1),
            lock.run_exclusive(1, || async { 7 }),
        )
        .await
        .expect("key stays usable after a failure");
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn applies_operations_in_acquisition_order_per_key() {
        let lock = Arc::new(KeyedLock::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..64 {
            let lock = Arc::clone(&lock);
            let counter = Arc::clone(&counter);
            tasks.push(tokio::spawn(async move {
                lock.run_exclusive(9, || async move {
                    // Non-atomic read-modify-write; only safe when serialized.
                    let seen = counter.load(Ordering::SeqCst);
                    tokio::task::yield_now().await;
                    counter.store(seen + 1, Ordering::SeqCst);
                })
                .await;
            }));
        }
        for task in tasks {
            task.await.expect("task completes");
        }

        assert_eq!(counter.load(Ordering::SeqCst), 64);
    }

    #[tokio::test]
    async fn idle_entries_are_reclaimed() {
        let lock = Arc::new(KeyedLock::new());
        lock.run_exclusive(1, || async {}).await;
        lock.run_exclusive(2, || async {}).await;
        assert_eq!(lock.tracked_keys(), 0);
    }

    #[tokio::test]
    async fn held_entries_are_retained() {
        let lock = Arc::new(KeyedLock::new());
        let (release, entered, holder) = hold_key(&lock, 1);
        entered.await.expect("holder entered");
        assert_eq!(lock.tracked_keys(), 1);

        release.send(()).expect("release holder");
        holder.await.expect("holder completes");
        assert_eq!(lock.tracked_keys(), 0);
    }
}
