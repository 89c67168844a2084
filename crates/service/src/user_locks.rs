//! Per-user mutual exclusion for reconcile.
//!
//! Reconciles for the same user must not interleave their
//! read-partition-delete-upsert sequence; different users never contend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

#[derive(Debug, Default)]
pub struct UserLocks {
    locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl UserLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the lock for a user.
    pub async fn get_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        {
            let locks = self.locks.read().await;
            if let Some(lock) = locks.get(user_id) {
                return Arc::clone(lock);
            }
        }

        let mut locks = self.locks.write().await;
        Arc::clone(locks.entry(user_id.to_owned()).or_insert_with(|| Arc::new(Mutex::new(()))))
    }

    /// Wait for and hold the user's lock until the guard is dropped.
    pub async fn lock(&self, user_id: &str) -> OwnedMutexGuard<()> {
        self.get_lock(user_id).await.lock_owned().await
    }

    /// Drop the user's entry if nobody else holds or waits on it.
    pub async fn release(&self, user_id: &str) -> bool {
        let mut locks = self.locks.write().await;
        match locks.get(user_id) {
            Some(lock) if Arc::strong_count(lock) == 1 => {
                locks.remove(user_id);
                true
            },
            _ => false,
        }
    }

    /// Drop locks nobody holds or waits on. Returns how many were removed.
    pub async fn cleanup_unused(&self) -> usize {
        let mut locks = self.locks.write().await;
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before.saturating_sub(locks.len())
    }

    pub async fn len(&self) -> usize {
        self.locks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.locks.read().await.is_empty()
    }
}
