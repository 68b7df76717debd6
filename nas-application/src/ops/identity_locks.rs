use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

const PRUNE_THRESHOLD: usize = 1024;

/// Serializes read-validate-append sequences per key within this process.
/// Separate processes sharing one store are not covered.
#[derive(Default)]
pub struct IdentityLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl IdentityLocks {
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() >= PRUNE_THRESHOLD {
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks.entry(key.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    pub async fn tracked_keys(&self) -> usize {
        self.locks.lock().await.len()
    }
}
