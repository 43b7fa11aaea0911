//! In-memory balance table.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::point::{Balance, UserId};
use crate::domain::ports::{BalanceStore, BalanceStoreError};

/// Balance store backed by a process-local hash map.
///
/// Reads and writes are individually consistent under the rw-lock; a
/// read-modify-write pair is not atomic here and must be serialized by the
/// caller.
#[derive(Debug, Default)]
pub struct MemoryBalanceStore {
    rows: RwLock<HashMap<UserId, Balance>>,
}

impl MemoryBalanceStore {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BalanceStore for MemoryBalanceStore {
    async fn find(&self, user_id: UserId) -> Result<Option<Balance>, BalanceStoreError> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rows.get(&user_id).copied())
    }

    async fn save(&self, balance: &Balance) -> Result<(), BalanceStoreError> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        rows.insert(balance.user_id, *balance);
        Ok(())
    }
}
