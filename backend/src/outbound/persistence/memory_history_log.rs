//! In-memory append-only history table.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::point::{EntryId, HistoryDraft, HistoryEntry, UserId};
use crate::domain::ports::{HistoryLog, HistoryLogError};

/// History log backed by a process-local hash map of per-user vectors.
///
/// Entry ids come from a process-wide cursor, so they are unique and
/// monotonically increasing across all users. Appends are individually
/// atomic under the rw-lock.
#[derive(Debug, Default)]
pub struct MemoryHistoryLog {
    rows: RwLock<HashMap<UserId, Vec<HistoryEntry>>>,
    cursor: AtomicI64,
}

impl MemoryHistoryLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryLog for MemoryHistoryLog {
    async fn append(&self, draft: HistoryDraft) -> Result<HistoryEntry, HistoryLogError> {
        let id = EntryId(self.cursor.fetch_add(1, Ordering::Relaxed) + 1);
        let entry = HistoryEntry::try_new(
            id,
            draft.user_id,
            draft.amount,
            draft.kind,
            draft.occurred_at,
        )
        .map_err(|err| HistoryLogError::query(err.to_string()))?;

        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        rows.entry(draft.user_id).or_default().push(entry);
        Ok(entry)
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<HistoryEntry>, HistoryLogError> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rows.get(&user_id).cloned().unwrap_or_default())
    }
}
