//! Port abstraction for the append-only mutation history.

use async_trait::async_trait;

use crate::domain::point::{HistoryDraft, HistoryEntry, UserId};

/// Persistence errors raised by history log adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryLogError {
    /// The log could not be reached.
    #[error("history log connection failed: {message}")]
    Connection { message: String },
    /// An append or read failed during execution.
    #[error("history log query failed: {message}")]
    Query { message: String },
}

impl HistoryLogError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Append-only log of completed ledger mutations, keyed by user.
///
/// Each append is independently atomic and assigns the entry id; the log is
/// not synchronized with balance writes. Entries are never modified or
/// removed once appended.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryLog: Send + Sync {
    /// Persist a new entry, assigning its id.
    async fn append(&self, draft: HistoryDraft) -> Result<HistoryEntry, HistoryLogError>;

    /// All entries for a user, in insertion order; empty for unseen users.
    async fn list(&self, user_id: UserId) -> Result<Vec<HistoryEntry>, HistoryLogError>;
}
