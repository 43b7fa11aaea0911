//! Port abstraction for balance persistence adapters.
//!
//! The store is a plain key-value mapping from user id to [`Balance`]. It
//! offers point reads and point writes only; it does not make a
//! read-modify-write pair atomic. Callers that need that must serialize
//! through the ledger service's per-user lock.

use async_trait::async_trait;

use crate::domain::point::{Balance, UserId};

/// Persistence errors raised by balance store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BalanceStoreError {
    /// The store could not be reached.
    #[error("balance store connection failed: {message}")]
    Connection { message: String },
    /// A read or write failed during execution.
    #[error("balance store query failed: {message}")]
    Query { message: String },
}

impl BalanceStoreError {
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

/// Key-value store holding each user's current balance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Fetch a user's balance; `None` for users the ledger has never seen.
    async fn find(&self, user_id: UserId) -> Result<Option<Balance>, BalanceStoreError>;

    /// Insert or replace a user's balance.
    async fn save(&self, balance: &Balance) -> Result<(), BalanceStoreError>;
}
