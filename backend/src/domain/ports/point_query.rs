//! Driving port for read-only ledger queries.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::error::Error;
use crate::domain::point::{Balance, HistoryEntry, UserId};

/// Use-case port for reading balances and mutation history.
///
/// Reads do not participate in the per-user mutation sequence; they observe
/// whatever the stores hold, which is always a committed post-mutation value.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PointQuery: Send + Sync {
    /// The user's current balance; a zero balance for unseen users.
    async fn balance(&self, user_id: UserId) -> Result<Balance, Error>;

    /// The user's mutation history in insertion order; empty for unseen
    /// users.
    async fn history(&self, user_id: UserId) -> Result<Vec<HistoryEntry>, Error>;
}

/// Fixture implementation reporting an empty ledger.
#[derive(Debug, Default)]
pub struct FixturePointQuery;

#[async_trait]
impl PointQuery for FixturePointQuery {
    async fn balance(&self, user_id: UserId) -> Result<Balance, Error> {
        Ok(Balance::empty(user_id, Utc::now()))
    }

    async fn history(&self, _user_id: UserId) -> Result<Vec<HistoryEntry>, Error> {
        Ok(Vec::new())
    }
}
