//! Ledger service applying balance mutations one user at a time.
//!
//! The service owns the only write path to the balance store and history
//! log. Each mutation runs its read-modify-write-append sequence under the
//! per-user lock, so concurrent callers on one user observe a single serial
//! order while unrelated users proceed in parallel. Reads bypass the lock:
//! they only ever observe committed post-mutation values.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::clock::MonotonicClock;
use crate::domain::error::Error;
use crate::domain::keyed_lock::KeyedLock;
use crate::domain::point::{
    Balance, HistoryDraft, HistoryEntry, PointsError, TransactionKind, UserId,
};
use crate::domain::ports::{
    BalanceStore, BalanceStoreError, HistoryLog, HistoryLogError, PointCommand, PointQuery,
};

/// Ledger service implementing the driving ports.
pub struct PointService<B, H> {
    balances: Arc<B>,
    histories: Arc<H>,
    locks: KeyedLock<UserId>,
    clock: MonotonicClock,
}

impl<B, H> PointService<B, H> {
    /// Create a new service over the given stores and wall clock.
    pub fn new(balances: Arc<B>, histories: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            balances,
            histories,
            locks: KeyedLock::new(),
            clock: MonotonicClock::new(clock),
        }
    }
}

impl<B, H> PointService<B, H>
where
    B: BalanceStore,
    H: HistoryLog,
{
    fn map_balance_error(error: BalanceStoreError) -> Error {
        match error {
            BalanceStoreError::Connection { message } => {
                Error::service_unavailable(format!("balance store unavailable: {message}"))
            }
            BalanceStoreError::Query { message } => {
                Error::internal(format!("balance store error: {message}"))
            }
        }
    }

    fn map_history_error(error: HistoryLogError) -> Error {
        match error {
            HistoryLogError::Connection { message } => {
                Error::service_unavailable(format!("history log unavailable: {message}"))
            }
            HistoryLogError::Query { message } => {
                Error::internal(format!("history log error: {message}"))
            }
        }
    }

    fn map_points_error(error: PointsError) -> Error {
        match error {
            PointsError::NegativeAmount { amount } => Error::invalid_request(error.to_string())
                .with_details(json!({ "amount": amount, "code": "negative_amount" })),
            PointsError::InsufficientPoints { points, requested } => {
                Error::insufficient_points(error.to_string())
                    .with_details(json!({ "points": points, "requested": requested }))
            }
            PointsError::Overflow => Error::invalid_request(error.to_string()),
        }
    }

    /// Run one read-modify-write-append sequence under the user's lock.
    async fn mutate(
        &self,
        user_id: UserId,
        amount: i64,
        kind: TransactionKind,
    ) -> Result<Balance, Error> {
        // Contract violation, not a business error; fail before taking the
        // lock or touching any store.
        if amount < 0 {
            return Err(Self::map_points_error(PointsError::NegativeAmount { amount }));
        }

        self.locks
            .run_exclusive(user_id, || async move {
                let now = self.clock.now();
                let current = self
                    .balances
                    .find(user_id)
                    .await
                    .map_err(Self::map_balance_error)?
                    .unwrap_or_else(|| Balance::empty(user_id, now));

                let derived = match kind {
                    TransactionKind::Charge => current.charge(amount, now),
                    TransactionKind::Use => current.deduct(amount, now),
                };
                let updated = match derived {
                    Ok(balance) => balance,
                    Err(error) => {
                        if matches!(error, PointsError::InsufficientPoints { .. }) {
                            warn!(
                                user_id = %user_id,
                                points = current.points,
                                requested = amount,
                                "rejected use: insufficient points"
                            );
                        }
                        return Err(Self::map_points_error(error));
                    }
                };

                self.balances
                    .save(&updated)
                    .await
                    .map_err(Self::map_balance_error)?;

                let signed_amount = match kind {
                    TransactionKind::Charge => amount,
                    TransactionKind::Use => -amount,
                };
                let entry = self
                    .histories
                    .append(HistoryDraft {
                        user_id,
                        amount: signed_amount,
                        kind,
                        occurred_at: now,
                    })
                    .await
                    .map_err(Self::map_history_error)?;

                info!(
                    user_id = %user_id,
                    entry_id = %entry.id,
                    amount = signed_amount,
                    points = updated.points,
                    "applied ledger mutation"
                );
                Ok(updated)
            })
            .await
    }
}

#[async_trait]
impl<B, H> PointCommand for PointService<B, H>
where
    B: BalanceStore,
    H: HistoryLog,
{
    async fn charge(&self, user_id: UserId, amount: i64) -> Result<Balance, Error> {
        self.mutate(user_id, amount, TransactionKind::Charge).await
    }

    async fn use_points(&self, user_id: UserId, amount: i64) -> Result<Balance, Error> {
        self.mutate(user_id, amount, TransactionKind::Use).await
    }
}

#[async_trait]
impl<B, H> PointQuery for PointService<B, H>
where
    B: BalanceStore,
    H: HistoryLog,
{
    async fn balance(&self, user_id: UserId) -> Result<Balance, Error> {
        let found = self
            .balances
            .find(user_id)
            .await
            .map_err(Self::map_balance_error)?;
        Ok(found.unwrap_or_else(|| Balance::empty(user_id, self.clock.now())))
    }

    async fn history(&self, user_id: UserId) -> Result<Vec<HistoryEntry>, Error> {
        self.histories
            .list(user_id)
            .await
            .map_err(Self::map_history_error)
    }
}

#[cfg(test)]
#[path = "point_service_tests.rs"]
mod tests;
