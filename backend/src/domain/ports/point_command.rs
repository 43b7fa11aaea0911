//! Driving port for balance-mutating operations.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::error::Error;
use crate::domain::point::{Balance, UserId};

/// Use-case port for mutating a user's balance.
///
/// Amounts are validated non-negative at the transport boundary; the
/// implementation rejects a negative amount defensively as a contract
/// violation rather than a business error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PointCommand: Send + Sync {
    /// Add `amount` points to the user's balance and record the mutation.
    async fn charge(&self, user_id: UserId, amount: i64) -> Result<Balance, Error>;

    /// Spend `amount` points from the user's balance and record the
    /// mutation. Fails without any state change when the balance cannot
    /// cover the amount.
    async fn use_points(&self, user_id: UserId, amount: i64) -> Result<Balance, Error>;
}

/// Fixture implementation for handler tests without a real ledger.
///
/// Behaves as if every user starts from a zero balance on each call.
#[derive(Debug, Default)]
pub struct FixturePointCommand;

#[async_trait]
impl PointCommand for FixturePointCommand {
    async fn charge(&self, user_id: UserId, amount: i64) -> Result<Balance, Error> {
        Ok(Balance {
            user_id,
            points: amount,
            updated_at: Utc::now(),
        })
    }

    async fn use_points(&self, user_id: UserId, amount: i64) -> Result<Balance, Error> {
        if amount > 0 {
            return Err(Error::insufficient_points(format!(
                "insufficient points: have 0, requested {amount}"
            )));
        }
        Ok(Balance::empty(user_id, Utc::now()))
    }
}
