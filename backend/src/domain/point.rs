//! Point ledger value types.
//!
//! Purpose: define the immutable domain values the ledger mutates — a user's
//! current [`Balance`] and the [`HistoryEntry`] records describing every past
//! mutation. Mutation is expressed as pure derivation: `charge` and `deduct`
//! return a fresh `Balance` and never touch storage themselves.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stable user identifier.
///
/// The ledger treats user ids as opaque; they are never allocated here, only
/// received from callers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned to a history entry by the history log.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Domain-rule failures raised by balance arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsError {
    /// The caller passed a negative amount; the transport layer should have
    /// rejected it already, so this is a contract violation.
    NegativeAmount { amount: i64 },
    /// A deduction larger than the current balance was requested.
    InsufficientPoints { points: i64, requested: i64 },
    /// The mutation would overflow the point counter.
    Overflow,
}

impl fmt::Display for PointsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount { amount } => {
                write!(f, "amount must be zero or positive, got {amount}")
            }
            Self::InsufficientPoints { points, requested } => {
                write!(f, "insufficient points: have {points}, requested {requested}")
            }
            Self::Overflow => write!(f, "point arithmetic overflow"),
        }
    }
}

impl std::error::Error for PointsError {}

/// A user's current point total.
///
/// ## Invariants
/// - `points` is never negative.
/// - `updated_at` carries the timestamp of the mutation that produced this
///   value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub user_id: UserId,
    pub points: i64,
    pub updated_at: DateTime<Utc>,
}

impl Balance {
    /// The implicit zero balance of a user the ledger has never seen.
    #[must_use]
    pub fn empty(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            points: 0,
            updated_at: now,
        }
    }

    /// Derive the balance after adding `amount` points.
    pub fn charge(&self, amount: i64, now: DateTime<Utc>) -> Result<Self, PointsError> {
        if amount < 0 {
            return Err(PointsError::NegativeAmount { amount });
        }
        let points = self
            .points
            .checked_add(amount)
            .ok_or(PointsError::Overflow)?;
        Ok(Self {
            user_id: self.user_id,
            points,
            updated_at: now,
        })
    }

    /// Derive the balance after spending `amount` points.
    ///
    /// Fails with [`PointsError::InsufficientPoints`] when the balance cannot
    /// cover the requested amount; the current value is left untouched.
    pub fn deduct(&self, amount: i64, now: DateTime<Utc>) -> Result<Self, PointsError> {
        if amount < 0 {
            return Err(PointsError::NegativeAmount { amount });
        }
        if self.points < amount {
            return Err(PointsError::InsufficientPoints {
                points: self.points,
                requested: amount,
            });
        }
        Ok(Self {
            user_id: self.user_id,
            points: self.points - amount,
            updated_at: now,
        })
    }
}

/// Kind of a ledger mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Points were added to the balance.
    Charge,
    /// Points were spent from the balance.
    Use,
}

/// Validation errors raised by [`HistoryEntry::try_new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryValidationError {
    /// The signed amount disagrees with the transaction kind.
    AmountSignMismatch {
        kind: TransactionKind,
        amount: i64,
    },
}

impl fmt::Display for HistoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmountSignMismatch { kind, amount } => {
                write!(f, "history amount {amount} does not match kind {kind:?}")
            }
        }
    }
}

impl std::error::Error for HistoryValidationError {}

/// Immutable record of one completed mutation.
///
/// ## Invariants
/// - `amount` is signed: positive (or zero) for [`TransactionKind::Charge`],
///   negative (or zero) for [`TransactionKind::Use`].
/// - Entries are never modified once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub occurred_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Build an entry, enforcing the sign/kind invariant.
    pub fn try_new(
        id: EntryId,
        user_id: UserId,
        amount: i64,
        kind: TransactionKind,
        occurred_at: DateTime<Utc>,
    ) -> Result<Self, HistoryValidationError> {
        let sign_matches = match kind {
            TransactionKind::Charge => amount >= 0,
            TransactionKind::Use => amount <= 0,
        };
        if !sign_matches {
            return Err(HistoryValidationError::AmountSignMismatch { kind, amount });
        }
        Ok(Self {
            id,
            user_id,
            amount,
            kind,
            occurred_at,
        })
    }
}

/// Not-yet-persisted history record; the history log assigns the entry id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryDraft {
    pub user_id: UserId,
    pub amount: i64,
    pub kind: TransactionKind,
    pub occurred_at: DateTime<Utc>,
}
