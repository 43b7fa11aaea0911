//! Domain types and services for the point ledger.
//!
//! Purpose: hold the transport-agnostic core — balance and history value
//! types, the per-user mutation lock, the ledger service, and the ports
//! adapters implement. Inbound adapters depend on this module, never the
//! other way round.

pub mod clock;
pub mod error;
pub mod keyed_lock;
pub mod point;
pub mod point_service;
pub mod ports;
pub mod trace_id;

pub use self::clock::MonotonicClock;
pub use self::error::{Error, ErrorCode};
pub use self::keyed_lock::KeyedLock;
pub use self::point::{
    Balance, EntryId, HistoryDraft, HistoryEntry, HistoryValidationError, PointsError,
    TransactionKind, UserId,
};
pub use self::point_service::PointService;
pub use self::trace_id::TraceId;

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
