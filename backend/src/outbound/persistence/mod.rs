//! Persistence adapters.
//!
//! Both tables here are process-local: they are thread-safe for concurrent
//! access across users but deliberately offer no atomicity across a
//! read-then-write pair. The ledger service supplies that by serializing
//! mutations per user.

mod memory_balance_store;
mod memory_history_log;

pub use memory_balance_store::MemoryBalanceStore;
pub use memory_history_log::MemoryHistoryLog;
