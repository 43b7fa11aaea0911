//! Domain ports for the hexagonal boundary.
//!
//! Driven ports ([`BalanceStore`], [`HistoryLog`]) are implemented by
//! persistence adapters; driving ports ([`PointCommand`], [`PointQuery`])
//! are implemented by the ledger service and consumed by inbound adapters.

mod balance_store;
mod history_log;
mod point_command;
mod point_query;

#[cfg(test)]
pub use balance_store::MockBalanceStore;
pub use balance_store::{BalanceStore, BalanceStoreError};
#[cfg(test)]
pub use history_log::MockHistoryLog;
pub use history_log::{HistoryLog, HistoryLogError};
#[cfg(test)]
pub use point_command::MockPointCommand;
pub use point_command::{FixturePointCommand, PointCommand};
#[cfg(test)]
pub use point_query::MockPointQuery;
pub use point_query::{FixturePointQuery, PointQuery};
