//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` so they depend
//! only on the domain's driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{PointCommand, PointQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub command: Arc<dyn PointCommand>,
    pub query: Arc<dyn PointQuery>,
}

impl HttpState {
    /// Bundle the driving ports consumed by the point endpoints.
    #[must_use]
    pub fn new(command: Arc<dyn PointCommand>, query: Arc<dyn PointQuery>) -> Self {
        Self { command, query }
    }
}
