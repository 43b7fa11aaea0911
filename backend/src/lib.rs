//! Point ledger backend library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-scoped trace identifier.
pub use domain::TraceId;
/// Tracing middleware attaching a request-scoped trace identifier.
pub use middleware::Trace;
