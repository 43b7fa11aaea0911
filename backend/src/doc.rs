//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API: the point
//! endpoints, the health probes, and the shared error payload schema. The
//! generated document backs Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, TransactionKind};
use crate::inbound::http::points::{AmountRequest, BalanceResponse, HistoryEntryResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Point ledger API",
        description = "Per-user point balances with charge/use mutations and an append-only history."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::points::point,
        crate::inbound::http::points::histories,
        crate::inbound::http::points::charge,
        crate::inbound::http::points::use_points,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        AmountRequest,
        BalanceResponse,
        HistoryEntryResponse,
        TransactionKind,
        Error,
        ErrorCode
    )),
    tags(
        (name = "points", description = "Balance queries and mutations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Structural checks on the generated OpenAPI document.

    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn registers_every_point_endpoint() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for expected in [
            "/api/v1/points/{user_id}",
            "/api/v1/points/{user_id}/histories",
            "/api/v1/points/{user_id}/charge",
            "/api/v1/points/{user_id}/use",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains_key(expected), "missing path {expected}");
        }
    }

    #[test]
    fn registers_the_error_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("Error"));
        assert!(schemas.contains_key("BalanceResponse"));
    }
}
