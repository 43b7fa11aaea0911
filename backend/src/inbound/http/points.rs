//! Point ledger HTTP handlers.
//!
//! ```text
//! GET   /api/v1/points/{user_id}
//! GET   /api/v1/points/{user_id}/histories
//! PATCH /api/v1/points/{user_id}/charge
//! PATCH /api/v1/points/{user_id}/use
//! ```

use actix_web::{get, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Balance, HistoryEntry, TransactionKind, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::non_negative_amount;

/// Request payload for charge and use mutations.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AmountRequest {
    /// Number of points to add or spend; must be zero or positive.
    #[schema(example = 500, minimum = 0)]
    pub amount: i64,
}

/// Response payload for a user's balance.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub user_id: u64,
    pub points: i64,
    /// RFC 3339 timestamp of the last mutation.
    pub updated_at: String,
}

impl From<Balance> for BalanceResponse {
    fn from(balance: Balance) -> Self {
        Self {
            user_id: balance.user_id.0,
            points: balance.points,
            updated_at: balance.updated_at.to_rfc3339(),
        }
    }
}

/// Response payload for one history entry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub id: i64,
    pub user_id: u64,
    /// Signed amount: positive for CHARGE, negative for USE.
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// RFC 3339 timestamp of the mutation.
    pub occurred_at: String,
}

impl From<HistoryEntry> for HistoryEntryResponse {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id.0,
            user_id: entry.user_id.0,
            amount: entry.amount,
            kind: entry.kind,
            occurred_at: entry.occurred_at.to_rfc3339(),
        }
    }
}

/// Fetch a user's current balance.
///
/// Users the ledger has never seen report a zero balance rather than an
/// error.
#[utoipa::path(
    get,
    path = "/api/v1/points/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Current balance", body = BalanceResponse),
        (status = 500, description = "Internal server error", body = crate::domain::Error),
        (status = 503, description = "Store unavailable", body = crate::domain::Error)
    ),
    tags = ["points"],
    operation_id = "getPoint"
)]
#[get("/points/{user_id}")]
pub async fn point(
    state: web::Data<HttpState>,
    path: web::Path<u64>,
) -> ApiResult<web::Json<BalanceResponse>> {
    let user_id = UserId(path.into_inner());
    let balance = state.query.balance(user_id).await?;
    Ok(web::Json(BalanceResponse::from(balance)))
}

/// Fetch a user's mutation history in insertion order.
#[utoipa::path(
    get,
    path = "/api/v1/points/{user_id}/histories",
    params(
        ("user_id" = u64, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Mutation history", body = [HistoryEntryResponse]),
        (status = 500, description = "Internal server error", body = crate::domain::Error),
        (status = 503, description = "Store unavailable", body = crate::domain::Error)
    ),
    tags = ["points"],
    operation_id = "getPointHistories"
)]
#[get("/points/{user_id}/histories")]
pub async fn histories(
    state: web::Data<HttpState>,
    path: web::Path<u64>,
) -> ApiResult<web::Json<Vec<HistoryEntryResponse>>> {
    let user_id = UserId(path.into_inner());
    let entries = state.query.history(user_id).await?;
    Ok(web::Json(
        entries.into_iter().map(HistoryEntryResponse::from).collect(),
    ))
}

/// Add points to a user's balance.
#[utoipa::path(
    patch,
    path = "/api/v1/points/{user_id}/charge",
    request_body = AmountRequest,
    params(
        ("user_id" = u64, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Balance after the charge", body = BalanceResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error),
        (status = 503, description = "Store unavailable", body = crate::domain::Error)
    ),
    tags = ["points"],
    operation_id = "chargePoint"
)]
#[patch("/points/{user_id}/charge")]
pub async fn charge(
    state: web::Data<HttpState>,
    path: web::Path<u64>,
    payload: web::Json<AmountRequest>,
) -> ApiResult<web::Json<BalanceResponse>> {
    let user_id = UserId(path.into_inner());
    let amount = non_negative_amount(payload.into_inner().amount)?;
    let balance = state.command.charge(user_id, amount).await?;
    Ok(web::Json(BalanceResponse::from(balance)))
}

/// Spend points from a user's balance.
///
/// Fails with a 400 `insufficient_points` payload when the balance cannot
/// cover the amount; the balance and history are left untouched.
#[utoipa::path(
    patch,
    path = "/api/v1/points/{user_id}/use",
    request_body = AmountRequest,
    params(
        ("user_id" = u64, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Balance after the use", body = BalanceResponse),
        (status = 400, description = "Invalid request or insufficient points", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error),
        (status = 503, description = "Store unavailable", body = crate::domain::Error)
    ),
    tags = ["points"],
    operation_id = "usePoint"
)]
#[patch("/points/{user_id}/use")]
pub async fn use_points(
    state: web::Data<HttpState>,
    path: web::Path<u64>,
    payload: web::Json<AmountRequest>,
) -> ApiResult<web::Json<BalanceResponse>> {
    let user_id = UserId(path.into_inner());
    let amount = non_negative_amount(payload.into_inner().amount)?;
    let balance = state.command.use_points(user_id, amount).await?;
    Ok(web::Json(BalanceResponse::from(balance)))
}

#[cfg(test)]
#[path = "points_tests.rs"]
mod tests;
