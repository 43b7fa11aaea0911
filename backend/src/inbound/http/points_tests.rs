//! Tests for the point API handlers.

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test as actix_test, web};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use super::*;
use crate::domain::point::EntryId;
use crate::domain::ports::{
    FixturePointCommand, FixturePointQuery, MockPointCommand, MockPointQuery, PointCommand,
    PointQuery,
};
use crate::domain::Error;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
}

fn state_with(command: Arc<dyn PointCommand>, query: Arc<dyn PointQuery>) -> HttpState {
    HttpState::new(command, query)
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .service(point)
            .service(histories)
            .service(charge)
            .service(use_points),
    )
}

#[actix_web::test]
async fn point_returns_the_queried_balance() {
    let mut query = MockPointQuery::new();
    query.expect_balance().times(1).returning(|user_id| {
        Ok(Balance {
            user_id,
            points: 1200,
            updated_at: at(42),
        })
    });
    let state = state_with(Arc::new(FixturePointCommand), Arc::new(query));
    let app = actix_test::init_service(test_app(state)).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/points/7")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["userId"], 7);
    assert_eq!(body["points"], 1200);
    assert_eq!(body["updatedAt"], at(42).to_rfc3339());
}

#[actix_web::test]
async fn histories_lists_entries_in_order() {
    let mut query = MockPointQuery::new();
    query.expect_history().times(1).returning(|user_id| {
        Ok(vec![
            HistoryEntry::try_new(EntryId(1), user_id, 500, TransactionKind::Charge, at(1))
                .expect("charge entry"),
            HistoryEntry::try_new(EntryId(2), user_id, -200, TransactionKind::Use, at(2))
                .expect("use entry"),
        ])
    });
    let state = state_with(Arc::new(FixturePointCommand), Arc::new(query));
    let app = actix_test::init_service(test_app(state)).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/points/7/histories")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    let entries = body.as_array().expect("array body");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["amount"], 500);
    assert_eq!(entries[0]["type"], "CHARGE");
    assert_eq!(entries[1]["amount"], -200);
    assert_eq!(entries[1]["type"], "USE");
}

#[actix_web::test]
async fn charge_passes_the_validated_amount_to_the_command() {
    let mut command = MockPointCommand::new();
    command
        .expect_charge()
        .times(1)
        .withf(|user_id, amount| *user_id == UserId(1) && *amount == 500)
        .returning(|user_id, amount| {
            Ok(Balance {
                user_id,
                points: amount,
                updated_at: at(5),
            })
        });
    let state = state_with(Arc::new(command), Arc::new(FixturePointQuery));
    let app = actix_test::init_service(test_app(state)).await;

    let req = actix_test::TestRequest::patch()
        .uri("/api/v1/points/1/charge")
        .set_json(AmountRequest { amount: 500 })
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["points"], 500);
}

#[actix_web::test]
async fn charge_rejects_a_negative_amount_before_the_core() {
    // No expectations: reaching the command port fails the test.
    let state = state_with(
        Arc::new(MockPointCommand::new()),
        Arc::new(FixturePointQuery),
    );
    let app = actix_test::init_service(test_app(state)).await;

    let req = actix_test::TestRequest::patch()
        .uri("/api/v1/points/1/charge")
        .set_json(AmountRequest { amount: -5 })
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "amount");
    assert_eq!(body["details"]["code"], "negative_amount");
}

#[actix_web::test]
async fn use_rejects_a_negative_amount_before_the_core() {
    let state = state_with(
        Arc::new(MockPointCommand::new()),
        Arc::new(FixturePointQuery),
    );
    let app = actix_test::init_service(test_app(state)).await;

    let req = actix_test::TestRequest::patch()
        .uri("/api/v1/points/1/use")
        .set_json(AmountRequest { amount: -1 })
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn use_maps_insufficient_points_to_a_client_error() {
    let mut command = MockPointCommand::new();
    command.expect_use_points().times(1).returning(|_, amount| {
        Err(
            Error::insufficient_points(format!("insufficient points: have 0, requested {amount}"))
                .with_details(serde_json::json!({"points": 0, "requested": amount})),
        )
    });
    let state = state_with(Arc::new(command), Arc::new(FixturePointQuery));
    let app = actix_test::init_service(test_app(state)).await;

    let req = actix_test::TestRequest::patch()
        .uri("/api/v1/points/1/use")
        .set_json(AmountRequest { amount: 999 })
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "insufficient_points");
    assert_eq!(body["details"]["requested"], 999);
}

#[actix_web::test]
async fn store_failures_surface_as_service_unavailable() {
    let mut command = MockPointCommand::new();
    command
        .expect_charge()
        .times(1)
        .returning(|_, _| Err(Error::service_unavailable("balance store unavailable")));
    let state = state_with(Arc::new(command), Arc::new(FixturePointQuery));
    let app = actix_test::init_service(test_app(state)).await;

    let req = actix_test::TestRequest::patch()
        .uri("/api/v1/points/1/charge")
        .set_json(AmountRequest { amount: 10 })
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn fixture_ports_satisfy_the_wiring() {
    let state = state_with(Arc::new(FixturePointCommand), Arc::new(FixturePointQuery));
    let app = actix_test::init_service(test_app(state)).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/points/3")
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["points"], 0);

    let req = actix_test::TestRequest::patch()
        .uri("/api/v1/points/3/charge")
        .set_json(AmountRequest { amount: 250 })
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["points"], 250);
}
