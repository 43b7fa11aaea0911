//! Server construction and middleware wiring.

mod config;

pub use config::{Cli, ServerConfig};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::PointService;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::points::{charge, histories, point, use_points};
use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;
use crate::outbound::persistence::{MemoryBalanceStore, MemoryHistoryLog};

/// Build the HTTP state over fresh in-memory tables and the system clock.
#[must_use]
pub fn default_http_state() -> HttpState {
    let balances = Arc::new(MemoryBalanceStore::new());
    let history_log = Arc::new(MemoryHistoryLog::new());
    let service = Arc::new(PointService::new(
        balances,
        history_log,
        Arc::new(DefaultClock),
    ));
    HttpState::new(service.clone(), service)
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(point)
        .service(histories)
        .service(charge)
        .service(use_points);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server over the provided state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(http_state);
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr())?
    .run();

    health_state.mark_ready();
    Ok(server)
}
