//! Ledger service entry point: wires stores, the ledger service, and the
//! REST endpoints.

use actix_web::web;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::server::{Cli, ServerConfig, create_server, default_http_state};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let config = ServerConfig::resolve(&cli)?;

    let health_state = web::Data::new(HealthState::new());
    let http_state = default_http_state();

    info!(bind_addr = %config.bind_addr(), "starting point ledger server");
    let server = create_server(health_state, http_state, config)?;
    server.await
}
