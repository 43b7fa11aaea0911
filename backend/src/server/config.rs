//! HTTP server configuration object and CLI parsing.

use std::net::SocketAddr;

use clap::Parser;

/// Default socket the server binds when nothing else is configured.
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);

/// Command-line arguments for the ledger server.
#[derive(Debug, Parser)]
#[command(name = "backend", about = "Point ledger HTTP service")]
pub struct Cli {
    /// Socket address to bind, e.g. 127.0.0.1:8080.
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

/// Configuration for creating the HTTP server.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Construct a configuration for an explicit bind address.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }

    /// Resolve configuration from CLI arguments, then the `BIND_ADDR`
    /// environment variable, then the built-in default.
    pub fn resolve(cli: &Cli) -> std::io::Result<Self> {
        if let Some(bind_addr) = cli.bind {
            return Ok(Self::new(bind_addr));
        }
        match std::env::var("BIND_ADDR") {
            Ok(raw) => raw
                .parse()
                .map(Self::new)
                .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR {raw:?}: {e}"))),
            Err(_) => {
                let (ip, port) = DEFAULT_BIND_ADDR;
                Ok(Self::new(SocketAddr::from((ip, port))))
            }
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
