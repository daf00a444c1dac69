//! Shared utilities for integration tests.

use std::net::SocketAddr;

use startup_gate::GateConfig;
use tokio::net::TcpListener;

/// Start a listener standing in for the database. Accepted connections are dropped.
pub async fn start_database_stub() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config pointing at `addr` with short timeouts and no delays.
pub fn config_for(addr: SocketAddr, command: &[&str]) -> GateConfig {
    let mut config = GateConfig::default();
    config.database.host = addr.ip().to_string();
    config.database.port = addr.port();
    config.database.connect_timeout_secs = 1;
    config.migrate.command = command.iter().map(|s| s.to_string()).collect();
    config.migrate.delay_secs = 0;
    config.boot.delay_secs = 0;
    config
}
