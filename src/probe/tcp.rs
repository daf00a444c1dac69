//! TCP reachability probe for the database.

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time;

use crate::probe::ConnectivityProbe;
use crate::resilience::Fault;

/// Opens (and immediately drops) a TCP connection to the dependency.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    async fn connect(&self) -> Result<(), Fault> {
        match time::timeout(self.timeout, TcpStream::connect(self.address.as_str())).await {
            Ok(Ok(_stream)) => {
                tracing::debug!(address = %self.address, "TCP connection established");
                Ok(())
            }
            Ok(Err(e)) if e.kind() == io::ErrorKind::InvalidInput => Err(Fault::generic(format!(
                "invalid database address '{}'",
                self.address
            ))
            .with_source(e)),
            Ok(Err(e)) => Err(Fault::connectivity(format!(
                "cannot connect to {}",
                self.address
            ))
            .with_source(e)),
            Err(_) => Err(Fault::connectivity(format!(
                "connection to {} timed out after {:?}",
                self.address, self.timeout
            ))),
        }
    }
}

impl ConnectivityProbe for TcpProbe {
    fn try_connect(&self) -> impl Future<Output = Result<(), Fault>> + Send {
        self.connect()
    }
}
