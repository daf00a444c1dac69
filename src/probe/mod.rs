//! Dependency connectivity probes.
//!
//! # Data Flow
//! ```text
//! StartupGate attempt
//!     → ConnectivityProbe::try_connect()
//!     → Ok(())                 dependency reachable
//!     → Err(Fault::Connectivity) dependency not (yet) reachable
//!     → Err(Fault::Generic)      anything the probe cannot classify
//! ```
//!
//! # Design Decisions
//! - A probe only answers "reachable right now"; retrying is the gate's job
//! - Each probe enforces its own connect timeout

pub mod tcp;

use std::future::Future;

use crate::resilience::Fault;

pub use tcp::TcpProbe;

/// Checks whether a dependency is reachable.
pub trait ConnectivityProbe {
    fn try_connect(&self) -> impl Future<Output = Result<(), Fault>> + Send;
}

impl<P: ConnectivityProbe + ?Sized> ConnectivityProbe for &P {
    fn try_connect(&self) -> impl Future<Output = Result<(), Fault>> + Send {
        (**self).try_connect()
    }
}
