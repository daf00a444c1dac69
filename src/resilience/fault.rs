//! Faults raised by collaborators of the startup gate.
//!
//! A fault is either a connectivity fault (the dependency could not be
//! reached) or a generic fault (anything else). The distinction only
//! affects how the failure is logged; both are retried the same way.

use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;

use serde::Serialize;

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Classification of a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    Connectivity,
    Generic,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Connectivity => write!(f, "connectivity"),
            FaultKind::Generic => write!(f, "generic"),
        }
    }
}

/// A failure reported by a probe or a dependent task.
///
/// Captures a backtrace at construction. Generic faults always capture one;
/// connectivity faults only when `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE`
/// enables it.
#[derive(Debug)]
pub struct Fault {
    kind: FaultKind,
    message: String,
    source: Option<BoxError>,
    backtrace: Backtrace,
}

impl Fault {
    /// Create a connectivity fault.
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Connectivity, message)
    }

    /// Create a generic fault.
    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Generic, message)
    }

    fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        let backtrace = match kind {
            FaultKind::Generic => Backtrace::force_capture(),
            FaultKind::Connectivity => Backtrace::capture(),
        };
        Self {
            kind,
            message: message.into(),
            source: None,
            backtrace,
        }
    }

    /// Attach the underlying error.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// Render the fault and every source below it, outermost first.
    pub fn chain(&self) -> String {
        let mut rendered = self.to_string();
        let mut current = self.source();
        while let Some(err) = current {
            rendered.push_str(": ");
            rendered.push_str(&err.to_string());
            current = err.source();
        }
        rendered
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fault: {}", self.kind, self.message)
    }
}

impl Error for Fault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|err| err.as_ref() as &(dyn Error + 'static))
    }
}
