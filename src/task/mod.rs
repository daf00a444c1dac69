//! Dependent tasks run once the dependency is reachable.
//!
//! # Design Decisions
//! - A task reports its exit status; only a spawn failure is a `Fault`
//! - The gate turns a non-success exit into a generic fault and retries

pub mod command;

use std::fmt;
use std::future::Future;

use serde::Serialize;

use crate::resilience::Fault;

pub use command::CommandRunner;

/// Flags forwarded to a dependent task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFlags {
    /// Run without interactive confirmation (e.g. in production).
    pub force: bool,
}

/// Exit status of a dependent task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskExit {
    /// Exit code, `None` when the task was terminated by a signal.
    pub code: Option<i32>,
}

impl TaskExit {
    pub const SUCCESS: TaskExit = TaskExit { code: Some(0) };

    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for TaskExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {}", code),
            None => write!(f, "termination by signal"),
        }
    }
}

impl From<std::process::ExitStatus> for TaskExit {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Runs the operation that depends on a live connection.
pub trait TaskRunner {
    /// Name used in log entries.
    fn name(&self) -> &str;

    fn run(&self, flags: TaskFlags) -> impl Future<Output = Result<TaskExit, Fault>> + Send;
}

impl<T: TaskRunner + ?Sized> TaskRunner for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn run(&self, flags: TaskFlags) -> impl Future<Output = Result<TaskExit, Fault>> + Send {
        (**self).run(flags)
    }
}

/// Placeholder for gates without a dependent task. Cannot be constructed.
#[derive(Debug)]
pub enum NoTask {}

impl TaskRunner for NoTask {
    fn name(&self) -> &str {
        match *self {}
    }

    #[allow(unreachable_code)]
    fn run(&self, _flags: TaskFlags) -> impl Future<Output = Result<TaskExit, Fault>> + Send {
        std::future::ready::<Result<TaskExit, Fault>>(match *self {})
    }
}
