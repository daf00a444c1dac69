//! External command runner (schema migrations).

use std::future::Future;
use std::process::Stdio;

use tokio::process::Command;

use crate::resilience::Fault;
use crate::task::{TaskExit, TaskFlags, TaskRunner};

/// Runs an external program with inherited stdio.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    args: Vec<String>,
    force_flag: String,
}

impl CommandRunner {
    /// Build a runner from an argv. Returns `None` when `argv` is empty.
    pub fn from_argv(argv: &[String], force_flag: impl Into<String>) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            force_flag: force_flag.into(),
        })
    }

    /// Arguments passed for the given flags.
    pub fn args_for(&self, flags: TaskFlags) -> Vec<String> {
        let mut args = self.args.clone();
        if flags.force && !self.force_flag.is_empty() {
            args.push(self.force_flag.clone());
        }
        args
    }

    async fn execute(&self, flags: TaskFlags) -> Result<TaskExit, Fault> {
        let args = self.args_for(flags);
        tracing::debug!(program = %self.program, args = ?args, "Spawning dependent task");

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                Fault::generic(format!("failed to spawn '{}'", self.program)).with_source(e)
            })?;

        Ok(TaskExit::from(status))
    }
}

impl TaskRunner for CommandRunner {
    fn name(&self) -> &str {
        &self.program
    }

    fn run(&self, flags: TaskFlags) -> impl Future<Output = Result<TaskExit, Fault>> + Send {
        self.execute(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::FaultKind;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_argv_rejected() {
        assert!(CommandRunner::from_argv(&[], "--force").is_none());
    }

    #[test]
    fn test_force_flag_appended() {
        let runner = CommandRunner::from_argv(&argv(&["migrate", "up"]), "--force").unwrap();
        assert_eq!(runner.args_for(TaskFlags { force: false }), argv(&["up"]));
        assert_eq!(
            runner.args_for(TaskFlags { force: true }),
            argv(&["up", "--force"])
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_reported() {
        let ok = CommandRunner::from_argv(&argv(&["true"]), "--force").unwrap();
        assert_eq!(ok.run(TaskFlags::default()).await.unwrap(), TaskExit::SUCCESS);

        let failing = CommandRunner::from_argv(&argv(&["false"]), "--force").unwrap();
        let exit = failing.run(TaskFlags::default()).await.unwrap();
        assert_eq!(exit, TaskExit::from_code(1));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_force_flag_reaches_program() {
        let runner = CommandRunner::from_argv(
            &argv(&["sh", "-c", "test \"$1\" = --force", "sh"]),
            "--force",
        )
        .unwrap();

        assert!(runner.run(TaskFlags { force: true }).await.unwrap().success());
        assert!(!runner.run(TaskFlags { force: false }).await.unwrap().success());
    }

    #[tokio::test]
    async fn test_missing_program_is_generic_fault() {
        let runner =
            CommandRunner::from_argv(&argv(&["startup-gate-no-such-program"]), "--force").unwrap();
        let fault = runner.run(TaskFlags::default()).await.unwrap_err();
        assert_eq!(fault.kind(), FaultKind::Generic);
    }
}
