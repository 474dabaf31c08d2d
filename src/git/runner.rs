//! External command execution.
//!
//! Every git (and gh) invocation goes through a [`CommandRunner`] so the
//! worktree manager can be driven by a scripted runner in tests.

use std::path::Path;
use std::process::Command;
use std::time::Instant;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Trimmed standard output
    pub stdout: String,
    /// Trimmed standard error
    pub stderr: String,
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an external program in a working directory and captures its output.
pub trait CommandRunner: Send + Sync {
    /// Run `program args...` with `cwd` as working directory.
    ///
    /// Returns `Err` only when the process could not be started (missing
    /// binary, missing directory); a non-zero exit is a normal `Ok`.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> std::io::Result<CommandOutput>;
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> std::io::Result<CommandOutput> {
        let cmd_str = if args.is_empty() {
            program.to_string()
        } else {
            format!("{} {}", program, args.join(" "))
        };
        log::debug!("$ {} [{}]", cmd_str, cwd.display());

        let t0 = Instant::now();
        let result = Command::new(program).args(args).current_dir(cwd).output();
        let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(output) => log::debug!(
                "[trace] cmd=\"{}\" dur={:.1}ms ok={}",
                cmd_str,
                duration_ms,
                output.status.success()
            ),
            Err(e) => log::debug!(
                "[trace] cmd=\"{}\" dur={:.1}ms err=\"{}\"",
                cmd_str,
                duration_ms,
                e
            ),
        }

        let output = result?;
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            code: output.status.code(),
        })
    }
}
