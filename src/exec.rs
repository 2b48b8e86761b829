//! External command execution.
//!
//! The version, publish and status steps run user scripts and the changesets
//! CLI as child processes. Everything goes through [`CommandRunner`] so the
//! workflow can be tested without spawning processes.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::ExecError;

/// Captured output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs external commands to completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in `cwd`.
    ///
    /// A non-zero exit status is an error.
    async fn run(&self, program: &str, args: &[String], cwd: &Path)
    -> Result<CommandOutput, ExecError>;
}

/// Runs commands as tokio child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<CommandOutput, ExecError> {
        let command_line = display_command(program, args);
        info!("Running {}", command_line);

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ExecError::SpawnFailed {
                program: program.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        for line in stdout.lines() {
            debug!("{}: {}", program, line);
        }

        if !output.status.success() {
            return Err(ExecError::NonZeroExit {
                command: command_line,
                code: output.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

/// Split a script on whitespace into a program and its arguments.
///
/// No shell quoting is interpreted.
pub fn split_script(script: &str) -> Result<(String, Vec<String>), ExecError> {
    let mut parts = script.split_whitespace().map(str::to_string);
    let program = parts.next().ok_or(ExecError::EmptyCommand)?;
    Ok((program, parts.collect()))
}

/// Run a whitespace-separated script through `runner`.
pub async fn run_script<R: CommandRunner + ?Sized>(
    runner: &R,
    script: &str,
    cwd: &Path,
) -> Result<CommandOutput, ExecError> {
    let (program, args) = split_script(script)?;
    runner.run(&program, &args, cwd).await
}

fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
