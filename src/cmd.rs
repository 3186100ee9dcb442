use std::path::Path;
use std::process::{Command, Output, Stdio};

use tracing::{debug, info, warn};

use crate::error::{LaunchError, LaunchResult};

/// Executes external programs on behalf of the launch stages.
///
/// Every stage goes through this trait so the whole sequence can be
/// driven against a recording fake instead of real `git`/`docker`.
pub trait Runner {
    /// Run a program and return its trimmed stdout.
    fn capture(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> LaunchResult<String>;

    /// Run a program with inherited stdio.
    fn stream(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> LaunchResult<()>;
}

/// Runs real processes on the local machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn capture(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> LaunchResult<String> {
        debug!("Running: {}", format_command(program, args));
        run(program, args, cwd)
    }

    fn stream(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> LaunchResult<()> {
        info!("Running: {}", format_command(program, args));
        run_interactive(program, args, cwd)
    }
}

/// Run a command and capture its output. Fails if the command
/// returns a non-zero exit code.
pub fn run(program: &str, args: &[&str], cwd: Option<&Path>) -> LaunchResult<String> {
    let output = spawn(program, args, cwd)?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let command = format_command(program, args);
        if !stderr.is_empty() {
            warn!("stderr: {stderr}");
        }
        Err(LaunchError::CommandFailed {
            command,
            code: output.status.code(),
        })
    }
}

/// Run a command with stdin/stdout/stderr inherited (interactive).
pub fn run_interactive(program: &str, args: &[&str], cwd: Option<&Path>) -> LaunchResult<()> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let status = command.status().map_err(|e| not_found_or_io(program, e))?;

    if status.success() {
        Ok(())
    } else {
        Err(LaunchError::CommandFailed {
            command: format_command(program, args),
            code: status.code(),
        })
    }
}

/// Render a command line for logs and error messages.
#[must_use]
pub fn format_command(program: &str, args: &[&str]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().map(|a| (*a).to_string()));
    parts.join(" ")
}

fn spawn(program: &str, args: &[&str], cwd: Option<&Path>) -> LaunchResult<Output> {
    let mut command = Command::new(program);
    command.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }
    command.output().map_err(|e| not_found_or_io(program, e))
}

fn not_found_or_io(program: &str, e: std::io::Error) -> LaunchError {
    if e.kind() == std::io::ErrorKind::NotFound {
        LaunchError::CommandNotFound(program.to_string())
    } else {
        LaunchError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_joins_args() {
        assert_eq!(
            format_command("docker", &["compose", "-p", "localai", "down"]),
            "docker compose -p localai down"
        );
    }

    #[test]
    fn missing_program_is_command_not_found() {
        let err = run("definitely-not-a-real-program-xyz", &[], None).unwrap_err();
        assert!(matches!(
            err,
            LaunchError::CommandNotFound(ref p) if p == "definitely-not-a-real-program-xyz"
        ));
    }
}
