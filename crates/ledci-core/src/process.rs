//! External command execution with captured output.

use crate::error::{CiError, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

/// Description of an external command to run.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: String,

    /// Arguments passed verbatim (no shell expansion).
    pub args: Vec<String>,

    /// Working directory; inherits the current one when `None`.
    pub cwd: Option<PathBuf>,

    /// Interleave stderr into stdout in arrival order.
    pub merge_stderr: bool,

    /// Turn a non-zero exit into `CiError::CommandFailed`.
    pub check: bool,
}

impl CommandSpec {
    /// Create a checked command with separate stdout/stderr capture.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            merge_stderr: false,
            check: true,
        }
    }

    /// Run the command from `dir`.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Capture stderr merged into stdout.
    pub fn merged(mut self) -> Self {
        self.merge_stderr = true;
        self
    }

    /// Report a non-zero exit as a normal output instead of an error.
    pub fn unchecked(mut self) -> Self {
        self.check = false;
        self
    }

    /// Render the command line for display, quoting arguments with whitespace.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| quote_arg(part))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        "\"\"".to_string()
    } else if arg.chars().any(|c| c.is_whitespace() || c == '"') {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    /// Rendered command line.
    pub command: String,

    /// Exit code (-1 when terminated by a signal).
    pub exit_code: i32,

    /// Captured stdout, or the merged stream when `merge_stderr` was set.
    pub stdout: String,

    /// Captured stderr; empty when merged.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// Whether the process exited successfully.
    pub success: bool,
}

/// Run an external command to completion and capture its output.
///
/// No timeout is applied. When `spec.check` is set, a non-zero exit logs the
/// captured output at `warn` and returns `CiError::CommandFailed`.
pub async fn run_command(spec: &CommandSpec) -> Result<CommandOutput> {
    let command = spec.display();
    debug!(command = %command, cwd = ?spec.cwd, "Running command");

    let start = Instant::now();
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &spec.cwd {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|source| CiError::Spawn {
        command: command.clone(),
        source,
    })?;

    let (stdout, stderr, status) = if spec.merge_stderr {
        let (out, err) = take_pipes(&mut child)?;
        let merged = read_merged(out, err).await?;
        let status = child.wait().await?;
        (merged, String::new(), status)
    } else {
        let output = child.wait_with_output().await?;
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status,
        )
    };

    let output = CommandOutput {
        command,
        exit_code: status.code().unwrap_or(-1),
        stdout,
        stderr,
        duration_ms: start.elapsed().as_millis() as u64,
        success: status.success(),
    };

    if spec.check && !output.success {
        warn!(
            command = %output.command,
            exit_code = output.exit_code,
            "Command failed:\nstdout:\n{}\n\nstderr:\n{}",
            output.stdout,
            output.stderr
        );
        return Err(CiError::CommandFailed {
            command: output.command,
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }

    Ok(output)
}

fn take_pipes(
    child: &mut tokio::process::Child,
) -> Result<(tokio::process::ChildStdout, tokio::process::ChildStderr)> {
    let out = child.stdout.take();
    let err = child.stderr.take();
    match (out, err) {
        (Some(out), Some(err)) => Ok((out, err)),
        _ => Err(CiError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "child output pipes were not captured",
        ))),
    }
}

/// Interleave two streams line by line, in the order lines arrive.
async fn read_merged<A, B>(out: A, err: B) -> Result<String>
where
    A: AsyncRead + Unpin,
    B: AsyncRead + Unpin,
{
    let mut out = BufReader::new(out);
    let mut err = BufReader::new(err);
    // Partial lines survive a lost select race inside these buffers.
    let mut out_line = Vec::new();
    let mut err_line = Vec::new();
    let mut out_done = false;
    let mut err_done = false;
    let mut merged = String::new();

    while !(out_done && err_done) {
        tokio::select! {
            read = out.read_until(b'\n', &mut out_line), if !out_done => {
                if read? == 0 {
                    out_done = true;
                } else {
                    merged.push_str(&String::from_utf8_lossy(&out_line));
                    out_line.clear();
                }
            }
            read = err.read_until(b'\n', &mut err_line), if !err_done => {
                if read? == 0 {
                    err_done = true;
                } else {
                    merged.push_str(&String::from_utf8_lossy(&err_line));
                    err_line.clear();
                }
            }
        }
    }

    Ok(merged)
}
