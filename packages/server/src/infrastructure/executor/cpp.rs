//! Sandboxed C++ execution pipeline.
//!
//! Compiles submitted source with g++ inside a [`ScratchWorkspace`], then
//! runs the produced artifact as a child process with an emptied
//! environment, a hard wall-clock deadline, and per-stream output ceilings.
//! Every failure mode is a reportable [`ExecutionOutcome`], never an error
//! that escapes to the caller: a rejected compile and a killed process are
//! normal results of running untrusted code.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::domain::{CodeExecutor, ExecutionOutcome};

use super::workspace::ScratchWorkspace;

/// Deadline for one g++ invocation.
const DEFAULT_COMPILE_TIMEOUT: Duration = Duration::from_secs(10);
/// Deadline for one run of the compiled artifact, independent of compile.
const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(5);
/// Ceiling for captured stdout, in bytes.
const DEFAULT_STDOUT_LIMIT: usize = 10_000;
/// Ceiling for captured stderr, in bytes.
const DEFAULT_STDERR_LIMIT: usize = 5_000;

const STDOUT_TRUNCATION_MARKER: &str = "\n[Output truncated - too long]";
const STDERR_TRUNCATION_MARKER: &str = "\n[Error output truncated - too long]";
const EMPTY_OUTPUT_PLACEHOLDER: &str = "No output";

/// Compile-then-run pipeline for C++ sources.
pub struct CppExecutor {
    compile_timeout: Duration,
    run_timeout: Duration,
    stdout_limit: usize,
    stderr_limit: usize,
}

impl CppExecutor {
    pub fn new() -> Self {
        Self {
            compile_timeout: DEFAULT_COMPILE_TIMEOUT,
            run_timeout: DEFAULT_RUN_TIMEOUT,
            stdout_limit: DEFAULT_STDOUT_LIMIT,
            stderr_limit: DEFAULT_STDERR_LIMIT,
        }
    }

    /// Override the bounds, mainly to keep tests fast.
    pub fn with_limits(
        compile_timeout: Duration,
        run_timeout: Duration,
        stdout_limit: usize,
        stderr_limit: usize,
    ) -> Self {
        Self {
            compile_timeout,
            run_timeout,
            stdout_limit,
            stderr_limit,
        }
    }

    /// Full pipeline for one source text. I/O errors bubble up and are
    /// converted to a `runtime-error` outcome at the trait boundary.
    async fn run_pipeline(&self, source: &str) -> io::Result<ExecutionOutcome> {
        let workspace = ScratchWorkspace::create()?;
        workspace.write_source(source).await?;

        if let Some(failure) = self.compile(&workspace).await? {
            return Ok(failure);
        }

        self.run_artifact(&workspace).await
        // workspace dropped here: scratch files are removed on every path
    }

    /// Invoke g++ with a deadline. Returns `None` on a successful compile,
    /// `Some(outcome)` when the pipeline must stop without running anything.
    async fn compile(&self, workspace: &ScratchWorkspace) -> io::Result<Option<ExecutionOutcome>> {
        let mut command = Command::new("g++");
        command
            .args(["-std=c++17", "-Wall", "-Wextra", "-O2", "-o"])
            .arg(workspace.artifact_path())
            .arg(workspace.source_path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                // Toolchain missing or not launchable on this host
                return Ok(Some(ExecutionOutcome::server_error(format!(
                    "Failed to launch compiler: {e}"
                ))));
            }
        };

        match timeout(self.compile_timeout, child.wait_with_output()).await {
            Ok(output) => {
                let output = output?;
                if output.status.success() {
                    Ok(None)
                } else {
                    let mut diagnostics = String::from_utf8_lossy(&output.stderr).into_owned();
                    if diagnostics.trim().is_empty() {
                        diagnostics = format!("g++ exited with {}", output.status);
                    }
                    Ok(Some(ExecutionOutcome::compilation_error(diagnostics)))
                }
            }
            // Dropping the wait future kills g++ (kill_on_drop)
            Err(_) => Ok(Some(ExecutionOutcome::compilation_error(format!(
                "Compilation terminated after {}s timeout",
                self.compile_timeout.as_secs()
            )))),
        }
    }

    /// Run the compiled artifact under the run deadline and output ceilings.
    async fn run_artifact(&self, workspace: &ScratchWorkspace) -> io::Result<ExecutionOutcome> {
        let mut command = Command::new(workspace.artifact_path());
        command
            .env_clear()
            .current_dir(workspace.root())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                return Ok(ExecutionOutcome::server_error(format!(
                    "Execution failed: {e}"
                )));
            }
        };

        let stdout_pipe = child.stdout.take().expect("stdout is piped");
        let stderr_pipe = child.stderr.take().expect("stderr is piped");

        // Capture tasks signal through this channel when a ceiling is hit.
        // The original sender stays in scope so the channel only yields on
        // an actual signal, never on close.
        let (ceiling_tx, mut ceiling_rx) = mpsc::channel::<()>(2);
        let stdout_task = tokio::spawn(capture_stream(
            stdout_pipe,
            self.stdout_limit,
            STDOUT_TRUNCATION_MARKER,
            ceiling_tx.clone(),
        ));
        let stderr_task = tokio::spawn(capture_stream(
            stderr_pipe,
            self.stderr_limit,
            STDERR_TRUNCATION_MARKER,
            ceiling_tx.clone(),
        ));

        let wait_result = tokio::select! {
            status = child.wait() => Some(status),
            _ = ceiling_rx.recv() => None,
            _ = tokio::time::sleep(self.run_timeout) => None,
        };

        match wait_result {
            Some(status) => {
                // Normal termination (any exit code)
                let _ = status?;
            }
            None => {
                // Output ceiling or deadline exceeded; terminate and reap
                let _ = child.start_kill();
                let _ = child.wait().await;
            }
        }

        let stdout = stdout_task.await.map_err(io::Error::other)?;
        let stderr = stderr_task.await.map_err(io::Error::other)?;

        let stdout = if stdout.is_empty() {
            EMPTY_OUTPUT_PLACEHOLDER.to_string()
        } else {
            stdout
        };

        Ok(ExecutionOutcome::execution(stdout, stderr))
    }
}

impl Default for CppExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeExecutor for CppExecutor {
    async fn execute(&self, source: &str) -> ExecutionOutcome {
        match self.run_pipeline(source).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Sandbox internal fault: {}", e);
                ExecutionOutcome::runtime_error(format!("Execution error: {e}"))
            }
        }
    }
}

/// Read a child stream incrementally, stopping at `limit` bytes. On hitting
/// the ceiling the collected text is cut to the limit, the marker is
/// appended, and a termination signal is sent.
async fn capture_stream<R>(
    mut stream: R,
    limit: usize,
    marker: &'static str,
    ceiling_tx: mpsc::Sender<()>,
) -> String
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut collected: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];
    let mut truncated = false;

    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                collected.extend_from_slice(&chunk[..n]);
                if collected.len() > limit {
                    collected.truncate(limit);
                    truncated = true;
                    let _ = ceiling_tx.send(()).await;
                    break;
                }
            }
            Err(_) => break,
        }
    }

    let mut text = String::from_utf8_lossy(&collected).into_owned();
    if truncated {
        text.push_str(marker);
    }
    text
}
