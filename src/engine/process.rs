//! Subprocess implementation of [`Engine`].
//!
//! Per request: spawn the engine, feed the recovery input over stdin,
//! drain stdout and stderr concurrently, and race the exit against a
//! deadline. Draining both pipes at once matters: reading only one
//! deadlocks as soon as the engine fills the other pipe's OS buffer.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, warn};

use super::{Engine, EngineOutcome};

/// Deployment knobs for the external engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Program to invoke, e.g. `python3`.
    pub program: PathBuf,
    /// Arguments, e.g. `["wallet_recovery.py", "-"]`. The recovery input
    /// itself goes over stdin, never the argument list.
    pub args: Vec<String>,
    /// Working directory for the engine, if different from ours.
    pub working_dir: Option<PathBuf>,
    /// Deadline measured from spawn. Past it the engine is killed.
    pub timeout: Duration,
}

/// Spawns one engine process per [`run`](Engine::run) call.
pub struct ProcessEngine {
    config: EngineConfig,
}

impl ProcessEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Engine for ProcessEngine {
    async fn run(&self, input: &str) -> Result<EngineOutcome> {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // If our future is dropped (caller disconnected), the engine
            // must not keep running unobserved.
            .kill_on_drop(true);
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().with_context(|| {
            format!(
                "failed to spawn recovery engine `{}`",
                self.config.program.display()
            )
        })?;
        debug!(program = %self.config.program.display(), "spawned recovery engine");

        let mut stdin = child.stdin.take().context("engine stdin not piped")?;
        let stdout = child.stdout.take().context("engine stdout not piped")?;
        let stderr = child.stderr.take().context("engine stderr not piped")?;

        // Feed input and close stdin so the engine sees end-of-input.
        // Write errors are tolerated: an engine that exits without
        // reading its stdin just breaks the pipe.
        let input = input.to_owned();
        let feed = tokio::spawn(async move {
            let _ = stdin.write_all(input.as_bytes()).await;
            let _ = stdin.shutdown().await;
        });
        let stdout_reader = tokio::spawn(drain(stdout));
        let stderr_reader = tokio::spawn(drain(stderr));

        let status = tokio::select! {
            status = child.wait() => {
                Some(status.context("failed to wait for recovery engine")?)
            }
            () = tokio::time::sleep(self.config.timeout) => {
                warn!(timeout = ?self.config.timeout, "recovery engine hit its deadline, killing it");
                child.start_kill().context("failed to kill timed-out engine")?;
                // Reap so no zombie is left behind.
                child.wait().await.context("failed to reap timed-out engine")?;
                None
            }
        };

        let _ = feed.await;
        let stdout_text = stdout_reader.await.context("stdout reader panicked")?;
        let stderr_text = stderr_reader.await.context("stderr reader panicked")?;

        match status {
            None => Ok(EngineOutcome::TimedOut {
                stdout: stdout_text,
            }),
            Some(status) if status.success() => Ok(EngineOutcome::Completed {
                stdout: stdout_text,
            }),
            Some(status) => Ok(EngineOutcome::Failed {
                stdout: stdout_text,
                stderr: stderr_text,
                code: status.code(),
            }),
        }
    }
}

/// Read a pipe to EOF, keeping whatever arrived even if the read errors
/// mid-stream (a killed engine still yields its partial output).
async fn drain(mut pipe: impl AsyncRead + Unpin) -> String {
    let mut buf = Vec::new();
    let _ = pipe.read_to_end(&mut buf).await;
    String::from_utf8_lossy(&buf).into_owned()
}
