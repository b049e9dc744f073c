//! The recovery engine boundary. The server only knows this trait.
//!
//! The real implementation ([`process::ProcessEngine`]) spawns an external
//! program per request; tests substitute [`mock::MockEngine`].

pub mod mock;
pub mod process;

use anyhow::Result;
use async_trait::async_trait;

/// How one engine invocation ended. Spawn failures (missing executable,
/// permission denied) are the `Err` arm of [`Engine::run`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutcome {
    /// The engine exited 0. `stdout` is the full text it produced.
    Completed { stdout: String },
    /// The engine exited non-zero or was killed by a signal (`code` is
    /// `None` for signals). `stderr` is kept for server-side diagnostics.
    Failed {
        stdout: String,
        stderr: String,
        code: Option<i32>,
    },
    /// The engine ran past its deadline and was forcibly terminated.
    /// `stdout` holds whatever it produced before the kill.
    TimedOut { stdout: String },
}

/// One external recovery run per call. Implementations must not share
/// state between calls — each request owns its own invocation.
#[async_trait]
pub trait Engine: Send + Sync {
    async fn run(&self, input: &str) -> Result<EngineOutcome>;
}
