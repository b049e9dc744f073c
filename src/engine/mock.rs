//! A scripted engine for tests. No process is spawned.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, bail};
use async_trait::async_trait;

use super::{Engine, EngineOutcome};

/// Returns one pre-defined outcome on every call and counts invocations,
/// so tests can assert the engine was (or was not) run.
pub struct MockEngine {
    outcome: Option<EngineOutcome>,
    calls: AtomicUsize,
}

impl MockEngine {
    /// An engine that always yields `outcome`.
    pub fn returning(outcome: EngineOutcome) -> Self {
        Self {
            outcome: Some(outcome),
            calls: AtomicUsize::new(0),
        }
    }

    /// An engine that exits 0 with the given stdout.
    pub fn completed(stdout: &str) -> Self {
        Self::returning(EngineOutcome::Completed {
            stdout: stdout.to_string(),
        })
    }

    /// An engine whose spawn fails, as if the executable were missing.
    pub fn unlaunchable() -> Self {
        Self {
            outcome: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `run` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Engine for MockEngine {
    async fn run(&self, _input: &str) -> Result<EngineOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Some(outcome) => Ok(outcome.clone()),
            None => bail!("mock engine: executable not found"),
        }
    }
}
