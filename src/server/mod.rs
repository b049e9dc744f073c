//! The HTTP boundary: `POST /api/recover` plus a liveness probe.
//!
//! The axum handler is a thin wrapper over [`handle`], which is what the
//! integration tests exercise directly with a mock engine.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::engine::{Engine, EngineOutcome};
use crate::protocol::RecoveryResult;
use crate::protocol::parser::parse;

/// Shared per-process state. Nothing here is mutated by requests; each
/// request owns its own engine invocation end to end.
pub struct AppState {
    pub engine: Arc<dyn Engine>,
    /// Caps concurrent engine processes. A policy knob, not a
    /// correctness requirement.
    pub limiter: Semaphore,
}

impl AppState {
    pub fn new(engine: Arc<dyn Engine>, max_concurrent: usize) -> Self {
        Self {
            engine,
            limiter: Semaphore::new(max_concurrent),
        }
    }
}

/// What a caller can be told went wrong. Messages are deliberately
/// generic: engine stderr and spawn details stay in server-side logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoverError {
    #[error("recovery input must not be empty")]
    InvalidInput,
    #[error("wallet recovery engine is unavailable")]
    EngineUnavailable,
    #[error("wallet recovery engine failed")]
    EngineFailed,
    #[error("wallet recovery engine timed out")]
    EngineTimedOut,
}

impl RecoverError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::EngineUnavailable | Self::EngineFailed | Self::EngineTimedOut => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RecoverError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct RecoverRequest {
    #[serde(default)]
    pub input: String,
}

/// Build the service router.
pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/recover", post(recover))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn recover(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecoverRequest>,
) -> Result<Json<RecoveryResult>, RecoverError> {
    handle(&state, &request.input).await.map(Json)
}

/// Run one recovery request: validate, invoke the engine once, parse its
/// stdout. No retries here; that is caller policy.
pub async fn handle(state: &AppState, input: &str) -> Result<RecoveryResult, RecoverError> {
    if input.trim().is_empty() {
        return Err(RecoverError::InvalidInput);
    }

    let _permit = state
        .limiter
        .acquire()
        .await
        .map_err(|_| RecoverError::EngineUnavailable)?;

    match state.engine.run(input).await {
        Ok(EngineOutcome::Completed { stdout }) => {
            let outcome = parse(stdout.lines());
            for warning in &outcome.warnings {
                warn!(%warning, "recovery engine emitted unparseable protocol line");
            }
            info!(
                variations = outcome.result.variations.len(),
                "recovery run completed"
            );
            Ok(outcome.result)
        }
        Ok(EngineOutcome::Failed { stderr, code, .. }) => {
            error!(?code, %stderr, "recovery engine exited abnormally");
            Err(RecoverError::EngineFailed)
        }
        Ok(EngineOutcome::TimedOut { .. }) => {
            error!("recovery engine timed out and was killed");
            Err(RecoverError::EngineTimedOut)
        }
        Err(cause) => {
            error!("failed to launch recovery engine: {cause:#}");
            Err(RecoverError::EngineUnavailable)
        }
    }
}
