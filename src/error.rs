//! Error types for generation, run control and persistence

use thiserror::Error;

use crate::sim::RunPhase;

/// Terrain generation failed to satisfy its constraints.
///
/// With the built-in constants the feasible band is never empty, so this
/// only surfaces when the constants themselves are inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("no feasible top height near {previous} after {attempts} attempts")]
    NoFeasibleHeight { previous: i32, attempts: u32 },
}

/// Rejected run-control requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("a run is already in progress")]
    AlreadyRunning,
    #[error("run is not active (phase: {0:?})")]
    NotRunning(RunPhase),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Failures of the file-backed collaborators (high score, settings)
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}
