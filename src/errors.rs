/// Fatal error type for the pricing core.
/// Solver non-convergence is not an error: it is an expected outcome
/// (`SolverOutcome::Failed`) that callers pattern-match on. Only inputs
/// that make the pricing formulas undefined are surfaced here, and they
/// are rejected before any computation runs, never silently coerced.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
