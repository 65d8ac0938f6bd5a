use thiserror::Error;

use vigil_core::error::CoreError;

/// Hard precondition failures of an evaluation run. Malformed nodes inside
/// an otherwise valid schema never surface here.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] CoreError),
}
