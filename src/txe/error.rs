use crate::fees::FeeLevel;
use crate::models::ValidationState;
use crate::money::MoneyError;
use crate::services::ServiceError;

use std::time::Duration;

use thiserror::Error;

/// Failures of the engine itself.
///
/// A transaction that breaks a business rule is not an error: the rule is reported through
/// [`ValidationState`] on the pending transaction, and a rejected broadcast is reported through
/// [`TransactionResult::Failed`](crate::models::TransactionResult::Failed).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Timed out after {1:?} waiting for {0}")]
    Timeout(&'static str, Duration),

    /// Engine wired with operands it cannot handle. Indicates a bug in the caller.
    #[error("Invalid engine inputs: {0}")]
    InvalidInputs(String),

    #[error("Engine has not been started with a source and target")]
    NotStarted,

    #[error("Unsupported transaction: {0}")]
    UnsupportedTransaction(String),

    #[error("Fee level {0:?} is not available for {1}")]
    InvalidFeeLevel(FeeLevel, String),

    #[error("Transaction has not been initialized")]
    NotInitialized,

    #[error("Transaction cannot be executed in state {0:?}")]
    NotExecutable(ValidationState),

    #[error("Transaction processing was cancelled")]
    Cancelled,
}
