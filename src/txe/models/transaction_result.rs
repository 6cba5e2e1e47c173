use crate::ids::TransactionHash;
use crate::money::MoneyValue;
use crate::EngineError;

/// Terminal outcome of executing a pending transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionResult {
    /// Broadcast on-chain
    Hashed {
        hash: TransactionHash,
        amount: MoneyValue,
    },

    /// Accepted by a custodial backend, identified by its order or withdrawal reference
    Unhashed {
        amount: MoneyValue,
        reference: Option<String>,
    },

    /// Validation passed but the submission itself was rejected
    Failed { error: EngineError },
}

impl TransactionResult {
    pub fn is_success(&self) -> bool {
        return !matches!(self, Self::Failed { .. });
    }
}
