use std::fmt;

/// Outcome of the last validation run on a pending transaction.
///
/// Anything other than `CanExecute` names the first rule the transaction broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationState {
    Uninitialized,
    CanExecute,
    InvalidAmount,
    BelowMinimumLimit,
    OverMaximumLimit,
    InsufficientFunds,
    InsufficientGas,
    InvalidAddress,
    AddressIsContract,
    TransactionInFlight,
    FeeUnderMinLimit,
    FeeOverMaxLimit,
}

impl ValidationState {
    pub fn can_execute(&self) -> bool {
        return matches!(self, Self::CanExecute);
    }
}

impl fmt::Display for ValidationState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::CanExecute => "can_execute",
            Self::InvalidAmount => "invalid_amount",
            Self::BelowMinimumLimit => "below_minimum_limit",
            Self::OverMaximumLimit => "over_maximum_limit",
            Self::InsufficientFunds => "insufficient_funds",
            Self::InsufficientGas => "insufficient_gas",
            Self::InvalidAddress => "invalid_address",
            Self::AddressIsContract => "address_is_contract",
            Self::TransactionInFlight => "transaction_in_flight",
            Self::FeeUnderMinLimit => "fee_under_min_limit",
            Self::FeeOverMaxLimit => "fee_over_max_limit",
        };

        return write!(f, "{name}");
    }
}
