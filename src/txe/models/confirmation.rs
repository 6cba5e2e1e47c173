use crate::fees::FeeSelection;
use crate::money::MoneyValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmationKind {
    Source,
    Destination,
    FeeSelection,
    NetworkFee,
    Amount,
    Total,
}

/// One user-facing line item of the confirmation screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionConfirmation {
    Source { label: String },
    Destination { label: String },
    FeeSelection(FeeSelection),
    NetworkFee { fee: MoneyValue, fiat: MoneyValue },
    Amount { amount: MoneyValue, fiat: MoneyValue },

    /// `total` is only present when amount and fee share a currency
    Total { total: Option<MoneyValue>, fiat: MoneyValue },
}

impl TransactionConfirmation {
    pub fn kind(&self) -> ConfirmationKind {
        return match self {
            Self::Source { .. } => ConfirmationKind::Source,
            Self::Destination { .. } => ConfirmationKind::Destination,
            Self::FeeSelection(_) => ConfirmationKind::FeeSelection,
            Self::NetworkFee { .. } => ConfirmationKind::NetworkFee,
            Self::Amount { .. } => ConfirmationKind::Amount,
            Self::Total { .. } => ConfirmationKind::Total,
        };
    }
}
