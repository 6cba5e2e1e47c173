use super::{ConfirmationKind, TransactionConfirmation, ValidationState};

use crate::fees::{FeeLevel, FeeSelection};
use crate::money::{CryptoCurrency, FiatCurrency, MoneyValue};

/// The single in-flight transaction attempt owned by an engine.
///
/// `amount` and `available` are denominated in the source asset, `fee_amount` and
/// `fee_for_full_available` in the fee asset, which differs for ERC-20 sends.
/// Confirmations are rebuilt as a whole whenever an input changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    pub amount: MoneyValue,
    pub available: MoneyValue,
    pub fee_amount: MoneyValue,
    pub fee_for_full_available: MoneyValue,
    pub fee_selection: FeeSelection,
    pub selected_fiat_currency: FiatCurrency,
    pub minimum_limit: Option<MoneyValue>,
    pub maximum_limit: Option<MoneyValue>,
    pub confirmations: Vec<TransactionConfirmation>,
    pub validation_state: ValidationState,
}

impl PendingTransaction {
    /// Fresh transaction with every amount zeroed
    pub fn zero(
        asset: &CryptoCurrency,
        fee_selection: FeeSelection,
        selected_fiat_currency: FiatCurrency,
    ) -> Self {
        let fee_asset = fee_selection.asset.clone();

        return Self {
            amount: MoneyValue::zero(asset),
            available: MoneyValue::zero(asset),
            fee_amount: MoneyValue::zero(&fee_asset),
            fee_for_full_available: MoneyValue::zero(&fee_asset),
            fee_selection,
            selected_fiat_currency,
            minimum_limit: None,
            maximum_limit: None,
            confirmations: vec![],
            validation_state: ValidationState::Uninitialized,
        };
    }

    pub fn can_execute(&self) -> bool {
        return self.validation_state.can_execute();
    }

    pub fn fee_level(&self) -> &FeeLevel {
        return &self.fee_selection.selected_level;
    }

    pub fn with_validation_state(mut self, validation_state: ValidationState) -> Self {
        self.validation_state = validation_state;
        return self;
    }

    pub fn with_confirmations(mut self, confirmations: Vec<TransactionConfirmation>) -> Self {
        self.confirmations = confirmations;
        return self;
    }

    /// Replaces the confirmation of the same kind in place, or appends it when absent
    pub fn insert_confirmation(mut self, confirmation: TransactionConfirmation) -> Self {
        let kind = confirmation.kind();

        match self.confirmations.iter_mut().find(|c| c.kind() == kind) {
            Some(existing) => *existing = confirmation,
            None => self.confirmations.push(confirmation),
        }

        return self;
    }

    pub fn confirmation(&self, kind: ConfirmationKind) -> Option<&TransactionConfirmation> {
        return self.confirmations.iter().find(|c| c.kind() == kind);
    }
}
