use super::FeeLevel;

use crate::money::{CryptoCurrency, MoneyValue};

/// The chosen fee level, the levels the engine offers, and the asset fees are paid in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSelection {
    pub selected_level: FeeLevel,
    pub available_levels: Vec<FeeLevel>,
    pub asset: CryptoCurrency,
}

impl FeeSelection {
    pub fn new(
        selected_level: FeeLevel,
        available_levels: Vec<FeeLevel>,
        asset: CryptoCurrency,
    ) -> Self {
        return Self {
            selected_level,
            available_levels,
            asset,
        };
    }

    /// Regular, priority and custom on-chain fees, regular preselected
    pub fn on_chain(asset: CryptoCurrency, allow_custom: bool) -> Self {
        let mut available_levels = vec![FeeLevel::Regular, FeeLevel::Priority];

        if allow_custom {
            available_levels.push(FeeLevel::Custom(MoneyValue::zero(&asset)));
        }

        return Self::new(FeeLevel::Regular, available_levels, asset);
    }

    /// No choice offered, the fee is whatever the product charges
    pub fn none(asset: CryptoCurrency) -> Self {
        return Self::new(FeeLevel::None, vec![FeeLevel::None], asset);
    }

    pub fn is_available(&self, level: &FeeLevel) -> bool {
        return self
            .available_levels
            .iter()
            .any(|available| available.is_same_kind(level));
    }

    pub fn has_choice(&self) -> bool {
        return self.available_levels.len() > 1;
    }

    pub fn with_selected_level(mut self, level: FeeLevel) -> Self {
        self.selected_level = level;
        return self;
    }
}
