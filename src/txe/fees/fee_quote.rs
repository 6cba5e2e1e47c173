use super::FeeLevel;

use crate::money::{MoneyError, MoneyValue};

/// Bounds a custom fee must stay within
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeLimits {
    pub min: MoneyValue,
    pub max: MoneyValue,
}

/// Network fee per level for one asset, denominated in that asset's fee currency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeQuote {
    pub regular: MoneyValue,
    pub priority: MoneyValue,
    pub custom_limits: Option<FeeLimits>,
}

impl FeeQuote {
    pub fn new(regular: MoneyValue, priority: MoneyValue) -> Self {
        return Self {
            regular,
            priority,
            custom_limits: None,
        };
    }

    pub fn with_custom_limits(mut self, min: MoneyValue, max: MoneyValue) -> Self {
        self.custom_limits = Some(FeeLimits { min, max });
        return self;
    }

    pub fn fee_for(&self, level: &FeeLevel) -> Result<MoneyValue, MoneyError> {
        return match level {
            FeeLevel::None => Ok(MoneyValue::zero(self.regular.currency().clone())),
            FeeLevel::Regular => Ok(self.regular.clone()),
            FeeLevel::Priority => Ok(self.priority.clone()),
            FeeLevel::Custom(amount) => {
                if amount.currency() != self.regular.currency() {
                    Err(MoneyError::CurrencyMismatch(
                        "fee",
                        amount.clone(),
                        self.regular.clone(),
                    ))?
                }

                Ok(amount.clone())
            }
        };
    }
}

/// What a custodial product charges to move funds out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustodialFees {
    pub fee: MoneyValue,
    pub minimum: MoneyValue,
}
