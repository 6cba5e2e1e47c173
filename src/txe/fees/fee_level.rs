use crate::money::MoneyValue;

use std::mem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeeLevel {
    None,
    Regular,
    Priority,

    /// User-entered fee, in the fee currency
    Custom(MoneyValue),
}

impl FeeLevel {
    /// Compares levels ignoring the amount carried by `Custom`
    pub fn is_same_kind(&self, other: &FeeLevel) -> bool {
        return mem::discriminant(self) == mem::discriminant(other);
    }
}
