use super::{AccountKind, BlockchainAccount};

use crate::money::CryptoCurrency;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveAddress {
    pub address: String,
    pub asset: CryptoCurrency,
    pub memo: Option<String>,
}

impl ReceiveAddress {
    pub fn new(address: impl Into<String>, asset: CryptoCurrency) -> Self {
        return Self {
            address: address.into(),
            asset,
            memo: None,
        };
    }
}

/// Destination of a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionTarget {
    Address(ReceiveAddress),
    Account(BlockchainAccount),
}

impl TransactionTarget {
    pub fn label(&self) -> String {
        return match self {
            Self::Address(address) => address.address.clone(),
            Self::Account(account) => account.label.clone(),
        };
    }

    pub fn asset(&self) -> &CryptoCurrency {
        return match self {
            Self::Address(address) => &address.asset,
            Self::Account(account) => &account.asset,
        };
    }

    /// On-chain address funds should land on, if the target has one
    pub fn receive_address(&self) -> Option<ReceiveAddress> {
        return match self {
            Self::Address(address) => Some(address.clone()),
            Self::Account(account) => account.receive_address(),
        };
    }

    pub fn account_kind(&self) -> Option<AccountKind> {
        return match self {
            Self::Address(_) => None,
            Self::Account(account) => Some(account.kind),
        };
    }
}
