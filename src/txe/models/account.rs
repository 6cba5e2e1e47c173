use super::ReceiveAddress;

use crate::ids::AccountId;
use crate::money::CryptoCurrency;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    /// Keys held by the user, transfers go on-chain
    NonCustodial,

    /// Custodial brokerage balance
    Trading,

    /// Custodial balance earning rewards
    Interest,
}

impl AccountKind {
    pub fn is_custodial(&self) -> bool {
        return !matches!(self, Self::NonCustodial);
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::NonCustodial => "private",
            Self::Trading => "trading",
            Self::Interest => "interest",
        };

        return write!(f, "{name}");
    }
}

/// An account funds can be sent from or to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockchainAccount {
    pub id: AccountId,
    pub label: String,
    pub asset: CryptoCurrency,
    pub kind: AccountKind,
    pub receive_address: Option<String>,
}

impl BlockchainAccount {
    pub fn new(
        id: AccountId,
        label: impl Into<String>,
        asset: CryptoCurrency,
        kind: AccountKind,
    ) -> Self {
        return Self {
            id,
            label: label.into(),
            asset,
            kind,
            receive_address: None,
        };
    }

    pub fn with_receive_address(mut self, address: impl Into<String>) -> Self {
        self.receive_address = Some(address.into());
        return self;
    }

    pub fn receive_address(&self) -> Option<ReceiveAddress> {
        return self
            .receive_address
            .as_ref()
            .map(|address| ReceiveAddress::new(address.clone(), self.asset.clone()));
    }
}
