use crate::models::{AccountKind, AssetAction, BlockchainAccount, TransactionTarget};
use crate::{EngineError, Result};

use std::fmt;

/// Which engine moves funds for a source, target and action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    NativeCoin,
    Token,
    CustodialTransfer,
    CustodialWithdraw,
    InterestWithdraw,
}

impl EngineKind {
    pub fn resolve(
        source: &BlockchainAccount,
        target: &TransactionTarget,
        action: AssetAction,
    ) -> Result<Self> {
        let unsupported = || {
            EngineError::UnsupportedTransaction(format!(
                "{action} of {} from {} account to {}",
                source.asset,
                source.kind,
                describe(target)
            ))
        };

        if target.asset() != &source.asset {
            Err(unsupported())?
        }

        let target_kind = target.account_kind();

        let kind = match (action, source.kind, target_kind) {
            (AssetAction::Send, AccountKind::NonCustodial, _) if source.asset.is_erc20() => {
                Self::Token
            }
            (AssetAction::Send, AccountKind::NonCustodial, _) => Self::NativeCoin,
            (
                AssetAction::Send | AssetAction::Withdraw,
                AccountKind::Trading,
                None | Some(AccountKind::NonCustodial),
            ) => Self::CustodialWithdraw,
            (AssetAction::InterestTransfer, AccountKind::Trading, Some(AccountKind::Interest)) => {
                Self::CustodialTransfer
            }
            (
                AssetAction::InterestWithdraw,
                AccountKind::Interest,
                Some(AccountKind::Trading | AccountKind::NonCustodial),
            ) => Self::InterestWithdraw,
            _ => Err(unsupported())?,
        };

        log::debug!("Resolved {kind} engine for {action} of {}", source.asset);

        return Ok(kind);
    }
}

fn describe(target: &TransactionTarget) -> String {
    return match target {
        TransactionTarget::Address(address) => format!("{} address", address.asset),
        TransactionTarget::Account(account) => {
            format!("{} {} account", account.asset, account.kind)
        }
    };
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::NativeCoin => "native coin",
            Self::Token => "token",
            Self::CustodialTransfer => "custodial transfer",
            Self::CustodialWithdraw => "custodial withdraw",
            Self::InterestWithdraw => "interest withdraw",
        };

        return write!(f, "{name}");
    }
}
