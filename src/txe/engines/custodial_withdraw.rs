use super::custodial::{CustodialEngine, CustodialRoute};

use crate::models::{AccountKind, TransactionTarget};
use crate::services::TransferDestination;

/// Trading balance withdrawn on-chain, to an address or to one of the user's private key accounts
pub struct TradingToOnChain;

impl CustodialRoute for TradingToOnChain {
    const NAME: &'static str = "custodial withdrawal";

    const SOURCE_KIND: AccountKind = AccountKind::Trading;

    const PRODUCT: AccountKind = AccountKind::Trading;

    const CHARGES_FEE: bool = true;

    const CAPPED_AT_WITHDRAWABLE: bool = false;

    fn destination(target: &TransactionTarget) -> Option<TransferDestination> {
        return match target {
            TransactionTarget::Address(address) => {
                Some(TransferDestination::Address(address.clone()))
            }
            TransactionTarget::Account(account) if account.kind == AccountKind::NonCustodial => {
                Some(TransferDestination::Account(account.id.clone()))
            }
            TransactionTarget::Account(_) => None,
        };
    }
}

pub type CustodialWithdrawEngine = CustodialEngine<TradingToOnChain>;
