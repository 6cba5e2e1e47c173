use super::custodial::{CustodialEngine, CustodialRoute};

use crate::models::{AccountKind, TransactionTarget};
use crate::services::TransferDestination;

/// Interest balance withdrawn back to the trading account or a private key account
pub struct InterestToAccount;

impl CustodialRoute for InterestToAccount {
    const NAME: &'static str = "interest withdrawal";

    const SOURCE_KIND: AccountKind = AccountKind::Interest;

    const PRODUCT: AccountKind = AccountKind::Interest;

    const CHARGES_FEE: bool = true;

    const CAPPED_AT_WITHDRAWABLE: bool = true;

    fn destination(target: &TransactionTarget) -> Option<TransferDestination> {
        return match target {
            TransactionTarget::Account(account) if account.kind != AccountKind::Interest => {
                Some(TransferDestination::Account(account.id.clone()))
            }
            _ => None,
        };
    }
}

pub type InterestWithdrawEngine = CustodialEngine<InterestToAccount>;
