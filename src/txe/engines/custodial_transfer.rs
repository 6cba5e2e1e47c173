use super::custodial::{CustodialEngine, CustodialRoute};

use crate::models::{AccountKind, TransactionTarget};
use crate::services::TransferDestination;

/// Trading balance deposited into the interest account of the same asset, free of charge
pub struct TradingToInterest;

impl CustodialRoute for TradingToInterest {
    const NAME: &'static str = "interest deposit";

    const SOURCE_KIND: AccountKind = AccountKind::Trading;

    const PRODUCT: AccountKind = AccountKind::Interest;

    const CHARGES_FEE: bool = false;

    const CAPPED_AT_WITHDRAWABLE: bool = false;

    fn destination(target: &TransactionTarget) -> Option<TransferDestination> {
        return match target {
            TransactionTarget::Account(account) if account.kind == AccountKind::Interest => {
                Some(TransferDestination::Account(account.id.clone()))
            }
            _ => None,
        };
    }
}

pub type CustodialTransferEngine = CustodialEngine<TradingToInterest>;

#[cfg(test)]
mod tests {
    use super::*;

    use crate::engines::test_support::*;
    use crate::fees::{FeeLevel, FeeSelection};
    use crate::models::{BlockchainAccount, PendingTransaction, TransactionResult, ValidationState};
    use crate::services::InMemoryServices;
    use crate::EngineError;

    use std::sync::Arc;

    fn some_source() -> BlockchainAccount {
        account("alice", BTC, AccountKind::Trading)
    }

    fn some_target() -> BlockchainAccount {
        account("alice", BTC, AccountKind::Interest)
    }

    fn build_engine(store: &Arc<InMemoryServices>) -> CustodialTransferEngine {
        store.set_balance(&some_source().id, money(1_000, &BTC));
        set_custodial_fees(store, &BTC, AccountKind::Interest, 7, 100);

        let mut engine = CustodialTransferEngine::new(build_context(store));
        engine.start(binding(some_source(), TransactionTarget::Account(some_target())));
        engine.assert_inputs_valid().unwrap();
        engine
    }

    async fn prepare(engine: &CustodialTransferEngine, amount: i128) -> PendingTransaction {
        let pending = engine.initialize_transaction().await.unwrap();
        engine.update(money(amount, &BTC), pending).await.unwrap()
    }

    #[tokio::test]
    async fn deposit_is_free_with_a_minimum() {
        let store = build_store();
        let engine = build_engine(&store);

        let pending = prepare(&engine, 500).await;

        assert_eq!(pending.fee_selection, FeeSelection::none(BTC));
        assert_eq!(pending.fee_amount, money(0, &BTC));
        assert_eq!(pending.available, money(1_000, &BTC));
        assert_eq!(pending.minimum_limit, Some(money(100, &BTC)));
        assert_eq!(pending.maximum_limit, None);
    }

    #[tokio::test]
    async fn below_minimum() {
        let store = build_store();
        let engine = build_engine(&store);

        let pending = prepare(&engine, 99).await;
        let pending = engine.do_validate_all(pending).await.unwrap();

        assert_eq!(pending.validation_state, ValidationState::BelowMinimumLimit);
    }

    #[tokio::test]
    async fn whole_balance_can_be_deposited() {
        let store = build_store();
        let engine = build_engine(&store);

        let pending = prepare(&engine, 1_000).await;
        let pending = engine.do_validate_all(pending).await.unwrap();

        assert_eq!(pending.validation_state, ValidationState::CanExecute);
    }

    #[tokio::test]
    async fn execute_moves_funds_between_accounts() {
        let store = build_store();
        let engine = build_engine(&store);

        let pending = prepare(&engine, 400).await;
        let pending = engine.do_validate_all(pending).await.unwrap();
        let result = engine.execute(&pending, None).await.unwrap();

        assert_eq!(
            result,
            TransactionResult::Unhashed {
                amount: money(400, &BTC),
                reference: Some("wd-0001".to_string()),
            }
        );
        assert_eq!(store.balance_of(&some_source().id, &BTC), money(600, &BTC));
        assert_eq!(store.balance_of(&some_target().id, &BTC), money(400, &BTC));
    }

    #[tokio::test]
    async fn only_fee_level_is_none() {
        let store = build_store();
        let engine = build_engine(&store);

        let pending = prepare(&engine, 400).await;

        let same = engine
            .do_update_fee_level(pending.clone(), FeeLevel::None)
            .await
            .unwrap();
        assert_eq!(same, pending);

        let res = engine.do_update_fee_level(pending, FeeLevel::Priority).await;
        assert!(matches!(res, Err(EngineError::InvalidFeeLevel(FeeLevel::Priority, _))));
    }

    #[tokio::test]
    async fn fail_to_target_trading_account() {
        let store = build_store();

        let mut engine = CustodialTransferEngine::new(build_context(&store));
        engine.start(binding(
            some_source(),
            TransactionTarget::Account(account("bob", BTC, AccountKind::Trading)),
        ));

        assert!(matches!(engine.assert_inputs_valid(), Err(EngineError::InvalidInputs(_))));
    }
}
