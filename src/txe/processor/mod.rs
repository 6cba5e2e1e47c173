mod factory;
mod transaction_processor;

pub use factory::TransactionProcessorFactory;
pub use transaction_processor::{ProcessorState, TransactionProcessor};

#[cfg(test)]
mod tests {
    use super::*;

    use crate::engines::test_support::*;
    use crate::engines::EngineKind;
    use crate::fees::FeeLevel;
    use crate::models::{
        AccountKind, AssetAction, BlockchainAccount, TransactionResult, TransactionTarget,
        ValidationState,
    };
    use crate::services::{InMemoryServices, Services};
    use crate::{EngineConfig, EngineError};

    use std::sync::Arc;

    const SOME_BALANCE: i128 = 100;

    fn some_source() -> BlockchainAccount {
        account("alice", BTC, AccountKind::NonCustodial)
    }

    fn build_processor(store: &Arc<InMemoryServices>) -> TransactionProcessor {
        store.set_balance(&some_source().id, money(SOME_BALANCE, &BTC));

        let factory =
            TransactionProcessorFactory::new(Services::in_memory(store.clone()), EngineConfig::default());

        factory
            .create_transaction_processor(
                some_source(),
                address(SOME_ADDRESS, BTC),
                AssetAction::Send,
            )
            .unwrap()
    }

    #[tokio::test]
    async fn factory_picks_engine() {
        let store = build_store();
        let factory =
            TransactionProcessorFactory::new(Services::in_memory(store), EngineConfig::default());

        let processor = factory
            .create_transaction_processor(
                account("alice", BTC, AccountKind::Trading),
                TransactionTarget::Account(account("alice", BTC, AccountKind::Interest)),
                AssetAction::InterestTransfer,
            )
            .unwrap();

        assert_eq!(processor.engine_kind().await, EngineKind::CustodialTransfer);
        assert_eq!(processor.action(), AssetAction::InterestTransfer);
        assert_eq!(processor.state().await, ProcessorState::Uninitialized);
    }

    #[tokio::test]
    async fn factory_rejects_unsupported_transaction() {
        let store = build_store();
        let factory =
            TransactionProcessorFactory::new(Services::in_memory(store), EngineConfig::default());

        let res = factory.create_transaction_processor(
            account("alice", BTC, AccountKind::Interest),
            address(SOME_ADDRESS, BTC),
            AssetAction::Send,
        );

        assert!(matches!(res, Err(EngineError::UnsupportedTransaction(_))));
    }

    #[tokio::test]
    async fn happy_path() {
        let store = build_store();
        let processor = build_processor(&store);
        let mut updates = processor.subscribe();

        processor.initialize_transaction().await.unwrap();
        assert_eq!(processor.state().await, ProcessorState::Initialized);
        assert!(updates.has_changed().unwrap());

        let pending = processor.update_amount(money(60, &BTC)).await.unwrap();
        assert_eq!(processor.state().await, ProcessorState::AmountUpdated);
        assert_eq!(pending.validation_state, ValidationState::CanExecute);
        assert_eq!(processor.pending_transaction(), Some(pending));

        let pending = processor.validate_all().await.unwrap();
        assert_eq!(processor.state().await, ProcessorState::Validating);
        assert!(!pending.confirmations.is_empty());

        let result = processor.execute(None).await.unwrap();
        assert!(matches!(result, TransactionResult::Hashed { .. }));
        assert_eq!(processor.state().await, ProcessorState::Succeeded);
        assert_eq!(processor.pending_transaction(), None);
        assert_eq!(*updates.borrow_and_update(), None);

        assert_eq!(store.balance_of(&some_source().id, &BTC), money(35, &BTC));
    }

    #[tokio::test]
    async fn fail_to_update_before_initialize() {
        let store = build_store();
        let processor = build_processor(&store);

        let res = processor.update_amount(money(60, &BTC)).await;

        assert_eq!(res, Err(EngineError::NotInitialized));
    }

    #[tokio::test]
    async fn fail_to_execute_without_validate_all() {
        let store = build_store();
        let processor = build_processor(&store);

        processor.initialize_transaction().await.unwrap();
        processor.update_amount(money(60, &BTC)).await.unwrap();

        let res = processor.execute(None).await;

        assert_eq!(
            res,
            Err(EngineError::NotExecutable(ValidationState::CanExecute))
        );
    }

    #[tokio::test]
    async fn fail_to_execute_after_change_since_validate_all() {
        let store = build_store();
        let processor = build_processor(&store);

        processor.initialize_transaction().await.unwrap();
        processor.update_amount(money(60, &BTC)).await.unwrap();
        processor.validate_all().await.unwrap();
        processor.update_amount(money(50, &BTC)).await.unwrap();

        assert!(matches!(
            processor.execute(None).await,
            Err(EngineError::NotExecutable(_))
        ));
        assert_eq!(processor.state().await, ProcessorState::AmountUpdated);
    }

    #[tokio::test]
    async fn fail_to_execute_invalid_transaction() {
        let store = build_store();
        let processor = build_processor(&store);

        processor.initialize_transaction().await.unwrap();
        processor.update_amount(money(96, &BTC)).await.unwrap();
        let pending = processor.validate_all().await.unwrap();
        assert_eq!(pending.validation_state, ValidationState::InsufficientFunds);

        assert_eq!(
            processor.execute(None).await,
            Err(EngineError::NotExecutable(ValidationState::InsufficientFunds))
        );
    }

    #[tokio::test]
    async fn update_fee_level_keeps_amount() {
        let store = build_store();
        let processor = build_processor(&store);

        processor.initialize_transaction().await.unwrap();
        processor.update_amount(money(60, &BTC)).await.unwrap();
        processor.validate_all().await.unwrap();

        let pending = processor.update_fee_level(FeeLevel::Priority).await.unwrap();

        assert_eq!(pending.amount, money(60, &BTC));
        assert_eq!(pending.fee_amount, money(8, &BTC));
        assert_eq!(pending.available, money(92, &BTC));
        assert_eq!(processor.state().await, ProcessorState::AmountUpdated);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_updates_are_serialized() {
        let store = build_store();
        let processor = Arc::new(build_processor(&store));

        processor.initialize_transaction().await.unwrap();
        processor.update_amount(money(60, &BTC)).await.unwrap();

        let amount_update = tokio::spawn({
            let processor = processor.clone();
            async move { processor.update_amount(money(50, &BTC)).await }
        });
        let fee_update = tokio::spawn({
            let processor = processor.clone();
            async move { processor.update_fee_level(FeeLevel::Priority).await }
        });

        let by_amount = amount_update.await.unwrap().unwrap();
        let by_fee = fee_update.await.unwrap().unwrap();

        // each call saw either the state before or after the other one, never a mix
        assert_eq!(by_amount.amount, money(50, &BTC));
        assert!(by_amount.fee_amount == money(5, &BTC) || by_amount.fee_amount == money(8, &BTC));
        assert_eq!(by_fee.fee_amount, money(8, &BTC));
        assert!(by_fee.amount == money(60, &BTC) || by_fee.amount == money(50, &BTC));

        let last = if by_fee.amount == money(50, &BTC) { by_fee } else { by_amount };
        assert_eq!(last.amount, money(50, &BTC));
        assert_eq!(last.fee_amount, money(8, &BTC));
        assert_eq!(last.available, money(92, &BTC));
        assert_eq!(processor.pending_transaction(), Some(last));
        assert_eq!(processor.state().await, ProcessorState::AmountUpdated);
    }

    #[tokio::test]
    async fn rejected_submission_can_be_retried() {
        let store = build_store();
        let processor = build_processor(&store);

        processor.initialize_transaction().await.unwrap();
        processor.update_amount(money(60, &BTC)).await.unwrap();
        processor.validate_all().await.unwrap();

        store.reject_submissions(Some("node unavailable".to_string()));
        let result = processor.execute(None).await.unwrap();
        assert!(!result.is_success());
        assert_eq!(processor.state().await, ProcessorState::Failed);
        assert!(processor.pending_transaction().is_some());

        // the user has to validate again before resubmitting
        assert!(processor.execute(None).await.is_err());

        store.reject_submissions(None);
        processor.validate_all().await.unwrap();
        let result = processor.execute(None).await.unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn reset_is_idempotent() {
        let store = build_store();
        let processor = build_processor(&store);

        processor.initialize_transaction().await.unwrap();
        processor.update_amount(money(60, &BTC)).await.unwrap();

        processor.reset().await;
        processor.reset().await;

        assert_eq!(processor.state().await, ProcessorState::Uninitialized);
        assert_eq!(processor.pending_transaction(), None);
        assert_eq!(
            processor.update_amount(money(60, &BTC)).await,
            Err(EngineError::NotInitialized)
        );

        // the flow can start over
        processor.initialize_transaction().await.unwrap();
        let pending = processor.update_amount(money(60, &BTC)).await.unwrap();
        assert_eq!(pending.validation_state, ValidationState::CanExecute);
    }
}
