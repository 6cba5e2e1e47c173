use super::on_chain::{OnChainAsset, OnChainEngine};

use crate::money::CryptoCurrency;

/// ERC-20 tokens. Gas is paid in Ether from the same wallet.
pub struct Erc20;

impl OnChainAsset for Erc20 {
    const NAME: &'static str = "ERC-20";

    const ALLOWS_CUSTOM_FEE: bool = false;

    fn supports(asset: &CryptoCurrency) -> bool {
        return asset.is_erc20();
    }
}

pub type TokenEngine = OnChainEngine<Erc20>;

#[cfg(test)]
mod tests {
    use super::*;

    use crate::engines::test_support::*;
    use crate::fees::{FeeLevel, FeeQuote};
    use crate::ids::AccountId;
    use crate::models::{
        AccountKind, ConfirmationKind, PendingTransaction, TransactionConfirmation,
        TransactionResult, ValidationState,
    };
    use crate::money::MoneyValue;
    use crate::services::InMemoryServices;
    use crate::EngineError;

    use std::sync::Arc;

    const SOME_TOKEN_BALANCE: i128 = 50;

    fn some_source_id() -> AccountId {
        account("alice", usdt(), AccountKind::NonCustodial).id
    }

    fn build_engine(store: &Arc<InMemoryServices>, target: &str) -> TokenEngine {
        let source = account("alice", usdt(), AccountKind::NonCustodial);
        store.set_balance(&source.id, money(SOME_TOKEN_BALANCE, &usdt()));

        let mut engine = TokenEngine::new(build_context(store));
        engine.start(binding(source, address(target, usdt())));
        engine.assert_inputs_valid().unwrap();
        engine
    }

    async fn prepare(engine: &TokenEngine, amount: i128) -> PendingTransaction {
        let pending = engine.initialize_transaction().await.unwrap();
        engine.update(money(amount, &usdt()), pending).await.unwrap()
    }

    #[tokio::test]
    async fn fee_is_paid_in_ether() {
        let store = build_store();
        let engine = build_engine(&store, SOME_ETH_ADDRESS);

        let pending = prepare(&engine, 10).await;

        assert_eq!(pending.fee_amount, money(1, &ETH));
        assert_eq!(pending.fee_selection.asset, ETH);
        // the fee does not come out of the token balance
        assert_eq!(pending.available, money(SOME_TOKEN_BALANCE, &usdt()));
    }

    #[tokio::test]
    async fn insufficient_gas() {
        let store = build_store();
        let engine = build_engine(&store, SOME_ETH_ADDRESS);
        store.set_balance(&some_source_id(), money(0, &ETH));

        let pending = prepare(&engine, 10).await;
        let pending = engine.do_validate_all(pending).await.unwrap();

        assert_eq!(pending.validation_state, ValidationState::InsufficientGas);
    }

    #[tokio::test]
    async fn fail_on_fee_quoted_in_token() {
        let store = build_store();
        let engine = build_engine(&store, SOME_ETH_ADDRESS);
        store.set_balance(&some_source_id(), money(0, &ETH));
        store.set_fee_quote(usdt(), FeeQuote::new(money(1, &usdt()), money(2, &usdt())));

        let pending = engine.initialize_transaction().await.unwrap();
        let res = engine.update(money(10, &usdt()), pending).await;

        assert!(matches!(res, Err(EngineError::InvalidInputs(_))));
    }

    #[tokio::test]
    async fn insufficient_funds_comes_before_gas() {
        let store = build_store();
        let engine = build_engine(&store, SOME_ETH_ADDRESS);

        let pending = prepare(&engine, SOME_TOKEN_BALANCE + 1).await;
        let pending = engine.do_validate_all(pending).await.unwrap();

        assert_eq!(pending.validation_state, ValidationState::InsufficientFunds);
    }

    #[tokio::test]
    async fn sending_to_contract_is_rejected() {
        let store = build_store();
        store.mark_contract(SOME_CONTRACT);
        store.set_balance(&some_source_id(), money(10, &ETH));
        let engine = build_engine(&store, SOME_CONTRACT);

        let pending = prepare(&engine, 10).await;
        let pending = engine.do_validate_all(pending).await.unwrap();

        assert_eq!(pending.validation_state, ValidationState::AddressIsContract);
    }

    #[tokio::test]
    async fn custom_fee_is_not_offered() {
        let store = build_store();
        let engine = build_engine(&store, SOME_ETH_ADDRESS);

        let pending = prepare(&engine, 10).await;
        let res = engine
            .do_update_fee_level(pending, FeeLevel::Custom(money(3, &ETH)))
            .await;

        assert!(matches!(res, Err(EngineError::InvalidFeeLevel(_, _))));
    }

    #[tokio::test]
    async fn priority_fee() {
        let store = build_store();
        let engine = build_engine(&store, SOME_ETH_ADDRESS);

        let pending = prepare(&engine, 10).await;
        let pending = engine
            .do_update_fee_level(pending, FeeLevel::Priority)
            .await
            .unwrap();

        assert_eq!(pending.amount, money(10, &usdt()));
        assert_eq!(pending.fee_amount, money(2, &ETH));
    }

    #[tokio::test]
    async fn total_has_no_crypto_amount() {
        let store = build_store();
        let engine = build_engine(&store, SOME_ETH_ADDRESS);

        let pending = prepare(&engine, 10_000_000).await;
        let pending = engine.do_build_confirmations(pending).await.unwrap();

        assert_eq!(
            pending.confirmation(ConfirmationKind::Total),
            Some(&TransactionConfirmation::Total {
                total: None,
                fiat: MoneyValue::new(1_000, crate::money::FiatCurrency::Usd),
            })
        );
    }

    #[tokio::test]
    async fn execute_pays_gas_from_ether_balance() {
        let store = build_store();
        store.set_balance(&some_source_id(), money(10, &ETH));
        let engine = build_engine(&store, SOME_ETH_ADDRESS);

        let pending = prepare(&engine, 20).await;
        let pending = engine.do_validate_all(pending).await.unwrap();
        let result = engine.execute(&pending, None).await.unwrap();

        assert!(matches!(result, TransactionResult::Hashed { .. }));
        assert_eq!(store.balance_of(&some_source_id(), &usdt()), money(30, &usdt()));
        assert_eq!(store.balance_of(&some_source_id(), &ETH), money(9, &ETH));
    }
}
