//! Fixtures shared by the engine and processor unit tests

use super::EngineBinding;

use crate::context::EngineContext;
use crate::fees::{CustodialFees, FeeQuote};
use crate::ids::AccountId;
use crate::models::{AccountKind, BlockchainAccount, ReceiveAddress, TransactionTarget};
use crate::money::{CryptoCurrency, Erc20Token, FiatCurrency, MoneyValue};
use crate::services::{InMemoryServices, Services};
use crate::EngineConfig;

use std::sync::Arc;

pub const BTC: CryptoCurrency = CryptoCurrency::Bitcoin;
pub const ETH: CryptoCurrency = CryptoCurrency::Ethereum;

pub const SOME_ADDRESS: &str = "bc1qsomeaddress";
pub const SOME_ETH_ADDRESS: &str = "0x00000000000000000000000000000000000000aa";
pub const SOME_CONTRACT: &str = "0x00000000000000000000000000000000000000cc";

pub fn usdt() -> CryptoCurrency {
    CryptoCurrency::Erc20(Erc20Token {
        code: "USDT".to_string(),
        contract_address: "0xdac17f958d2ee523a2206206994597c13d831ec7".to_string(),
        precision: 6,
    })
}

pub fn money(minor: i128, currency: &CryptoCurrency) -> MoneyValue {
    MoneyValue::new(minor, currency)
}

pub fn account(name: &str, asset: CryptoCurrency, kind: AccountKind) -> BlockchainAccount {
    BlockchainAccount::new(AccountId::new(format!("{name}:{kind}")), name, asset, kind)
}

pub fn address(address: &str, asset: CryptoCurrency) -> TransactionTarget {
    TransactionTarget::Address(ReceiveAddress::new(address, asset))
}

pub fn binding(source: BlockchainAccount, target: TransactionTarget) -> EngineBinding {
    EngineBinding::new(source, target, false)
}

/// Store with prices for every test asset and flat fees of 5 and 8 minor units
pub fn build_store() -> Arc<InMemoryServices> {
    let store = Arc::new(InMemoryServices::new());

    for (asset, price) in [(BTC, 3_000_000), (ETH, 200_000), (usdt(), 100)] {
        store
            .set_rate(asset, MoneyValue::new(price, FiatCurrency::Usd))
            .unwrap();
    }

    store.set_fee_quote(BTC, FeeQuote::new(money(5, &BTC), money(8, &BTC)));
    store.set_fee_quote(ETH, FeeQuote::new(money(5, &ETH), money(8, &ETH)));
    store.set_fee_quote(usdt(), FeeQuote::new(money(1, &ETH), money(2, &ETH)));

    store
}

pub fn set_custodial_fees(
    store: &InMemoryServices,
    asset: &CryptoCurrency,
    product: AccountKind,
    fee: i128,
    minimum: i128,
) {
    store.set_custodial_fees(
        asset.clone(),
        product,
        CustodialFees {
            fee: money(fee, asset),
            minimum: money(minimum, asset),
        },
    );
}

pub fn build_context(store: &Arc<InMemoryServices>) -> EngineContext {
    EngineContext::new(Services::in_memory(store.clone()), EngineConfig::default())
}
