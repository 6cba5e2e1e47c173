//! Collaborators the engines consume: balances, fees, prices, address checks and submission.
//!
//! Their network clients live outside this crate; [`InMemoryServices`] implements every trait
//! for the scenario runner and tests.

mod memory;

pub use memory::InMemoryServices;

use crate::fees::{CustodialFees, FeeLevel, FeeQuote};
use crate::ids::{AccountId, TransactionHash};
use crate::models::{AccountKind, BlockchainAccount, ReceiveAddress};
use crate::money::{CryptoCurrency, FiatCurrency, MoneyValue, MoneyValuePair};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Transient transport failure, safe to retry for reads
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl ServiceError {
    pub fn is_retryable(&self) -> bool {
        return matches!(self, Self::Network(_));
    }
}

#[async_trait]
pub trait BalanceService: Send + Sync {
    /// Balance of `account` held in `currency`. For ERC-20 accounts, asking for Ethereum
    /// returns the balance of the wallet paying the gas.
    async fn balance(
        &self,
        account: &BlockchainAccount,
        currency: &CryptoCurrency,
    ) -> Result<MoneyValue, ServiceError>;

    /// Part of the balance that can be moved right now, in the account's own asset
    async fn actionable_balance(
        &self,
        account: &BlockchainAccount,
    ) -> Result<MoneyValue, ServiceError>;
}

#[async_trait]
pub trait FeeService: Send + Sync {
    /// Network fees for sending `asset` on-chain, denominated in its fee currency
    async fn fee_quote(&self, asset: &CryptoCurrency) -> Result<FeeQuote, ServiceError>;

    /// Fixed fee and minimum amount for moving `asset` out of a custodial product
    async fn custodial_fees(
        &self,
        asset: &CryptoCurrency,
        product: AccountKind,
    ) -> Result<CustodialFees, ServiceError>;
}

#[async_trait]
pub trait PriceService: Send + Sync {
    async fn price(
        &self,
        of: &CryptoCurrency,
        fiat: FiatCurrency,
    ) -> Result<MoneyValuePair, ServiceError>;
}

#[async_trait]
pub trait FiatCurrencyService: Send + Sync {
    async fn fiat_currency(&self) -> Result<FiatCurrency, ServiceError>;
}

#[async_trait]
pub trait AddressService: Send + Sync {
    async fn is_valid(&self, address: &ReceiveAddress) -> Result<bool, ServiceError>;

    /// Whether `address` holds contract code on the Ethereum chain
    async fn is_contract(&self, address: &str) -> Result<bool, ServiceError>;
}

#[async_trait]
pub trait PendingTransactionOracle: Send + Sync {
    async fn has_pending_transaction(
        &self,
        account: &BlockchainAccount,
    ) -> Result<bool, ServiceError>;

    async fn record_pending(
        &self,
        account: &BlockchainAccount,
        hash: &TransactionHash,
    ) -> Result<(), ServiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferDestination {
    Address(ReceiveAddress),
    Account(AccountId),
}

/// Everything a signer or custodial backend needs to move funds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub source: AccountId,
    pub source_kind: AccountKind,
    pub asset: CryptoCurrency,
    pub destination: TransferDestination,
    pub amount: MoneyValue,
    pub fee: MoneyValue,
    pub fee_level: FeeLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionReceipt {
    Hash(TransactionHash),
    Reference(String),
}

#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(
        &self,
        request: &TransferRequest,
        second_password: Option<&str>,
    ) -> Result<SubmissionReceipt, ServiceError>;
}

/// The set of collaborators handed to every engine
#[derive(Clone)]
pub struct Services {
    pub balances: Arc<dyn BalanceService>,
    pub fees: Arc<dyn FeeService>,
    pub prices: Arc<dyn PriceService>,
    pub fiat: Arc<dyn FiatCurrencyService>,
    pub addresses: Arc<dyn AddressService>,
    pub pending: Arc<dyn PendingTransactionOracle>,
    pub submitter: Arc<dyn TransactionSubmitter>,
}

impl Services {
    /// Uses the same in-memory store for every collaborator
    pub fn in_memory(store: Arc<InMemoryServices>) -> Self {
        return Self {
            balances: store.clone(),
            fees: store.clone(),
            prices: store.clone(),
            fiat: store.clone(),
            addresses: store.clone(),
            pending: store.clone(),
            submitter: store,
        };
    }
}
