use super::{
    AddressService, BalanceService, FeeService, FiatCurrencyService, PendingTransactionOracle,
    PriceService, ServiceError, SubmissionReceipt, TransactionSubmitter, TransferDestination,
    TransferRequest,
};

use crate::fees::{CustodialFees, FeeQuote};
use crate::ids::{AccountId, TransactionHash};
use crate::models::{AccountKind, BlockchainAccount, ReceiveAddress};
use crate::money::{CryptoCurrency, FiatCurrency, MoneyValue, MoneyValuePair};

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

pub type BalanceDataStore = HashMap<(AccountId, CryptoCurrency), MoneyValue>;

/// Every engine collaborator backed by in-process maps.
///
/// Unconfigured custodial products charge nothing and have no minimum. Submissions debit the
/// source balances, credit destination accounts and return sequential references.
pub struct InMemoryServices {
    balances: RwLock<BalanceDataStore>,
    withdrawable: RwLock<BalanceDataStore>,
    fee_quotes: RwLock<HashMap<CryptoCurrency, FeeQuote>>,
    custodial_fees: RwLock<HashMap<(CryptoCurrency, AccountKind), CustodialFees>>,
    rates: RwLock<HashMap<(CryptoCurrency, FiatCurrency), MoneyValue>>,
    fiat_currency: RwLock<FiatCurrency>,
    invalid_addresses: RwLock<HashSet<String>>,
    contracts: RwLock<HashSet<String>>,
    in_flight: RwLock<HashSet<AccountId>>,
    rejection: RwLock<Option<String>>,
    submissions: AtomicU64,
}

impl Default for InMemoryServices {
    fn default() -> Self {
        return Self {
            balances: RwLock::new(HashMap::new()),
            withdrawable: RwLock::new(HashMap::new()),
            fee_quotes: RwLock::new(HashMap::new()),
            custodial_fees: RwLock::new(HashMap::new()),
            rates: RwLock::new(HashMap::new()),
            fiat_currency: RwLock::new(FiatCurrency::Usd),
            invalid_addresses: RwLock::new(HashSet::new()),
            contracts: RwLock::new(HashSet::new()),
            in_flight: RwLock::new(HashSet::new()),
            rejection: RwLock::new(None),
            submissions: AtomicU64::new(0),
        };
    }
}

impl InMemoryServices {
    pub fn new() -> Self {
        return Self::default();
    }

    pub fn set_balance(&self, account: &AccountId, amount: MoneyValue) {
        let Some(currency) = amount.currency().as_crypto().cloned() else {
            log::warn!("Ignoring fiat balance {amount} for {account}");
            return;
        };

        self.balances
            .write()
            .insert((account.clone(), currency), amount);
    }

    /// Caps the actionable balance of a custodial account below its total balance
    pub fn set_withdrawable(&self, account: &AccountId, amount: MoneyValue) {
        let Some(currency) = amount.currency().as_crypto().cloned() else {
            log::warn!("Ignoring fiat withdrawable {amount} for {account}");
            return;
        };

        self.withdrawable
            .write()
            .insert((account.clone(), currency), amount);
    }

    pub fn balance_of(&self, account: &AccountId, currency: &CryptoCurrency) -> MoneyValue {
        return self
            .balances
            .read()
            .get(&(account.clone(), currency.clone()))
            .cloned()
            .unwrap_or_else(|| MoneyValue::zero(currency));
    }

    pub fn set_fee_quote(&self, asset: CryptoCurrency, quote: FeeQuote) {
        self.fee_quotes.write().insert(asset, quote);
    }

    pub fn set_custodial_fees(&self, asset: CryptoCurrency, product: AccountKind, fees: CustodialFees) {
        self.custodial_fees.write().insert((asset, product), fees);
    }

    /// `rate` is the price of one major unit of `asset`
    pub fn set_rate(&self, asset: CryptoCurrency, rate: MoneyValue) -> Result<(), ServiceError> {
        let fiat = match rate.currency() {
            crate::money::Currency::Fiat(fiat) => *fiat,
            crate::money::Currency::Crypto(_) => {
                return Err(ServiceError::Unsupported(format!(
                    "Crypto to crypto rate {rate} for {asset}"
                )))
            }
        };

        self.rates.write().insert((asset, fiat), rate);

        return Ok(());
    }

    pub fn set_fiat_currency(&self, fiat: FiatCurrency) {
        *self.fiat_currency.write() = fiat;
    }

    pub fn mark_invalid_address(&self, address: impl Into<String>) {
        self.invalid_addresses.write().insert(address.into());
    }

    pub fn mark_contract(&self, address: impl Into<String>) {
        self.contracts.write().insert(address.into());
    }

    /// Simulates the confirmation of every transaction in flight for `account`
    pub fn confirm_pending(&self, account: &AccountId) {
        self.in_flight.write().remove(account);
    }

    /// Makes every following submission fail with `reason`, `None` accepts them again
    pub fn reject_submissions(&self, reason: Option<String>) {
        *self.rejection.write() = reason;
    }

    /// Debits every amount or none of them
    fn debit_all(&self, account: &AccountId, amounts: &[&MoneyValue]) -> Result<(), ServiceError> {
        let mut balances = self.balances.write();
        let mut staged: HashMap<CryptoCurrency, MoneyValue> = HashMap::new();

        for amount in amounts {
            let Some(currency) = amount.currency().as_crypto().cloned() else {
                return Err(ServiceError::Rejected(format!("Cannot debit fiat {amount}")));
            };

            let balance = match staged.get(&currency) {
                Some(balance) => balance.clone(),
                None => balances
                    .get(&(account.clone(), currency.clone()))
                    .cloned()
                    .unwrap_or_else(|| MoneyValue::zero(&currency)),
            };

            let remaining = balance
                .sub(amount)
                .map_err(|e| ServiceError::Rejected(e.to_string()))?;

            if remaining.is_negative() {
                Err(ServiceError::Rejected(format!(
                    "Balance {balance} of {account} cannot cover {amount}"
                )))?
            }

            staged.insert(currency, remaining);
        }

        for (currency, remaining) in staged {
            balances.insert((account.clone(), currency), remaining);
        }

        return Ok(());
    }

    fn credit(&self, account: &AccountId, amount: &MoneyValue) -> Result<(), ServiceError> {
        let Some(currency) = amount.currency().as_crypto().cloned() else {
            return Err(ServiceError::Rejected(format!("Cannot credit fiat {amount}")));
        };

        let mut balances = self.balances.write();
        let entry = balances
            .entry((account.clone(), currency.clone()))
            .or_insert_with(|| MoneyValue::zero(&currency));

        *entry = entry
            .add(amount)
            .map_err(|e| ServiceError::Rejected(e.to_string()))?;

        return Ok(());
    }
}

#[async_trait]
impl BalanceService for InMemoryServices {
    async fn balance(
        &self,
        account: &BlockchainAccount,
        currency: &CryptoCurrency,
    ) -> Result<MoneyValue, ServiceError> {
        return Ok(self.balance_of(&account.id, currency));
    }

    async fn actionable_balance(
        &self,
        account: &BlockchainAccount,
    ) -> Result<MoneyValue, ServiceError> {
        let balance = self.balance_of(&account.id, &account.asset);

        let withdrawable = self
            .withdrawable
            .read()
            .get(&(account.id.clone(), account.asset.clone()))
            .cloned();

        return match withdrawable {
            Some(withdrawable) if withdrawable.is_lt(&balance).unwrap_or(false) => Ok(withdrawable),
            _ => Ok(balance),
        };
    }
}

#[async_trait]
impl FeeService for InMemoryServices {
    async fn fee_quote(&self, asset: &CryptoCurrency) -> Result<FeeQuote, ServiceError> {
        return self
            .fee_quotes
            .read()
            .get(asset)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("Fee quote for {asset}")));
    }

    async fn custodial_fees(
        &self,
        asset: &CryptoCurrency,
        product: AccountKind,
    ) -> Result<CustodialFees, ServiceError> {
        let fees = self
            .custodial_fees
            .read()
            .get(&(asset.clone(), product))
            .cloned();

        return Ok(fees.unwrap_or_else(|| CustodialFees {
            fee: MoneyValue::zero(asset),
            minimum: MoneyValue::zero(asset),
        }));
    }
}

#[async_trait]
impl PriceService for InMemoryServices {
    async fn price(
        &self,
        of: &CryptoCurrency,
        fiat: FiatCurrency,
    ) -> Result<MoneyValuePair, ServiceError> {
        let rate = self
            .rates
            .read()
            .get(&(of.clone(), fiat))
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("Price of {of} in {fiat}")))?;

        return Ok(MoneyValuePair::exchange_rate(rate, of));
    }
}

#[async_trait]
impl FiatCurrencyService for InMemoryServices {
    async fn fiat_currency(&self) -> Result<FiatCurrency, ServiceError> {
        return Ok(*self.fiat_currency.read());
    }
}

#[async_trait]
impl AddressService for InMemoryServices {
    async fn is_valid(&self, address: &ReceiveAddress) -> Result<bool, ServiceError> {
        let trimmed = address.address.trim();

        let well_formed = !trimmed.is_empty() && !trimmed.contains(char::is_whitespace);

        return Ok(well_formed && !self.invalid_addresses.read().contains(trimmed));
    }

    async fn is_contract(&self, address: &str) -> Result<bool, ServiceError> {
        return Ok(self.contracts.read().contains(address.trim()));
    }
}

#[async_trait]
impl PendingTransactionOracle for InMemoryServices {
    async fn has_pending_transaction(
        &self,
        account: &BlockchainAccount,
    ) -> Result<bool, ServiceError> {
        return Ok(self.in_flight.read().contains(&account.id));
    }

    async fn record_pending(
        &self,
        account: &BlockchainAccount,
        hash: &TransactionHash,
    ) -> Result<(), ServiceError> {
        log::debug!("Recording {hash} in flight for {}", account.id);

        self.in_flight.write().insert(account.id.clone());

        return Ok(());
    }
}

#[async_trait]
impl TransactionSubmitter for InMemoryServices {
    async fn submit(
        &self,
        request: &TransferRequest,
        _second_password: Option<&str>,
    ) -> Result<SubmissionReceipt, ServiceError> {
        if let Some(reason) = self.rejection.read().clone() {
            Err(ServiceError::Rejected(reason))?
        }

        log::debug!("Submitting transfer: {request:?}");

        self.debit_all(&request.source, &[&request.amount, &request.fee])?;

        if let TransferDestination::Account(destination) = &request.destination {
            self.credit(destination, &request.amount)?;
        }

        let sequence = self.submissions.fetch_add(1, Ordering::SeqCst) + 1;

        if request.source_kind.is_custodial() {
            return Ok(SubmissionReceipt::Reference(format!("wd-{sequence:04}")));
        }

        return Ok(SubmissionReceipt::Hash(TransactionHash(format!(
            "0x{sequence:016x}"
        ))));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::fees::FeeLevel;

    const BTC: CryptoCurrency = CryptoCurrency::Bitcoin;

    fn some_account() -> BlockchainAccount {
        BlockchainAccount::new(AccountId::new("alice"), "Alice", BTC, AccountKind::NonCustodial)
    }

    fn btc(minor: i128) -> MoneyValue {
        MoneyValue::new(minor, BTC)
    }

    fn build_request(amount: i128, fee: i128) -> TransferRequest {
        TransferRequest {
            source: AccountId::new("alice"),
            source_kind: AccountKind::NonCustodial,
            asset: BTC,
            destination: TransferDestination::Account(AccountId::new("bob")),
            amount: btc(amount),
            fee: btc(fee),
            fee_level: FeeLevel::Regular,
        }
    }

    #[tokio::test]
    async fn actionable_balance_is_capped_by_withdrawable() {
        let services = InMemoryServices::new();
        let account = some_account();

        services.set_balance(&account.id, btc(100));
        assert_eq!(services.actionable_balance(&account).await.unwrap(), btc(100));

        services.set_withdrawable(&account.id, btc(60));
        assert_eq!(services.actionable_balance(&account).await.unwrap(), btc(60));
        assert_eq!(services.balance(&account, &BTC).await.unwrap(), btc(100));
    }

    #[tokio::test]
    async fn submit_moves_funds() {
        let services = InMemoryServices::new();
        services.set_balance(&AccountId::new("alice"), btc(100));

        let receipt = services.submit(&build_request(60, 5), None).await.unwrap();

        assert_eq!(
            receipt,
            SubmissionReceipt::Hash(TransactionHash("0x0000000000000001".to_string()))
        );
        assert_eq!(services.balance_of(&AccountId::new("alice"), &BTC), btc(35));
        assert_eq!(services.balance_of(&AccountId::new("bob"), &BTC), btc(60));
    }

    #[tokio::test]
    async fn fail_to_submit_more_than_balance() {
        let services = InMemoryServices::new();
        services.set_balance(&AccountId::new("alice"), btc(100));

        let res = services.submit(&build_request(96, 5), None).await;

        assert!(matches!(res, Err(ServiceError::Rejected(_))));
        assert_eq!(services.balance_of(&AccountId::new("alice"), &BTC), btc(100));
    }

    #[tokio::test]
    async fn fail_to_submit_when_rejecting() {
        let services = InMemoryServices::new();
        services.set_balance(&AccountId::new("alice"), btc(100));
        services.reject_submissions(Some("node unavailable".to_string()));

        let res = services.submit(&build_request(10, 1), None).await;

        assert_eq!(res, Err(ServiceError::Rejected("node unavailable".to_string())));
    }

    #[tokio::test]
    async fn rejected_token_transfer_keeps_gas() {
        let services = InMemoryServices::new();
        let usdt = CryptoCurrency::Erc20(crate::money::Erc20Token {
            code: "USDT".to_string(),
            contract_address: "0xdac17f958d2ee523a2206206994597c13d831ec7".to_string(),
            precision: 6,
        });
        let alice = AccountId::new("alice");

        services.set_balance(&alice, MoneyValue::new(10, CryptoCurrency::Ethereum));
        services.set_balance(&alice, MoneyValue::new(5, &usdt));

        let request = TransferRequest {
            asset: usdt.clone(),
            amount: MoneyValue::new(50, &usdt),
            fee: MoneyValue::new(3, CryptoCurrency::Ethereum),
            ..build_request(0, 0)
        };

        let res = services.submit(&request, None).await;

        assert!(matches!(res, Err(ServiceError::Rejected(_))));
        assert_eq!(
            services.balance_of(&alice, &CryptoCurrency::Ethereum),
            MoneyValue::new(10, CryptoCurrency::Ethereum)
        );
        assert_eq!(services.balance_of(&alice, &usdt), MoneyValue::new(5, &usdt));
        assert_eq!(services.balance_of(&AccountId::new("bob"), &usdt), MoneyValue::zero(&usdt));
    }

    #[tokio::test]
    async fn addresses() {
        let services = InMemoryServices::new();
        services.mark_invalid_address("bc1qbad");
        services.mark_contract("0xcontract");

        assert!(services.is_valid(&ReceiveAddress::new("bc1qgood", BTC)).await.unwrap());
        assert!(!services.is_valid(&ReceiveAddress::new("bc1qbad", BTC)).await.unwrap());
        assert!(!services.is_valid(&ReceiveAddress::new("  ", BTC)).await.unwrap());
        assert!(!services.is_valid(&ReceiveAddress::new("bc1 q", BTC)).await.unwrap());
        assert!(services.is_contract("0xcontract").await.unwrap());
        assert!(!services.is_contract("0xwallet").await.unwrap());
    }

    #[tokio::test]
    async fn pending_transactions() {
        let services = InMemoryServices::new();
        let account = some_account();

        assert!(!services.has_pending_transaction(&account).await.unwrap());

        services
            .record_pending(&account, &TransactionHash("0x1".to_string()))
            .await
            .unwrap();
        assert!(services.has_pending_transaction(&account).await.unwrap());

        services.confirm_pending(&account.id);
        assert!(!services.has_pending_transaction(&account).await.unwrap());
    }
}
