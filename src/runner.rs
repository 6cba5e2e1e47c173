use crate::scenario::{parse_account_ref, FeeOption, InputParseError, ScenarioRow, ScenarioRowType};
use crate::Result;

use txe::fees::{CustodialFees, FeeLevel, FeeQuote};
use txe::ids::AccountId;
use txe::models::{
    AccountKind, AssetAction, BlockchainAccount, PendingTransaction, ReceiveAddress,
    TransactionResult, TransactionTarget,
};
use txe::money::{CryptoCurrency, Erc20Token, FiatCurrency, MoneyValue};
use txe::services::{InMemoryServices, Services};
use txe::{EngineConfig, EngineError, TransactionProcessorFactory};

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

/// Outcome of one send row
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub account: String,
    pub asset: String,
    pub amount: String,
    pub fee: String,
    pub status: String,
    pub detail: String,
}

/// Replays scenario rows against in-memory services.
///
/// Seeding rows configure the services, send rows drive a processor through
/// initialize, update, validate and, when allowed, execute.
pub struct ScenarioRunner {
    store: Arc<InMemoryServices>,
    factory: TransactionProcessorFactory,
    tokens: HashMap<String, CryptoCurrency>,
    fee_quotes: HashMap<CryptoCurrency, FeeQuote>,
    custodial_fees: HashMap<(CryptoCurrency, AccountKind), CustodialFees>,
}

impl ScenarioRunner {
    pub fn new(config: EngineConfig) -> Self {
        let store = Arc::new(InMemoryServices::new());
        let factory = TransactionProcessorFactory::new(Services::in_memory(store.clone()), config);

        return Self {
            store,
            factory,
            tokens: HashMap::new(),
            fee_quotes: HashMap::new(),
            custodial_fees: HashMap::new(),
        };
    }

    #[cfg(test)]
    pub fn store(&self) -> &Arc<InMemoryServices> {
        return &self.store;
    }

    /// Applies a row, returning a report line for send rows
    pub async fn apply(&mut self, row: ScenarioRow) -> Result<Option<ReportRow>> {
        match row.typ {
            ScenarioRowType::Token => self.register_token(&row)?,
            ScenarioRowType::Balance => self.seed_balance(&row)?,
            ScenarioRowType::Fee => self.seed_fee(&row)?,
            ScenarioRowType::Minimum => self.seed_minimum(&row)?,
            ScenarioRowType::Price => self.seed_price(&row)?,
            ScenarioRowType::Contract => self.store.mark_contract(row.target()?),
            ScenarioRowType::Send => return Ok(Some(self.send(&row).await?)),
        }

        return Ok(None);
    }

    fn asset(&self, code: &str) -> Result<CryptoCurrency> {
        if let Some(asset) = CryptoCurrency::from_code(code) {
            return Ok(asset);
        }

        return self
            .tokens
            .get(&code.to_uppercase())
            .cloned()
            .ok_or_else(|| InputParseError::UnknownAsset(code.to_string()).into());
    }

    fn register_token(&mut self, row: &ScenarioRow) -> Result {
        let code = row.asset()?.to_uppercase();
        let precision: u32 = row
            .amount()?
            .parse()
            .map_err(|_| InputParseError::InvalidPrecision(row.amount.clone().unwrap_or_default()))?;

        let token = CryptoCurrency::Erc20(Erc20Token {
            code: code.clone(),
            contract_address: row.target()?.to_string(),
            precision,
        });

        log::debug!("Registering token {token}");
        self.tokens.insert(code, token);

        return Ok(());
    }

    fn seed_balance(&mut self, row: &ScenarioRow) -> Result {
        let (name, kind) = parse_account_ref(row.account()?)?;
        let asset = self.asset(row.asset()?)?;
        let amount = MoneyValue::parse(row.amount()?, &asset)?;

        self.store.set_balance(&account_id(&name, kind), amount);

        return Ok(());
    }

    fn seed_fee(&mut self, row: &ScenarioRow) -> Result {
        let asset = self.asset(row.asset()?)?;

        let kind = match row.fee_option()? {
            FeeOption::Custodial(kind) => kind,
            level => {
                let fee = MoneyValue::parse(row.amount()?, asset.fee_currency())?;

                let quote = self
                    .fee_quotes
                    .entry(asset.clone())
                    .or_insert_with(|| FeeQuote::new(fee.clone(), fee.clone()));

                match level {
                    FeeOption::Priority => quote.priority = fee,
                    _ => quote.regular = fee,
                }

                self.store.set_fee_quote(asset, quote.clone());

                return Ok(());
            }
        };

        let fee = MoneyValue::parse(row.amount()?, &asset)?;
        let fees = self.custodial_fees_mut(&asset, kind);
        fees.fee = fee;

        let fees = fees.clone();
        self.store.set_custodial_fees(asset, kind, fees);

        return Ok(());
    }

    fn seed_minimum(&mut self, row: &ScenarioRow) -> Result {
        let asset = self.asset(row.asset()?)?;
        let minimum = MoneyValue::parse(row.amount()?, &asset)?;

        let kind = match row.fee_option()? {
            FeeOption::Custodial(kind) => kind,
            _ => Err(InputParseError::UnknownFeeOption(row.option_or("").to_string()))?,
        };

        let fees = self.custodial_fees_mut(&asset, kind);
        fees.minimum = minimum;

        let fees = fees.clone();
        self.store.set_custodial_fees(asset, kind, fees);

        return Ok(());
    }

    fn custodial_fees_mut(&mut self, asset: &CryptoCurrency, kind: AccountKind) -> &mut CustodialFees {
        return self
            .custodial_fees
            .entry((asset.clone(), kind))
            .or_insert_with(|| CustodialFees {
                fee: MoneyValue::zero(asset),
                minimum: MoneyValue::zero(asset),
            });
    }

    fn seed_price(&mut self, row: &ScenarioRow) -> Result {
        let asset = self.asset(row.asset()?)?;

        let code = row.option_or("USD");
        let fiat = FiatCurrency::from_code(code)
            .ok_or_else(|| InputParseError::UnknownFiatCurrency(code.to_string()))?;

        let rate = MoneyValue::parse(row.amount()?, fiat)?;
        self.store.set_rate(asset, rate)?;

        return Ok(());
    }

    async fn send(&self, row: &ScenarioRow) -> Result<ReportRow> {
        let (name, kind) = parse_account_ref(row.account()?)?;
        let asset = self.asset(row.asset()?)?;
        let amount = MoneyValue::parse(row.amount()?, &asset)?;
        let fee_level = row.fee_level(&asset)?;

        let source = build_account(&name, kind, &asset);
        let target = self.target(row.target()?, &asset)?;
        let action = action_for(kind, &target);

        let mut report = ReportRow {
            account: row.account()?.to_string(),
            asset: asset.code().to_string(),
            amount: amount.to_major_string(),
            fee: String::new(),
            status: String::new(),
            detail: String::new(),
        };

        match self.process(source, target, action, amount, fee_level).await {
            Ok((pending, result)) => {
                report.fee = pending.fee_amount.to_string();

                let (status, detail) = match result {
                    None => (pending.validation_state.to_string(), String::new()),
                    Some(TransactionResult::Hashed { hash, .. }) => {
                        ("executed".to_string(), hash.to_string())
                    }
                    Some(TransactionResult::Unhashed { reference, .. }) => {
                        ("executed".to_string(), reference.unwrap_or_default())
                    }
                    Some(TransactionResult::Failed { error }) => {
                        ("failed".to_string(), error.to_string())
                    }
                };

                report.status = status;
                report.detail = detail;
            }
            Err(e) => {
                log::warn!("Failed to process {action} from {}: {e}", report.account);

                report.status = "error".to_string();
                report.detail = e.to_string();
            }
        }

        return Ok(report);
    }

    async fn process(
        &self,
        source: BlockchainAccount,
        target: TransactionTarget,
        action: AssetAction,
        amount: MoneyValue,
        fee_level: Option<FeeLevel>,
    ) -> txe::Result<(PendingTransaction, Option<TransactionResult>)> {
        let processor = self
            .factory
            .create_transaction_processor(source, target, action)?;

        processor.initialize_transaction().await?;
        processor.update_amount(amount).await?;

        if let Some(level) = fee_level {
            processor.update_fee_level(level).await?;
        }

        let pending = processor.validate_all().await?;

        if !pending.can_execute() {
            return Ok((pending, None));
        }

        let result = match processor.execute(None).await {
            Ok(result) => result,
            Err(EngineError::NotExecutable(state)) => {
                log::debug!("Transaction changed to {state} before execution");
                return Ok((pending.with_validation_state(state), None));
            }
            Err(e) => Err(e)?,
        };

        return Ok((pending, Some(result)));
    }

    /// `@name:kind` points at one of the scenario's accounts, anything else is an address
    fn target(&self, target: &str, asset: &CryptoCurrency) -> Result<TransactionTarget> {
        let Some(reference) = target.strip_prefix('@') else {
            return Ok(TransactionTarget::Address(ReceiveAddress::new(
                target,
                asset.clone(),
            )));
        };

        let (name, kind) = parse_account_ref(reference)?;

        return Ok(TransactionTarget::Account(build_account(&name, kind, asset)));
    }
}

fn account_id(name: &str, kind: AccountKind) -> AccountId {
    return AccountId::new(format!("{name}:{kind}"));
}

fn build_account(name: &str, kind: AccountKind, asset: &CryptoCurrency) -> BlockchainAccount {
    let address = format!("{name}-{kind}-{}", asset.code()).to_lowercase();

    return BlockchainAccount::new(account_id(name, kind), format!("{name} {kind}"), asset.clone(), kind)
        .with_receive_address(address);
}

fn action_for(kind: AccountKind, target: &TransactionTarget) -> AssetAction {
    return match (kind, target.account_kind()) {
        (AccountKind::NonCustodial, _) => AssetAction::Send,
        (AccountKind::Trading, Some(AccountKind::Interest)) => AssetAction::InterestTransfer,
        (AccountKind::Trading, _) => AssetAction::Withdraw,
        (AccountKind::Interest, _) => AssetAction::InterestWithdraw,
    };
}
