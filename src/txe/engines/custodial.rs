use super::confirmations::build_confirmations;
use super::validation::{self, Funds};
use super::{into_transaction_result, EngineBinding};

use crate::context::EngineContext;
use crate::fees::{FeeLevel, FeeSelection};
use crate::models::{
    AccountKind, PendingTransaction, TransactionConfirmation, TransactionResult, TransactionTarget,
    ValidationState,
};
use crate::money::MoneyValue;
use crate::services::{TransferDestination, TransferRequest};
use crate::{EngineError, Result};

use std::marker::PhantomData;

/// Where funds may flow between custodial products and what that costs
pub trait CustodialRoute: Send + Sync + 'static {
    const NAME: &'static str;

    const SOURCE_KIND: AccountKind;

    /// Product whose fee schedule applies
    const PRODUCT: AccountKind;

    /// Whether the product's fee is charged, or only its minimum enforced
    const CHARGES_FEE: bool;

    /// Whether the amount is capped at the withdrawable balance
    const CAPPED_AT_WITHDRAWABLE: bool;

    fn destination(target: &TransactionTarget) -> Option<TransferDestination>;
}

/// Moves funds out of a custodial account. Fees are fixed per product and paid in the
/// asset itself, so the only fee level is [`FeeLevel::None`].
pub struct CustodialEngine<R> {
    context: EngineContext,
    binding: Option<EngineBinding>,
    route: PhantomData<R>,
}

impl<R: CustodialRoute> CustodialEngine<R> {
    pub fn new(context: EngineContext) -> Self {
        return Self {
            context,
            binding: None,
            route: PhantomData,
        };
    }

    fn binding(&self) -> Result<&EngineBinding> {
        return self.binding.as_ref().ok_or(EngineError::NotStarted);
    }

    pub fn assert_inputs_valid(&self) -> Result {
        let binding = self.binding()?;
        let source = &binding.source;

        if source.kind != R::SOURCE_KIND {
            Err(EngineError::InvalidInputs(format!(
                "{} engine needs a {} account, got a {} account",
                R::NAME,
                R::SOURCE_KIND,
                source.kind
            )))?
        }

        if binding.target.asset() != &source.asset {
            Err(EngineError::InvalidInputs(format!(
                "Cannot move {} to a {} target",
                source.asset,
                binding.target.asset()
            )))?
        }

        if R::destination(&binding.target).is_none() {
            Err(EngineError::InvalidInputs(format!(
                "{} engine cannot reach {}",
                R::NAME,
                binding.target.label()
            )))?
        }

        return Ok(());
    }

    pub fn start(&mut self, binding: EngineBinding) {
        self.binding = Some(binding);
    }

    pub async fn initialize_transaction(&self) -> Result<PendingTransaction> {
        let asset = &self.binding()?.source.asset;

        let fiat = &self.context.services.fiat;
        let fiat_currency = self
            .context
            .read("fiat currency", || fiat.fiat_currency())
            .await?;

        return Ok(PendingTransaction::zero(
            asset,
            FeeSelection::none(asset.clone()),
            fiat_currency,
        ));
    }

    pub async fn update(
        &self,
        amount: MoneyValue,
        pending: PendingTransaction,
    ) -> Result<PendingTransaction> {
        let source = &self.binding()?.source;
        validation::ensure_currency(&amount, &pending.available)?;

        let fees = &self.context.services.fees;
        let schedule = self
            .context
            .read("custodial fees", || fees.custodial_fees(&source.asset, R::PRODUCT))
            .await?;

        let fee = match R::CHARGES_FEE {
            true => schedule.fee,
            false => MoneyValue::zero(&source.asset),
        };

        let balance = self.actionable_balance().await?;
        let available = validation::available_after_fee(&balance, &fee)?;

        let maximum_limit = match R::CAPPED_AT_WITHDRAWABLE {
            true => Some(balance),
            false => None,
        };

        log::debug!("Updated {amount}: available {available}, fee {fee}");

        return Ok(PendingTransaction {
            amount,
            available,
            fee_amount: fee.clone(),
            fee_for_full_available: fee,
            minimum_limit: Some(schedule.minimum),
            maximum_limit,
            ..pending
        });
    }

    pub async fn do_build_confirmations(
        &self,
        pending: PendingTransaction,
    ) -> Result<PendingTransaction> {
        return build_confirmations(&self.context, self.binding()?, pending).await;
    }

    pub async fn do_option_update_request(
        &self,
        pending: PendingTransaction,
        confirmation: TransactionConfirmation,
    ) -> Result<PendingTransaction> {
        return match confirmation {
            TransactionConfirmation::FeeSelection(selection)
                if &selection.selected_level != pending.fee_level() =>
            {
                self.do_update_fee_level(pending, selection.selected_level)
                    .await
            }
            other => Ok(pending.insert_confirmation(other)),
        };
    }

    pub async fn do_update_fee_level(
        &self,
        pending: PendingTransaction,
        level: FeeLevel,
    ) -> Result<PendingTransaction> {
        if !pending.fee_selection.is_available(&level) {
            Err(EngineError::InvalidFeeLevel(
                level,
                pending.fee_selection.asset.to_string(),
            ))?
        }

        // FeeLevel::None is the only level, nothing to recompute
        return Ok(pending);
    }

    pub async fn validate_amount(&self, pending: PendingTransaction) -> Result<PendingTransaction> {
        let funds = Funds {
            balance: self.actionable_balance().await?,
            fee_balance: None,
        };

        let state = validation::check_amount(&pending, &funds, None)?;

        return Ok(validation::with_state(pending, state));
    }

    pub async fn do_validate_all(&self, pending: PendingTransaction) -> Result<PendingTransaction> {
        let pending = self.validate_amount(pending).await?;
        if !pending.can_execute() {
            return Ok(pending);
        }

        let target = &self.binding()?.target;

        // moves between accounts of the same user have no address to check
        let state = match R::destination(target) {
            Some(TransferDestination::Address(address)) => {
                validation::check_receive_address(&self.context, Some(&address)).await?
            }
            Some(TransferDestination::Account(_)) => ValidationState::CanExecute,
            None => ValidationState::InvalidAddress,
        };

        return Ok(validation::with_state(pending, state));
    }

    pub async fn execute(
        &self,
        pending: &PendingTransaction,
        second_password: Option<&str>,
    ) -> Result<TransactionResult> {
        if !pending.can_execute() {
            Err(EngineError::NotExecutable(pending.validation_state))?
        }

        let binding = self.binding()?;
        let source = &binding.source;

        let destination = R::destination(&binding.target).ok_or_else(|| {
            EngineError::InvalidInputs(format!("{} engine cannot reach {}", R::NAME, binding.target.label()))
        })?;

        let request = TransferRequest {
            source: source.id.clone(),
            source_kind: source.kind,
            asset: source.asset.clone(),
            destination,
            amount: pending.amount.clone(),
            fee: pending.fee_amount.clone(),
            fee_level: FeeLevel::None,
        };

        log::debug!("Submitting {} {} to {:?}", R::NAME, request.amount, request.destination);

        let submitter = &self.context.services.submitter;
        let submission = self
            .context
            .write("submission", submitter.submit(&request, second_password))
            .await;

        return Ok(into_transaction_result(submission, request.amount));
    }

    pub async fn do_post_execute(&self, _result: &TransactionResult) -> Result {
        return Ok(());
    }

    pub async fn start_confirmations_update(
        &self,
        pending: PendingTransaction,
    ) -> Result<PendingTransaction> {
        return Ok(pending);
    }

    pub async fn do_refresh_confirmations(
        &self,
        pending: PendingTransaction,
    ) -> Result<PendingTransaction> {
        return Ok(pending);
    }

    pub fn stop(&self) {}

    async fn actionable_balance(&self) -> Result<MoneyValue> {
        let source = &self.binding()?.source;
        let balances = &self.context.services.balances;

        return self
            .context
            .read("balance", || balances.actionable_balance(source))
            .await;
    }
}
