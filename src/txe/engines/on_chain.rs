use super::confirmations::build_confirmations;
use super::validation::{self, Funds};
use super::{into_transaction_result, EngineBinding};

use crate::context::EngineContext;
use crate::fees::{FeeCache, FeeLevel, FeeSelection};
use crate::models::{
    AccountKind, PendingTransaction, TransactionConfirmation, TransactionResult, ValidationState,
};
use crate::money::{CryptoCurrency, MoneyValue};
use crate::services::{TransferDestination, TransferRequest};
use crate::{EngineError, Result};

use std::marker::PhantomData;
use std::sync::Arc;

/// What distinguishes one family of on-chain assets from another
pub trait OnChainAsset: Send + Sync + 'static {
    const NAME: &'static str;

    /// Whether the user may type in their own network fee
    const ALLOWS_CUSTOM_FEE: bool;

    fn supports(asset: &CryptoCurrency) -> bool;
}

struct Bound {
    binding: EngineBinding,
    fee_cache: Arc<FeeCache>,
}

/// Sends from a private key account to an on-chain address.
///
/// Fees come from a per-engine [`FeeCache`] and are paid in the asset's fee currency,
/// which for tokens is not the asset being sent.
pub struct OnChainEngine<A> {
    context: EngineContext,
    bound: Option<Bound>,
    family: PhantomData<A>,
}

impl<A: OnChainAsset> OnChainEngine<A> {
    pub fn new(context: EngineContext) -> Self {
        return Self {
            context,
            bound: None,
            family: PhantomData,
        };
    }

    fn bound(&self) -> Result<&Bound> {
        return self.bound.as_ref().ok_or(EngineError::NotStarted);
    }

    pub fn assert_inputs_valid(&self) -> Result {
        let binding = &self.bound()?.binding;
        let source = &binding.source;

        if source.kind != AccountKind::NonCustodial {
            Err(EngineError::InvalidInputs(format!(
                "{} engine needs a private key account, got a {} account",
                A::NAME,
                source.kind
            )))?
        }

        if !A::supports(&source.asset) {
            Err(EngineError::InvalidInputs(format!(
                "{} engine cannot send {}",
                A::NAME,
                source.asset
            )))?
        }

        if binding.target.asset() != &source.asset {
            Err(EngineError::InvalidInputs(format!(
                "Cannot send {} to a {} target",
                source.asset,
                binding.target.asset()
            )))?
        }

        return Ok(());
    }

    pub fn start(&mut self, binding: EngineBinding) {
        if let Some(previous) = self.bound.take() {
            previous.fee_cache.stop();
        }

        let fee_cache = FeeCache::new(binding.source.asset.clone(), self.context.clone());

        self.bound = Some(Bound { binding, fee_cache });
    }

    pub async fn initialize_transaction(&self) -> Result<PendingTransaction> {
        let bound = self.bound()?;
        let asset = &bound.binding.source.asset;

        let fiat = &self.context.services.fiat;
        let fiat_currency = self
            .context
            .read("fiat currency", || fiat.fiat_currency())
            .await?;

        bound.fee_cache.start_refresh();

        let fee_selection = FeeSelection::on_chain(asset.fee_currency(), A::ALLOWS_CUSTOM_FEE);

        return Ok(PendingTransaction::zero(asset, fee_selection, fiat_currency));
    }

    pub async fn update(
        &self,
        amount: MoneyValue,
        pending: PendingTransaction,
    ) -> Result<PendingTransaction> {
        let bound = self.bound()?;
        validation::ensure_currency(&amount, &pending.available)?;

        let quote = bound.fee_cache.quote().await?;
        let fee = quote.fee_for(pending.fee_level())?;

        if fee.currency().as_crypto() != Some(&pending.fee_selection.asset) {
            Err(EngineError::InvalidInputs(format!(
                "Fee quote for {} is in {}, fees are paid in {}",
                bound.binding.source.asset,
                fee.currency().code(),
                pending.fee_selection.asset
            )))?
        }

        let funds = self.funds(&bound.binding).await?;
        let available = validation::available_after_fee(&funds.balance, &fee)?;

        log::debug!("Updated {amount}: available {available}, fee {fee}");

        return Ok(PendingTransaction {
            amount,
            available,
            fee_amount: fee.clone(),
            fee_for_full_available: fee,
            ..pending
        });
    }

    pub async fn do_build_confirmations(
        &self,
        pending: PendingTransaction,
    ) -> Result<PendingTransaction> {
        let bound = self.bound()?;
        return build_confirmations(&self.context, &bound.binding, pending).await;
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
                level.clone(),
                pending.fee_selection.asset.to_string(),
            ))?
        }

        let rebuild = !pending.confirmations.is_empty();
        let fee_selection = pending.fee_selection.clone().with_selected_level(level);
        let amount = pending.amount.clone();

        let pending = self
            .update(
                amount,
                PendingTransaction {
                    fee_selection,
                    ..pending
                },
            )
            .await?;

        if rebuild {
            return self.do_build_confirmations(pending).await;
        }

        return Ok(pending);
    }

    pub async fn validate_amount(&self, pending: PendingTransaction) -> Result<PendingTransaction> {
        let bound = self.bound()?;

        let funds = self.funds(&bound.binding).await?;
        let quote = bound.fee_cache.quote().await?;

        let state = validation::check_amount(&pending, &funds, quote.custom_limits.as_ref())?;

        return Ok(validation::with_state(pending, state));
    }

    pub async fn do_validate_all(&self, pending: PendingTransaction) -> Result<PendingTransaction> {
        let pending = self.validate_amount(pending).await?;
        if !pending.can_execute() {
            return Ok(pending);
        }

        let binding = &self.bound()?.binding;

        let address = binding.target.receive_address();
        let state = validation::check_receive_address(&self.context, address.as_ref()).await?;
        if state != ValidationState::CanExecute {
            return Ok(validation::with_state(pending, state));
        }

        let source = &binding.source;
        if source.asset.uses_nonce() {
            let oracle = &self.context.services.pending;
            let in_flight = self
                .context
                .read("pending transactions", || {
                    oracle.has_pending_transaction(source)
                })
                .await?;

            if in_flight {
                return Ok(validation::with_state(
                    pending,
                    ValidationState::TransactionInFlight,
                ));
            }
        }

        return Ok(validation::with_state(pending, ValidationState::CanExecute));
    }

    pub async fn execute(
        &self,
        pending: &PendingTransaction,
        second_password: Option<&str>,
    ) -> Result<TransactionResult> {
        if !pending.can_execute() {
            Err(EngineError::NotExecutable(pending.validation_state))?
        }

        let binding = &self.bound()?.binding;
        let source = &binding.source;

        let address = binding.target.receive_address().ok_or_else(|| {
            EngineError::InvalidInputs(format!("{} has no receive address", binding.target.label()))
        })?;

        let request = TransferRequest {
            source: source.id.clone(),
            source_kind: source.kind,
            asset: source.asset.clone(),
            destination: TransferDestination::Address(address),
            amount: pending.amount.clone(),
            fee: pending.fee_amount.clone(),
            fee_level: pending.fee_level().clone(),
        };

        log::debug!("Broadcasting {} to {:?}", request.amount, request.destination);

        let submitter = &self.context.services.submitter;
        let submission = self
            .context
            .write("submission", submitter.submit(&request, second_password))
            .await;

        return Ok(into_transaction_result(submission, request.amount));
    }

    pub async fn do_post_execute(&self, result: &TransactionResult) -> Result {
        let TransactionResult::Hashed { hash, .. } = result else {
            return Ok(());
        };

        let source = &self.bound()?.binding.source;
        let oracle = &self.context.services.pending;

        return self
            .context
            .write("pending record", oracle.record_pending(source, hash))
            .await;
    }

    pub async fn start_confirmations_update(
        &self,
        pending: PendingTransaction,
    ) -> Result<PendingTransaction> {
        self.bound()?.fee_cache.start_refresh();
        return Ok(pending);
    }

    /// Re-quotes the fee and rebuilds amounts and confirmations.
    ///
    /// A validated transaction whose fee moved is validated again, or sent back to the user
    /// when the engine was started asking for refresh confirmation.
    pub async fn do_refresh_confirmations(
        &self,
        pending: PendingTransaction,
    ) -> Result<PendingTransaction> {
        let bound = self.bound()?;
        let previous_fee = pending.fee_amount.clone();

        bound.fee_cache.refresh().await?;

        let amount = pending.amount.clone();
        let pending = self.update(amount, pending).await?;
        let pending = self.do_build_confirmations(pending).await?;

        if pending.fee_amount == previous_fee
            || pending.validation_state == ValidationState::Uninitialized
        {
            return Ok(pending);
        }

        log::debug!("Fee moved from {previous_fee} to {}", pending.fee_amount);

        if bound.binding.ask_for_refresh_confirmation {
            return Ok(validation::with_state(
                pending,
                ValidationState::Uninitialized,
            ));
        }

        return self.do_validate_all(pending).await;
    }

    pub fn stop(&self) {
        if let Some(bound) = &self.bound {
            bound.fee_cache.stop();
        }
    }

    async fn funds(&self, binding: &EngineBinding) -> Result<Funds> {
        let source = &binding.source;
        let balances = &self.context.services.balances;

        let balance = self
            .context
            .read("balance", || balances.actionable_balance(source))
            .await?;

        let fee_currency = source.asset.fee_currency();
        if fee_currency == source.asset {
            return Ok(Funds {
                balance,
                fee_balance: None,
            });
        }

        let fee_balance = self
            .context
            .read("fee balance", || balances.balance(source, &fee_currency))
            .await?;

        return Ok(Funds {
            balance,
            fee_balance: Some(fee_balance),
        });
    }
}
