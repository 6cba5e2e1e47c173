use crate::context::EngineContext;
use crate::fees::{FeeLevel, FeeLimits};
use crate::models::{PendingTransaction, ReceiveAddress, ValidationState};
use crate::money::{MoneyError, MoneyValue};
use crate::{EngineError, Result};

/// Balances the amount checks run against
#[derive(Debug, Clone)]
pub(super) struct Funds {
    /// Actionable balance in the send asset
    pub balance: MoneyValue,

    /// Balance in the fee asset, only when fees are paid in another asset
    pub fee_balance: Option<MoneyValue>,
}

/// `max(balance - fee, 0)` when the fee is paid from the same balance, `balance` otherwise
pub(super) fn available_after_fee(balance: &MoneyValue, fee: &MoneyValue) -> Result<MoneyValue> {
    if balance.currency() != fee.currency() {
        return Ok(balance.clone());
    }

    return Ok(balance.sub(fee)?.clamped_at_zero());
}

pub(super) fn ensure_currency(amount: &MoneyValue, expected: &MoneyValue) -> Result {
    if amount.currency() != expected.currency() {
        Err(MoneyError::CurrencyMismatch(
            "update",
            amount.clone(),
            expected.clone(),
        ))?
    }

    return Ok(());
}

/// Amount, fee, limit and balance checks, in that order. The first broken rule wins.
pub(super) fn check_amount(
    pending: &PendingTransaction,
    funds: &Funds,
    custom_limits: Option<&FeeLimits>,
) -> Result<ValidationState> {
    let amount = &pending.amount;

    if !amount.is_positive() || amount.currency() != funds.balance.currency() {
        return Ok(ValidationState::InvalidAmount);
    }

    if let FeeLevel::Custom(fee) = pending.fee_level() {
        if fee.is_negative() {
            return Ok(ValidationState::FeeUnderMinLimit);
        }

        if let Some(limits) = custom_limits {
            if fee.is_lt(&limits.min)? {
                return Ok(ValidationState::FeeUnderMinLimit);
            }

            if fee.is_gt(&limits.max)? {
                return Ok(ValidationState::FeeOverMaxLimit);
            }
        }
    }

    if let Some(minimum) = &pending.minimum_limit {
        if amount.is_lt(minimum)? {
            return Ok(ValidationState::BelowMinimumLimit);
        }
    }

    if let Some(maximum) = &pending.maximum_limit {
        if amount.is_gt(maximum)? {
            return Ok(ValidationState::OverMaximumLimit);
        }
    }

    let fee = &pending.fee_amount;

    if fee.currency() == amount.currency() {
        if amount.add(fee)?.is_gt(&funds.balance)? {
            return Ok(ValidationState::InsufficientFunds);
        }

        return Ok(ValidationState::CanExecute);
    }

    if amount.is_gt(&funds.balance)? {
        return Ok(ValidationState::InsufficientFunds);
    }

    let fee_balance = funds.fee_balance.as_ref().ok_or_else(|| {
        EngineError::InvalidInputs(format!("No {} balance to pay the fee from", fee.currency()))
    })?;

    if fee.is_gt(fee_balance)? {
        return Ok(ValidationState::InsufficientGas);
    }

    return Ok(ValidationState::CanExecute);
}

/// Checks an on-chain destination. Token transfers to a contract would be lost.
pub(super) async fn check_receive_address(
    context: &EngineContext,
    address: Option<&ReceiveAddress>,
) -> Result<ValidationState> {
    let Some(address) = address else {
        return Ok(ValidationState::InvalidAddress);
    };

    let addresses = &context.services.addresses;

    let valid = context
        .read("address validity", || addresses.is_valid(address))
        .await?;

    if !valid {
        return Ok(ValidationState::InvalidAddress);
    }

    if address.asset.is_erc20() {
        let contract = context
            .read("contract detection", || addresses.is_contract(&address.address))
            .await?;

        if contract {
            return Ok(ValidationState::AddressIsContract);
        }
    }

    return Ok(ValidationState::CanExecute);
}

pub(super) fn with_state(pending: PendingTransaction, state: ValidationState) -> PendingTransaction {
    if pending.validation_state != state {
        log::debug!(
            "Validation state of {} moved from {} to {state}",
            pending.amount,
            pending.validation_state
        );
    }

    return pending.with_validation_state(state);
}
