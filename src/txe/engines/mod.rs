//! Per asset and action transaction engines.
//!
//! Every engine implements the same lifecycle over a [`PendingTransaction`]: it is started with
//! a source and target, initializes a zeroed transaction, recomputes fee and available balance
//! on each update, validates, and finally executes. [`TransactionEngine`] dispatches that
//! lifecycle to the engine picked by [`EngineKind::resolve`].

mod confirmations;
mod custodial;
mod custodial_transfer;
mod custodial_withdraw;
mod interest_withdraw;
mod kind;
mod native;
mod on_chain;
mod token;
mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use custodial::{CustodialEngine, CustodialRoute};
pub use custodial_transfer::{CustodialTransferEngine, TradingToInterest};
pub use custodial_withdraw::{CustodialWithdrawEngine, TradingToOnChain};
pub use interest_withdraw::{InterestToAccount, InterestWithdrawEngine};
pub use kind::EngineKind;
pub use native::{NativeCoin, NativeCoinEngine};
pub use on_chain::{OnChainAsset, OnChainEngine};
pub use token::{Erc20, TokenEngine};

use crate::context::EngineContext;
use crate::fees::FeeLevel;
use crate::models::{
    BlockchainAccount, PendingTransaction, TransactionConfirmation, TransactionResult,
    TransactionTarget,
};
use crate::money::MoneyValue;
use crate::services::SubmissionReceipt;
use crate::Result;

use std::sync::Arc;

/// Operands an engine is started with, read-only for the whole flow
#[derive(Debug, Clone)]
pub struct EngineBinding {
    pub source: Arc<BlockchainAccount>,
    pub target: Arc<TransactionTarget>,
    pub ask_for_refresh_confirmation: bool,
}

impl EngineBinding {
    pub fn new(
        source: BlockchainAccount,
        target: TransactionTarget,
        ask_for_refresh_confirmation: bool,
    ) -> Self {
        return Self {
            source: Arc::new(source),
            target: Arc::new(target),
            ask_for_refresh_confirmation,
        };
    }
}

pub enum TransactionEngine {
    NativeCoin(NativeCoinEngine),
    Token(TokenEngine),
    CustodialTransfer(CustodialTransferEngine),
    CustodialWithdraw(CustodialWithdrawEngine),
    InterestWithdraw(InterestWithdrawEngine),
}

macro_rules! dispatch {
    ($engine:expr, $inner:ident => $call:expr) => {
        match $engine {
            TransactionEngine::NativeCoin($inner) => $call,
            TransactionEngine::Token($inner) => $call,
            TransactionEngine::CustodialTransfer($inner) => $call,
            TransactionEngine::CustodialWithdraw($inner) => $call,
            TransactionEngine::InterestWithdraw($inner) => $call,
        }
    };
}

impl TransactionEngine {
    pub fn new(kind: EngineKind, context: EngineContext) -> Self {
        return match kind {
            EngineKind::NativeCoin => Self::NativeCoin(NativeCoinEngine::new(context)),
            EngineKind::Token => Self::Token(TokenEngine::new(context)),
            EngineKind::CustodialTransfer => {
                Self::CustodialTransfer(CustodialTransferEngine::new(context))
            }
            EngineKind::CustodialWithdraw => {
                Self::CustodialWithdraw(CustodialWithdrawEngine::new(context))
            }
            EngineKind::InterestWithdraw => {
                Self::InterestWithdraw(InterestWithdrawEngine::new(context))
            }
        };
    }

    pub fn kind(&self) -> EngineKind {
        return match self {
            Self::NativeCoin(_) => EngineKind::NativeCoin,
            Self::Token(_) => EngineKind::Token,
            Self::CustodialTransfer(_) => EngineKind::CustodialTransfer,
            Self::CustodialWithdraw(_) => EngineKind::CustodialWithdraw,
            Self::InterestWithdraw(_) => EngineKind::InterestWithdraw,
        };
    }

    /// Fails with [`EngineError::InvalidInputs`](crate::EngineError::InvalidInputs) when the
    /// engine was wired with operands it cannot move funds between
    pub fn assert_inputs_valid(&self) -> Result {
        return dispatch!(self, engine => engine.assert_inputs_valid());
    }

    /// Binds the engine to its operands. No I/O.
    pub fn start(&mut self, binding: EngineBinding) {
        dispatch!(self, engine => engine.start(binding))
    }

    pub async fn initialize_transaction(&self) -> Result<PendingTransaction> {
        return dispatch!(self, engine => engine.initialize_transaction().await);
    }

    pub async fn update(
        &self,
        amount: MoneyValue,
        pending: PendingTransaction,
    ) -> Result<PendingTransaction> {
        return dispatch!(self, engine => engine.update(amount, pending).await);
    }

    pub async fn do_build_confirmations(
        &self,
        pending: PendingTransaction,
    ) -> Result<PendingTransaction> {
        return dispatch!(self, engine => engine.do_build_confirmations(pending).await);
    }

    pub async fn do_option_update_request(
        &self,
        pending: PendingTransaction,
        confirmation: TransactionConfirmation,
    ) -> Result<PendingTransaction> {
        return dispatch!(self, engine => engine.do_option_update_request(pending, confirmation).await);
    }

    pub async fn do_update_fee_level(
        &self,
        pending: PendingTransaction,
        level: FeeLevel,
    ) -> Result<PendingTransaction> {
        return dispatch!(self, engine => engine.do_update_fee_level(pending, level).await);
    }

    pub async fn validate_amount(&self, pending: PendingTransaction) -> Result<PendingTransaction> {
        return dispatch!(self, engine => engine.validate_amount(pending).await);
    }

    pub async fn do_validate_all(&self, pending: PendingTransaction) -> Result<PendingTransaction> {
        return dispatch!(self, engine => engine.do_validate_all(pending).await);
    }

    pub async fn execute(
        &self,
        pending: &PendingTransaction,
        second_password: Option<&str>,
    ) -> Result<TransactionResult> {
        return dispatch!(self, engine => engine.execute(pending, second_password).await);
    }

    pub async fn do_post_execute(&self, result: &TransactionResult) -> Result {
        return dispatch!(self, engine => engine.do_post_execute(result).await);
    }

    pub async fn start_confirmations_update(
        &self,
        pending: PendingTransaction,
    ) -> Result<PendingTransaction> {
        return dispatch!(self, engine => engine.start_confirmations_update(pending).await);
    }

    pub async fn do_refresh_confirmations(
        &self,
        pending: PendingTransaction,
    ) -> Result<PendingTransaction> {
        return dispatch!(self, engine => engine.do_refresh_confirmations(pending).await);
    }

    /// Tears down background work. Idempotent.
    pub fn stop(&self) {
        dispatch!(self, engine => engine.stop())
    }
}

fn into_transaction_result(
    submission: Result<SubmissionReceipt>,
    amount: MoneyValue,
) -> TransactionResult {
    return match submission {
        Ok(SubmissionReceipt::Hash(hash)) => TransactionResult::Hashed { hash, amount },
        Ok(SubmissionReceipt::Reference(reference)) => TransactionResult::Unhashed {
            amount,
            reference: Some(reference),
        },
        Err(error) => {
            log::warn!("Submission of {amount} failed: {error}");
            TransactionResult::Failed { error }
        }
    };
}
