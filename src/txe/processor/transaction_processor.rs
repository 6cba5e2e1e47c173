use crate::cancellation::CancellationToken;
use crate::engines::{EngineKind, TransactionEngine};
use crate::fees::FeeLevel;
use crate::models::{AssetAction, PendingTransaction, TransactionConfirmation, TransactionResult};
use crate::money::MoneyValue;
use crate::{EngineError, Result};

use std::fmt;
use std::mem;

use tokio::sync::{watch, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessorState {
    Uninitialized,
    Initialized,
    Validating,
    AmountUpdated,
    Executing,
    Succeeded,
    Failed,
}

impl fmt::Display for ProcessorState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Validating => "validating",
            Self::AmountUpdated => "amount_updated",
            Self::Executing => "executing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };

        return write!(f, "{name}");
    }
}

struct Inner {
    engine: TransactionEngine,
    state: ProcessorState,
    pending: Option<PendingTransaction>,

    /// Set by `validate_all`, cleared by every change to the pending transaction
    validated_all: bool,
}

impl Inner {
    fn pending(&self) -> Result<PendingTransaction> {
        return self.pending.clone().ok_or(EngineError::NotInitialized);
    }
}

/// Drives one engine through a single user-facing transaction flow.
///
/// Mutators are serialised and every one of them republishes the resulting
/// [`PendingTransaction`] to [`subscribe`](Self::subscribe)rs. Work in flight is abandoned
/// when the processor is reset or dropped.
pub struct TransactionProcessor {
    action: AssetAction,
    inner: Mutex<Inner>,
    token: parking_lot::Mutex<CancellationToken>,
    updates: watch::Sender<Option<PendingTransaction>>,
}

impl TransactionProcessor {
    pub(crate) fn new(engine: TransactionEngine, action: AssetAction) -> Self {
        let (updates, _) = watch::channel(None);

        return Self {
            action,
            inner: Mutex::new(Inner {
                engine,
                state: ProcessorState::Uninitialized,
                pending: None,
                validated_all: false,
            }),
            token: parking_lot::Mutex::new(CancellationToken::new()),
            updates,
        };
    }

    pub fn action(&self) -> AssetAction {
        return self.action;
    }

    /// Observes every published pending transaction, `None` once consumed or reset
    pub fn subscribe(&self) -> watch::Receiver<Option<PendingTransaction>> {
        return self.updates.subscribe();
    }

    /// Last published pending transaction
    pub fn pending_transaction(&self) -> Option<PendingTransaction> {
        return self.updates.borrow().clone();
    }

    /// Waits for the operation in flight, if any
    pub async fn state(&self) -> ProcessorState {
        return self.inner.lock().await.state;
    }

    pub async fn engine_kind(&self) -> EngineKind {
        return self.inner.lock().await.engine.kind();
    }

    pub async fn initialize_transaction(&self) -> Result<PendingTransaction> {
        let token = self.token();

        return token
            .run(async {
                let mut inner = self.inner.lock().await;

                let pending = inner.engine.initialize_transaction().await?;
                let pending = inner.engine.start_confirmations_update(pending).await?;

                log::debug!("Initialized {} transaction: {pending:?}", self.action);

                inner.state = ProcessorState::Initialized;
                inner.validated_all = false;

                return Ok(self.publish(&mut inner, pending));
            })
            .await;
    }

    pub async fn update_amount(&self, amount: MoneyValue) -> Result<PendingTransaction> {
        let token = self.token();

        return token
            .run(async {
                let mut inner = self.inner.lock().await;
                let pending = inner.pending()?;

                let pending = inner.engine.update(amount, pending).await?;
                let pending = self.rebuild_confirmations(&inner, pending).await?;
                let pending = inner.engine.validate_amount(pending).await?;

                inner.state = ProcessorState::AmountUpdated;
                inner.validated_all = false;

                return Ok(self.publish(&mut inner, pending));
            })
            .await;
    }

    /// Selects another fee level. `FeeLevel::Custom` carries the fee the user typed in.
    pub async fn update_fee_level(&self, level: FeeLevel) -> Result<PendingTransaction> {
        let token = self.token();

        return token
            .run(async {
                let mut inner = self.inner.lock().await;
                let pending = inner.pending()?;

                let pending = inner.engine.do_update_fee_level(pending, level).await?;
                let pending = inner.engine.validate_amount(pending).await?;

                inner.state = ProcessorState::AmountUpdated;
                inner.validated_all = false;

                return Ok(self.publish(&mut inner, pending));
            })
            .await;
    }

    pub async fn set_confirmation(
        &self,
        confirmation: TransactionConfirmation,
    ) -> Result<PendingTransaction> {
        let token = self.token();

        return token
            .run(async {
                let mut inner = self.inner.lock().await;
                let pending = inner.pending()?;

                let pending = inner
                    .engine
                    .do_option_update_request(pending, confirmation)
                    .await?;
                let pending = inner.engine.validate_amount(pending).await?;

                inner.state = ProcessorState::AmountUpdated;
                inner.validated_all = false;

                return Ok(self.publish(&mut inner, pending));
            })
            .await;
    }

    /// Builds the confirmations and runs every validation rule
    pub async fn validate_all(&self) -> Result<PendingTransaction> {
        let token = self.token();

        return token
            .run(async {
                let mut inner = self.inner.lock().await;
                let pending = inner.pending()?;

                let pending = inner.engine.do_build_confirmations(pending).await?;
                let pending = inner.engine.do_validate_all(pending).await?;

                log::debug!(
                    "Validated {} transaction: {}",
                    self.action,
                    pending.validation_state
                );

                inner.state = ProcessorState::Validating;
                inner.validated_all = true;

                return Ok(self.publish(&mut inner, pending));
            })
            .await;
    }

    /// Submits the transaction validated by the last `validate_all`.
    ///
    /// A rejected submission is returned as [`TransactionResult::Failed`] and keeps the pending
    /// transaction so it can be validated and submitted again. A successful one consumes it.
    pub async fn execute(&self, second_password: Option<&str>) -> Result<TransactionResult> {
        let token = self.token();

        return token
            .run(async {
                let mut inner = self.inner.lock().await;
                let pending = inner.pending()?;

                if inner.state != ProcessorState::Validating
                    || !inner.validated_all
                    || !pending.can_execute()
                {
                    Err(EngineError::NotExecutable(pending.validation_state))?
                }

                inner.state = ProcessorState::Executing;

                let result = match inner.engine.execute(&pending, second_password).await {
                    Ok(result) => result,
                    Err(e) => {
                        inner.state = ProcessorState::Failed;
                        inner.validated_all = false;
                        return Err(e);
                    }
                };

                if !result.is_success() {
                    inner.state = ProcessorState::Failed;
                    inner.validated_all = false;
                    return Ok(result);
                }

                if let Err(e) = inner.engine.do_post_execute(&result).await {
                    log::warn!("Post-execute step of {} failed: {e}", self.action);
                }

                log::debug!("Executed {} transaction: {result:?}", self.action);

                inner.state = ProcessorState::Succeeded;
                inner.validated_all = false;
                inner.pending = None;
                self.updates.send_replace(None);

                return Ok(result);
            })
            .await;
    }

    /// Re-quotes time-sensitive parts of the transaction, such as network fees
    pub async fn refresh_confirmations(&self) -> Result<PendingTransaction> {
        let token = self.token();

        return token
            .run(async {
                let mut inner = self.inner.lock().await;
                let pending = inner.pending()?;

                let pending = inner.engine.do_refresh_confirmations(pending).await?;

                inner.validated_all = inner.validated_all && pending.can_execute();

                return Ok(self.publish(&mut inner, pending));
            })
            .await;
    }

    /// Abandons the flow: cancels work in flight, stops the engine's background work and drops
    /// the pending transaction. Idempotent.
    pub async fn reset(&self) {
        let previous = mem::take(&mut *self.token.lock());
        previous.cancel();

        let mut inner = self.inner.lock().await;

        inner.engine.stop();
        inner.pending = None;
        inner.validated_all = false;
        inner.state = ProcessorState::Uninitialized;

        self.updates.send_replace(None);

        log::debug!("Reset {} transaction", self.action);
    }

    fn token(&self) -> CancellationToken {
        return self.token.lock().clone();
    }

    async fn rebuild_confirmations(
        &self,
        inner: &Inner,
        pending: PendingTransaction,
    ) -> Result<PendingTransaction> {
        if pending.confirmations.is_empty() {
            return Ok(pending);
        }

        return inner.engine.do_build_confirmations(pending).await;
    }

    fn publish(&self, inner: &mut Inner, pending: PendingTransaction) -> PendingTransaction {
        inner.pending = Some(pending.clone());
        self.updates.send_replace(Some(pending.clone()));
        return pending;
    }
}

impl Drop for TransactionProcessor {
    fn drop(&mut self) {
        self.token.get_mut().cancel();
        self.inner.get_mut().engine.stop();
    }
}
