use super::TransactionProcessor;

use crate::context::EngineContext;
use crate::engines::{EngineBinding, EngineKind, TransactionEngine};
use crate::models::{AssetAction, BlockchainAccount, TransactionTarget};
use crate::services::Services;
use crate::{EngineConfig, Result};

/// Builds processors wired to the right engine for a source, target and action
#[derive(Clone)]
pub struct TransactionProcessorFactory {
    context: EngineContext,
}

impl TransactionProcessorFactory {
    pub fn new(services: Services, config: EngineConfig) -> Self {
        return Self {
            context: EngineContext::new(services, config),
        };
    }

    pub fn config(&self) -> &EngineConfig {
        return &self.context.config;
    }

    pub fn create_transaction_processor(
        &self,
        source: BlockchainAccount,
        target: TransactionTarget,
        action: AssetAction,
    ) -> Result<TransactionProcessor> {
        let kind = EngineKind::resolve(&source, &target, action)?;

        let mut engine = TransactionEngine::new(kind, self.context.clone());
        engine.start(EngineBinding::new(
            source,
            target,
            self.context.config.ask_for_refresh_confirmation,
        ));
        engine.assert_inputs_valid()?;

        return Ok(TransactionProcessor::new(engine, action));
    }
}
