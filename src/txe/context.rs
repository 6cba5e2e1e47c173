use crate::services::{ServiceError, Services};
use crate::{EngineConfig, EngineError, Result};

use std::future::Future;

/// Services plus the policy every call to them follows
#[derive(Clone)]
pub struct EngineContext {
    pub services: Services,
    pub config: EngineConfig,
}

impl EngineContext {
    pub fn new(services: Services, config: EngineConfig) -> Self {
        return Self { services, config };
    }

    /// Read-only call, bounded by the request timeout and retried on transient failures
    pub async fn read<T, F, Fut>(&self, what: &'static str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, ServiceError>>,
    {
        let mut attempt = 0;

        loop {
            match self.bounded(what, call()).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.config.max_retries && is_retryable(&e) => {
                    attempt += 1;
                    log::warn!(
                        "Retrying {what} ({attempt}/{}) after: {e}",
                        self.config.max_retries
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Call with side effects: bounded by the request timeout, never retried
    pub async fn write<T, Fut>(&self, what: &'static str, call: Fut) -> Result<T>
    where
        Fut: Future<Output = std::result::Result<T, ServiceError>>,
    {
        return self.bounded(what, call).await;
    }

    async fn bounded<T, Fut>(&self, what: &'static str, call: Fut) -> Result<T>
    where
        Fut: Future<Output = std::result::Result<T, ServiceError>>,
    {
        let timeout = self.config.request_timeout();

        return match tokio::time::timeout(timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(EngineError::Timeout(what, timeout)),
        };
    }
}

fn is_retryable(e: &EngineError) -> bool {
    return match e {
        EngineError::Timeout(..) => true,
        EngineError::Service(e) => e.is_retryable(),
        _ => false,
    };
}
