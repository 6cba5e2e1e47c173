use crate::{EngineError, Result};

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

/// Cancellation signal shared between a processor and the work it has in flight.
///
/// Once cancelled a token stays cancelled; a processor replaces its token on reset.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    sender: Arc<watch::Sender<bool>>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        let (sender, _) = watch::channel(false);

        return Self {
            sender: Arc::new(sender),
        };
    }
}

impl CancellationToken {
    pub fn new() -> Self {
        return Self::default();
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        return *self.sender.borrow();
    }

    /// Resolves once the token is cancelled
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();

        // the sender outlives the receiver, so this only returns on cancellation
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }

    /// Runs `work` unless the token is cancelled first, in which case `work` is dropped
    pub async fn run<T>(&self, work: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            biased;

            _ = self.cancelled() => Err(EngineError::Cancelled),
            result = work => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    #[tokio::test]
    async fn run_completes_when_not_cancelled() {
        let token = CancellationToken::new();

        assert_eq!(token.run(async { Ok(5) }).await, Ok(5));
        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn run_fails_when_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();

        assert_eq!(token.run(async { Ok(5) }).await, Err(EngineError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_running_work() {
        let token = CancellationToken::new();

        let worker = {
            let token = token.clone();
            tokio::spawn(async move {
                token
                    .run(async {
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        Ok(())
                    })
                    .await
            })
        };

        tokio::task::yield_now().await;
        token.cancel();

        assert_eq!(worker.await.unwrap(), Err(EngineError::Cancelled));
    }
}
