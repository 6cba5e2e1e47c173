use super::FeeQuote;

use crate::context::EngineContext;
use crate::money::CryptoCurrency;
use crate::{EngineError, Result};

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

#[derive(Debug, Clone)]
struct CachedQuote {
    quote: FeeQuote,
    fetched_at: Instant,
}

#[derive(Debug, Default)]
struct CacheState {
    value: Option<CachedQuote>,

    /// Bumped by `stop`, fetches started under an older generation are discarded
    generation: u64,
}

/// Last known fee quote for one asset.
///
/// Readers get the cached quote immediately. The first read fetches inline, concurrent first
/// readers share that fetch. A quote older than the refresh interval is still served while a
/// refresh runs in the background. `stop` drops the value and any refresh still in flight.
pub struct FeeCache {
    asset: CryptoCurrency,
    context: EngineContext,
    state: Mutex<CacheState>,
    fetch_lock: Arc<tokio::sync::Mutex<()>>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl FeeCache {
    pub fn new(asset: CryptoCurrency, context: EngineContext) -> Arc<Self> {
        return Arc::new(Self {
            asset,
            context,
            state: Mutex::new(CacheState::default()),
            fetch_lock: Arc::new(tokio::sync::Mutex::new(())),
            refresh_task: Mutex::new(None),
        });
    }

    pub fn asset(&self) -> &CryptoCurrency {
        return &self.asset;
    }

    pub async fn quote(self: &Arc<Self>) -> Result<FeeQuote> {
        if let Some((quote, stale)) = self.cached() {
            if stale {
                self.refresh_in_background();
            }

            return Ok(quote);
        }

        let _guard = self.fetch_lock.lock().await;

        // another reader may have filled the cache while we waited
        if let Some((quote, _)) = self.cached() {
            return Ok(quote);
        }

        return self.fetch().await;
    }

    /// Fetches a new quote regardless of the cached one
    pub async fn refresh(&self) -> Result<FeeQuote> {
        let _guard = self.fetch_lock.lock().await;
        return self.fetch().await;
    }

    /// Refreshes the quote every `fee_refresh_interval` until `stop` is called
    pub fn start_refresh(self: &Arc<Self>) {
        let period = self.context.config.fee_refresh_interval();
        if period.is_zero() {
            return;
        }

        let mut task = self.refresh_task.lock();
        if task.is_some() {
            return;
        }

        log::debug!("Starting fee refresh for {} every {period:?}", self.asset);

        let cache: Weak<Self> = Arc::downgrade(self);
        *task = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);

            loop {
                interval.tick().await;

                let Some(cache) = cache.upgrade() else {
                    break;
                };

                if let Err(e) = cache.refresh().await {
                    log::warn!("Scheduled fee refresh for {} failed: {e}", cache.asset);
                }
            }
        }));
    }

    /// Cancels the refresh task and forgets the cached quote. Idempotent.
    pub fn stop(&self) {
        if let Some(task) = self.refresh_task.lock().take() {
            task.abort();
        }

        let mut state = self.state.lock();
        state.generation += 1;
        state.value = None;
    }

    pub fn is_refreshing(&self) -> bool {
        return self.refresh_task.lock().is_some();
    }

    fn cached(&self) -> Option<(FeeQuote, bool)> {
        let max_age = self.context.config.fee_refresh_interval();

        return self.state.lock().value.as_ref().map(|cached| {
            let stale = cached.fetched_at.elapsed() >= max_age;
            (cached.quote.clone(), stale)
        });
    }

    fn refresh_in_background(self: &Arc<Self>) {
        // a fetch is already running, it will bring a fresh value
        let Ok(guard) = Arc::clone(&self.fetch_lock).try_lock_owned() else {
            return;
        };

        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let _guard = guard;

            if let Err(e) = cache.fetch().await {
                log::warn!("Background fee refresh for {} failed: {e}", cache.asset);
            }
        });
    }

    async fn fetch(&self) -> Result<FeeQuote> {
        let generation = self.state.lock().generation;

        log::debug!("Fetching fee quote for {}", self.asset);

        let fees = &self.context.services.fees;
        let quote = self
            .context
            .read("fee quote", || fees.fee_quote(&self.asset))
            .await?;

        let mut state = self.state.lock();
        if state.generation != generation {
            log::debug!("Discarding fee quote for {} fetched before stop", self.asset);
            return Err(EngineError::Cancelled);
        }

        state.value = Some(CachedQuote {
            quote: quote.clone(),
            fetched_at: Instant::now(),
        });

        return Ok(quote);
    }
}

impl Drop for FeeCache {
    fn drop(&mut self) {
        if let Some(task) = self.refresh_task.get_mut().take() {
            task.abort();
        }
    }
}
