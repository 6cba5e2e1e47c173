use std::{env, str::FromStr, time::Duration};

/// Tunables shared by every engine built by a [`TransactionProcessorFactory`](crate::TransactionProcessorFactory)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Age after which a cached fee quote is re-fetched, and period of the background refresh
    pub fee_refresh_interval_secs: u64,

    /// Upper bound on any single service call
    pub request_timeout_secs: u64,

    /// Extra attempts for read-only service calls. Submissions are never retried.
    pub max_retries: u32,

    pub ask_for_refresh_confirmation: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        return Self {
            fee_refresh_interval_secs: 20,
            request_timeout_secs: 30,
            max_retries: 2,
            ask_for_refresh_confirmation: false,
        };
    }
}

impl EngineConfig {
    pub fn fee_refresh_interval(&self) -> Duration {
        return Duration::from_secs(self.fee_refresh_interval_secs);
    }

    pub fn request_timeout(&self) -> Duration {
        return Duration::from_secs(self.request_timeout_secs);
    }

    /// Defaults overridden by `TXE_FEE_REFRESH_INTERVAL_SECS`, `TXE_REQUEST_TIMEOUT_SECS`,
    /// `TXE_MAX_RETRIES` and `TXE_ASK_FOR_REFRESH_CONFIRMATION`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        override_from_env("TXE_FEE_REFRESH_INTERVAL_SECS", &mut config.fee_refresh_interval_secs);
        override_from_env("TXE_REQUEST_TIMEOUT_SECS", &mut config.request_timeout_secs);
        override_from_env("TXE_MAX_RETRIES", &mut config.max_retries);
        override_from_env(
            "TXE_ASK_FOR_REFRESH_CONFIRMATION",
            &mut config.ask_for_refresh_confirmation,
        );

        return config;
    }
}

fn override_from_env<T: FromStr>(key: &str, value: &mut T) {
    let Ok(raw) = env::var(key) else {
        return;
    };

    match raw.parse() {
        Ok(parsed) => *value = parsed,
        Err(_) => log::warn!("Ignoring unparseable {key}={raw:?}"),
    }
}
