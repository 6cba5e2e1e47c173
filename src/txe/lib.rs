pub mod cancellation;
mod config;
pub mod context;
pub mod engines;
mod error;
pub mod fees;
pub mod ids;
pub mod models;
pub mod money;
pub mod processor;
mod result;
pub mod services;

pub use cancellation::CancellationToken;
pub use config::EngineConfig;
pub use error::EngineError;
pub use processor::{ProcessorState, TransactionProcessor, TransactionProcessorFactory};
pub use result::Result;
