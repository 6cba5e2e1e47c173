use crate::EngineError;

/// Convenience type to make error mapping cleaner
pub type Result<T = ()> = std::result::Result<T, EngineError>;
